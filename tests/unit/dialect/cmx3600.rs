use super::*;
use crate::{
    foundation::core::FrameRate,
    timeline::{
        dsl::{EventBuilder, TimelineBuilder},
        model::{Channel, Transition},
    },
};

fn rate() -> FrameRate {
    FrameRate::new(24).unwrap()
}

#[test]
fn uncovered_time_has_no_record() {
    let t = TimelineBuilder::new("B", rate())
        .event(EventBuilder::new("A001", Channel::Video, 0..48))
        .event(EventBuilder::new("A002", Channel::Video, 96..144))
        .build()
        .unwrap();
    let text = Cmx3600Writer.write(&t, &ExportConfig::default()).unwrap();
    let records: Vec<&str> = text.lines().filter(|l| l.starts_with("00")).collect();
    assert_eq!(records.len(), 2);
    assert!(records[0].ends_with("00:00:00:00 00:00:02:00"));
    assert!(records[1].ends_with("00:00:04:00 00:00:06:00"));
    assert!(!text.contains(" BL "));
}

#[test]
fn dissolve_writes_frame_count_after_tag() {
    let t = TimelineBuilder::new("C", rate())
        .event(EventBuilder::new("A001", Channel::Video, 0..48).dissolve(12))
        .build()
        .unwrap();
    assert_eq!(
        t.track(Channel::Video).unwrap().events[0].transition,
        Transition::Dissolve(12)
    );
    let text = Cmx3600Writer.write(&t, &ExportConfig::default()).unwrap();
    let record = text.lines().find(|l| l.starts_with("001")).unwrap();
    let fields: Vec<&str> = record.split_whitespace().collect();
    assert_eq!(&fields[..5], &["001", "A001", "V", "D", "12"]);
}

#[test]
fn header_has_fcm_line() {
    let t = Timeline::new("Empty", rate());
    let text = Cmx3600Writer.write(&t, &ExportConfig::default()).unwrap();
    assert_eq!(text, "TITLE: Empty\nFCM: NON-DROP FRAME\n\n");
    assert_eq!(Cmx3600Writer.dialect(), Dialect::Cmx3600);
}
