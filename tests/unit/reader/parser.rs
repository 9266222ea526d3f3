use super::*;
use crate::{
    dialect::{cmx3600::Cmx3600Writer, config::ExportConfig, render::EdlWriter},
    timeline::dsl::{EventBuilder, TimelineBuilder},
};

fn rate() -> FrameRate {
    FrameRate::new(24).unwrap()
}

fn tc(frames: u64) -> Timecode {
    Timecode::new(frames, rate())
}

const HOUR: u64 = 24 * 3600;

const SAMPLE: &str = "\
TITLE: Sample  24 fps
FCM: NON-DROP FRAME
* PROJECT NOTE

001  A001     V     C        00:00:00:00 00:00:02:00 01:00:00:00 01:00:02:00
001  AUD      A2
* FROM CLIP NAME: a001.mov
* LOC: 01:00:00:12 flash
* EXTRA: keep

002  A002     A     C        00:00:05:00 00:00:07:00 01:00:00:00 01:00:02:00
AUD  3
* LOC: unlabelled marker
";

#[test]
fn reads_records_continuations_and_comments() {
    let t = parse(SAMPLE, rate()).unwrap();
    assert_eq!(t.title, "Sample");
    assert_eq!(t.comments, vec!["* PROJECT NOTE".to_string()]);
    assert_eq!(t.event_count(), 2);

    let video = &t.track(Channel::Video).unwrap().events[0];
    assert_eq!(video.event_id, 1);
    assert_eq!(video.reel, "A001");
    assert_eq!(video.linked_audio, vec![2]);
    assert_eq!(video.rec_in, tc(HOUR));
    assert_eq!(video.rec_out, tc(HOUR + 48));
    assert_eq!(video.source_filename.as_deref(), Some("a001.mov"));
    assert_eq!(
        video.markers,
        vec![Marker {
            position: tc(HOUR + 12),
            label: "flash".into(),
        }]
    );
    assert_eq!(video.comments, vec!["* EXTRA: keep".to_string()]);

    let audio = &t.track(Channel::Audio(1)).unwrap().events[0];
    assert_eq!(audio.event_id, 2);
    assert_eq!(audio.linked_audio, vec![3]);
    assert_eq!(audio.src_in, tc(120));
    assert_eq!(audio.markers[0].position, audio.rec_in);
    assert_eq!(audio.markers[0].label, "unlabelled marker");
}

#[test]
fn dissolve_survives_a_round_trip() {
    let t = TimelineBuilder::new("C", rate())
        .event(EventBuilder::new("A001", Channel::Video, 0..48))
        .event(
            EventBuilder::new("A002", Channel::Video, 48..96)
                .source_in(240)
                .dissolve(12),
        )
        .build()
        .unwrap();
    let text = Cmx3600Writer.write(&t, &ExportConfig::default()).unwrap();
    let back = parse(&text, rate()).unwrap();
    assert_eq!(
        back.track(Channel::Video).unwrap().events[1].transition,
        Transition::Dissolve(12)
    );
    assert_eq!(back, t);
}

#[test]
fn two_line_dissolve_is_folded() {
    let text = "\
TITLE: Dissolve

001  A001     V     C        00:00:10:00 00:00:12:00 00:00:00:00 00:00:02:00

002  A001     V     C        00:00:12:00 00:00:12:00 00:00:02:00 00:00:02:00
002  B002     V     D    024 00:00:20:00 00:00:22:00 00:00:02:00 00:00:04:00
* FROM CLIP NAME: a.mov
* TO CLIP NAME: b.mov
";
    let t = parse(text, rate()).unwrap();
    let events = &t.track(Channel::Video).unwrap().events;
    assert_eq!(events.len(), 2);
    let e = &events[1];
    assert_eq!(e.event_id, 2);
    assert_eq!(e.reel, "B002");
    assert_eq!(e.transition, Transition::Dissolve(24));
    assert_eq!(e.rec_in, tc(48));
    assert_eq!(e.rec_out, tc(96));
    assert_eq!(e.source_filename.as_deref(), Some("b.mov"));
    assert_eq!(e.comments, vec!["* FROM CLIP NAME: a.mov".to_string()]);
}

#[test]
fn lone_zero_length_record_is_an_invalid_range() {
    let text = "001  A001 V C 00:00:00:00 00:00:00:00 00:00:00:00 00:00:00:00\n\n";
    let err = parse(text, rate()).unwrap_err();
    assert!(matches!(err, EdlError::InvalidRange { .. }));
    assert_eq!(err.location(), Location::Line(1));
}

#[test]
fn overlapping_records_are_out_of_order() {
    let text = "\
001  A V C 00:00:00:00 00:00:01:00 00:00:01:00 00:00:02:00
002  B V C 00:00:00:00 00:00:01:00 00:00:00:00 00:00:01:00
";
    let err = parse(text, rate()).unwrap_err();
    assert!(matches!(err, EdlError::OutOfOrderEvents { .. }));
    assert_eq!(err.location(), Location::Event(2));
}

#[test]
fn errors_carry_line_numbers() {
    let malformed = "TITLE: x\n001  A V C 00:00:00:00 00:00:01:30 00:00:00:00 00:00:01:00\n";
    let err = parse(malformed, rate()).unwrap_err();
    assert!(matches!(err, EdlError::MalformedTimecode { .. }));
    assert_eq!(err.location(), Location::Line(2));

    let mismatch = "001  A V C 00:00:00:00 00:00:02:00 00:00:00:00 00:00:01:00\n";
    let err = parse(mismatch, rate()).unwrap_err();
    assert!(matches!(err, EdlError::DurationMismatch { .. }));
    assert_eq!(err.location(), Location::Line(1));

    let stray = "001  A V C 00:00:00:00 00:00:01:00 00:00:00:00 00:00:01:00\n002  AUD  A2\n";
    let err = parse(stray, rate()).unwrap_err();
    assert!(matches!(err, EdlError::UnrecognizedRecord { .. }));
    assert_eq!(err.location(), Location::Line(2));

    let short = "001  A V C 00:00:00:00 00:00:01:00\n";
    assert!(matches!(
        parse(short, rate()),
        Err(EdlError::UnrecognizedRecord { .. })
    ));
}

#[test]
fn unsupported_features_are_refused() {
    let drop = "TITLE: x\nFCM: DROP FRAME\n";
    assert!(matches!(
        parse(drop, rate()),
        Err(EdlError::Unsupported { .. })
    ));

    let wipe = "001  A V W001 030 00:00:00:00 00:00:01:00 00:00:00:00 00:00:01:00\n";
    let err = parse(wipe, rate()).unwrap_err();
    assert!(matches!(err, EdlError::Unsupported { .. }));
    assert_eq!(err.location(), Location::Line(1));
}

#[test]
fn collect_mode_keeps_good_events() {
    let text = "\
TITLE: Mixed
001  A V C 00:00:00:00 00:00:01:00 00:00:00:00 00:00:01:00
garbage line here
002  B V C 00:00:00:00 00:00:01:99 00:00:01:00 00:00:02:00
* FROM CLIP NAME: dropped.mov
003  C V C 00:00:00:00 00:00:01:00 00:00:02:00 00:00:03:00
";
    let strict = read(text, &ReadOptions::new(rate())).unwrap_err();
    assert_eq!(strict.location(), Location::Line(3));

    let report = read(text, &ReadOptions::new(rate()).collecting_errors()).unwrap();
    let ids: Vec<u32> = report.timeline.events().map(|e| e.event_id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(report.errors.len(), 2);
    assert_eq!(report.errors[0].location(), Location::Line(3));
    assert!(matches!(
        report.errors[1],
        EdlError::MalformedTimecode { .. }
    ));
    assert!(report.recovered.is_empty());
}

#[test]
fn report_lists_recovered_media_and_dialect() {
    let report = read(SAMPLE, &ReadOptions::new(rate())).unwrap();
    assert_eq!(report.dialect, Dialect::Cmx3600);
    assert_eq!(
        report.recovered,
        vec![RecoveredMedia {
            event_id: 1,
            channel: Channel::Video,
            filename: "a001.mov".into(),
        }]
    );

    let forced = read(SAMPLE, &ReadOptions::new(rate()).with_dialect(Dialect::Gvg)).unwrap();
    assert_eq!(forced.dialect, Dialect::Gvg);
}

#[test]
fn black_reels_become_gaps() {
    let text = "001  BL V C 00:00:00:00 00:00:01:00 00:00:00:00 00:00:01:00\n";
    let t = parse(text, rate()).unwrap();
    assert!(t.events().all(|e| e.is_gap));
}

#[test]
fn custom_video_label_is_accepted() {
    let text = "001  A VID C 00:00:00:00 00:00:01:00 00:00:00:00 00:00:01:00\n";
    assert!(parse(text, rate()).is_err());
    let options = ReadOptions {
        video_label: Some("VID".into()),
        ..ReadOptions::new(rate())
    };
    let report = read(text, &options).unwrap();
    assert_eq!(report.timeline.tracks[0].channel, Channel::Video);
}

#[test]
fn channel_labels_map_to_channels() {
    assert_eq!(channel_label("V", None), Some((Channel::Video, vec![])));
    assert_eq!(channel_label("v2", None), Some((Channel::Video, vec![])));
    assert_eq!(channel_label("A", None), Some((Channel::Audio(1), vec![])));
    assert_eq!(channel_label("A1", None), Some((Channel::Audio(1), vec![])));
    assert_eq!(channel_label("A4", None), Some((Channel::Audio(4), vec![])));
    assert_eq!(channel_label("AA", None), Some((Channel::Audio(1), vec![2])));
    assert_eq!(channel_label("B", None), Some((Channel::Video, vec![1])));
    assert_eq!(channel_label("AA/V", None), Some((Channel::Video, vec![1, 2])));
    assert_eq!(channel_label("A0", None), None);
    assert_eq!(channel_label("X", None), None);
}

#[test]
fn rate_hint_comes_from_title() {
    assert_eq!(detect_rate_hint(SAMPLE), Some(rate()));
    assert_eq!(detect_rate_hint("TITLE: none\n"), None);
}

#[test]
fn padded_file_names_and_labels_survive_a_round_trip() {
    let t = TimelineBuilder::new("Pad", rate())
        .event(
            EventBuilder::new("A001", Channel::Video, 0..48)
                .file(" take 1.mov ")
                .marker(12, " soft cue "),
        )
        .build()
        .unwrap();
    let text = Cmx3600Writer.write(&t, &ExportConfig::default()).unwrap();
    assert_eq!(parse(&text, rate()).unwrap(), t);
}
