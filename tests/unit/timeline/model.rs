use super::*;
use crate::timeline::dsl::{EventBuilder, TimelineBuilder};

fn rate() -> FrameRate {
    FrameRate::new(24).unwrap()
}

fn event(channel: Channel, record: std::ops::Range<u64>) -> Event {
    EventBuilder::new("AX", channel, record)
        .build(rate(), 0)
        .unwrap()
}

#[test]
fn channels_sort_video_first_then_audio_ascending() {
    let mut channels = vec![Channel::Audio(3), Channel::Video, Channel::Audio(1)];
    channels.sort();
    assert_eq!(
        channels,
        vec![Channel::Video, Channel::Audio(1), Channel::Audio(3)]
    );
    assert!(Channel::audio(0).is_err());
    assert_eq!(Channel::audio(2).unwrap().to_string(), "A2");
}

#[test]
fn push_groups_events_into_sorted_tracks() {
    let mut timeline = Timeline::new("t", rate());
    timeline.push(event(Channel::Audio(2), 0..10));
    timeline.push(event(Channel::Video, 0..10));
    timeline.push(event(Channel::Audio(1), 0..10));
    timeline.push(event(Channel::Video, 10..20));

    let order: Vec<Channel> = timeline.tracks.iter().map(|t| t.channel).collect();
    assert_eq!(
        order,
        vec![Channel::Video, Channel::Audio(1), Channel::Audio(2)]
    );
    assert_eq!(timeline.track(Channel::Video).unwrap().events.len(), 2);
    assert_eq!(timeline.event_count(), 4);
    assert_eq!(timeline.end(), 20);
}

#[test]
fn overlapping_events_are_out_of_order() {
    let mut timeline = Timeline::new("t", rate());
    timeline.push(event(Channel::Video, 0..48));
    timeline.push(event(Channel::Video, 40..60));
    let timeline = timeline.renumbered();
    let err = timeline.validate().unwrap_err();
    assert!(matches!(
        err,
        EdlError::OutOfOrderEvents {
            at: Location::Event(2),
            ..
        }
    ));
}

#[test]
fn unsorted_events_are_out_of_order() {
    let mut timeline = Timeline::new("t", rate());
    timeline.push(event(Channel::Audio(1), 48..60));
    timeline.push(event(Channel::Audio(1), 0..10));
    assert!(matches!(
        timeline.validate(),
        Err(EdlError::OutOfOrderEvents { .. })
    ));
}

#[test]
fn retimed_event_is_rejected() {
    let mut e = event(Channel::Video, 0..48);
    e.src_out = Timecode::new(50, rate());
    assert!(matches!(
        e.validate(rate()),
        Err(EdlError::DurationMismatch {
            source_frames: 50,
            record_frames: 48,
            ..
        })
    ));
}

#[test]
fn empty_record_range_is_invalid() {
    let mut e = event(Channel::Video, 0..48);
    e.rec_out = e.rec_in;
    assert!(matches!(
        e.validate(rate()),
        Err(EdlError::InvalidRange { .. })
    ));
}

#[test]
fn mixed_rates_are_rejected() {
    let mut e = event(Channel::Video, 0..48);
    e.src_in = Timecode::new(0, FrameRate::new(25).unwrap());
    assert!(matches!(e.validate(rate()), Err(EdlError::Validation(_))));
}

#[test]
fn gap_events_never_carry_filenames() {
    let mut e = Event::gap(
        Channel::Video,
        "BL",
        Timecode::new(0, rate()),
        Timecode::new(10, rate()),
    );
    assert!(e.validate(rate()).is_ok());
    e.source_filename = Some("x.mov".into());
    assert!(e.validate(rate()).is_err());
}

#[test]
fn renumbering_follows_emission_order() {
    let mut timeline = Timeline::new("t", rate());
    timeline.push(event(Channel::Audio(1), 0..10));
    timeline.push(event(Channel::Video, 0..10));
    timeline.push(event(Channel::Video, 10..20));
    let timeline = timeline.renumbered();
    let ids: Vec<(Channel, u32)> = timeline.events().map(|e| (e.channel, e.event_id)).collect();
    assert_eq!(
        ids,
        vec![
            (Channel::Video, 1),
            (Channel::Video, 2),
            (Channel::Audio(1), 3)
        ]
    );
}

#[test]
fn recovered_media_lists_clip_names() {
    let timeline = TimelineBuilder::new("t", rate())
        .event(EventBuilder::new("AX", Channel::Video, 0..10).file("a.mov"))
        .event(EventBuilder::new("AX", Channel::Video, 10..20))
        .event(EventBuilder::new("AX", Channel::Audio(1), 0..10).file("a.wav"))
        .build()
        .unwrap();
    let recovered = timeline.recovered_media();
    assert_eq!(recovered.len(), 2);
    assert_eq!(recovered[0].filename, "a.mov");
    assert_eq!(recovered[0].event_id, 1);
    assert_eq!(recovered[1].channel, Channel::Audio(1));
}

#[test]
fn audio_channels_include_linked_audio() {
    let timeline = TimelineBuilder::new("t", rate())
        .event(EventBuilder::new("AX", Channel::Video, 0..10).link_audio(3))
        .event(EventBuilder::new("AX", Channel::Audio(1), 0..10))
        .build()
        .unwrap();
    assert_eq!(timeline.audio_channels(), vec![1, 3]);
}

#[test]
fn timeline_json_roundtrip() {
    let timeline = TimelineBuilder::new("json", rate())
        .event(
            EventBuilder::new("AX", Channel::Video, 0..10)
                .dissolve(5)
                .marker(3, "look"),
        )
        .build()
        .unwrap();
    let json = serde_json::to_string(&timeline).unwrap();
    let back: Timeline = serde_json::from_str(&json).unwrap();
    assert_eq!(back, timeline);
}

#[test]
fn marker_at_another_rate_is_rejected() {
    let mut e = event(Channel::Video, 0..48);
    e.markers.push(Marker {
        position: Timecode::new(24, FrameRate::new(25).unwrap()),
        label: "flash".into(),
    });
    let err = e.validate(rate()).unwrap_err();
    assert!(matches!(err, EdlError::Validation(_)), "{err}");

    e.markers[0].position = Timecode::new(24, rate());
    assert!(e.validate(rate()).is_ok());
}
