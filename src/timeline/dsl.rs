use std::ops::Range;

use crate::{
    foundation::core::{FrameRate, Timecode},
    foundation::error::{EdlError, EdlResult, Location},
    timeline::gaps::GAP_REEL,
    timeline::model::{Channel, Event, Marker, Timeline, Transition},
};

/// Host-side construction of one event, in absolute frames.
pub struct EventBuilder {
    reel: String,
    channel: Channel,
    record: Range<u64>,
    src_in: u64,
    linked_audio: Vec<u32>,
    transition: Transition,
    source_filename: Option<String>,
    markers: Vec<(u64, String)>,
    comments: Vec<String>,
    is_gap: bool,
}

impl EventBuilder {
    pub fn new(reel: impl Into<String>, channel: Channel, record: Range<u64>) -> Self {
        Self {
            reel: reel.into(),
            channel,
            record,
            src_in: 0,
            linked_audio: Vec::new(),
            transition: Transition::Cut,
            source_filename: None,
            markers: Vec::new(),
            comments: Vec::new(),
            is_gap: false,
        }
    }

    pub fn gap(channel: Channel, record: Range<u64>) -> Self {
        let mut b = Self::new(GAP_REEL, channel, record);
        b.is_gap = true;
        b
    }

    /// Source in point; the source out point follows from the record length.
    pub fn source_in(mut self, frames: u64) -> Self {
        self.src_in = frames;
        self
    }

    pub fn dissolve(mut self, frames: u32) -> Self {
        self.transition = Transition::Dissolve(frames);
        self
    }

    pub fn link_audio(mut self, index: u32) -> Self {
        self.linked_audio.push(index);
        self
    }

    pub fn file(mut self, name: impl Into<String>) -> Self {
        self.source_filename = Some(name.into());
        self
    }

    pub fn marker(mut self, frame: u64, label: impl Into<String>) -> Self {
        self.markers.push((frame, label.into()));
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text.into());
        self
    }

    pub fn build(self, rate: FrameRate, event_id: u32) -> EdlResult<Event> {
        if self.record.end <= self.record.start {
            return Err(EdlError::InvalidRange {
                in_frame: self.record.start,
                out_frame: self.record.end,
                at: Location::Event(event_id),
            });
        }
        let len = self.record.end - self.record.start;
        let event = Event {
            event_id,
            reel: self.reel,
            channel: self.channel,
            linked_audio: self.linked_audio,
            transition: self.transition,
            src_in: Timecode::new(self.src_in, rate),
            src_out: Timecode::new(self.src_in + len, rate),
            rec_in: Timecode::new(self.record.start, rate),
            rec_out: Timecode::new(self.record.end, rate),
            source_filename: self.source_filename,
            markers: self
                .markers
                .into_iter()
                .map(|(frame, label)| Marker {
                    position: Timecode::new(frame, rate),
                    label,
                })
                .collect(),
            comments: self.comments,
            is_gap: self.is_gap,
        };
        event.validate(rate)?;
        Ok(event)
    }
}

pub struct TimelineBuilder {
    title: String,
    rate: FrameRate,
    comments: Vec<String>,
    events: Vec<EventBuilder>,
}

impl TimelineBuilder {
    pub fn new(title: impl Into<String>, rate: FrameRate) -> Self {
        Self {
            title: title.into(),
            rate,
            comments: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text.into());
        self
    }

    pub fn event(mut self, event: EventBuilder) -> Self {
        self.events.push(event);
        self
    }

    /// Build, number events in emission order, and validate.
    pub fn build(self) -> EdlResult<Timeline> {
        let mut timeline = Timeline::new(self.title, self.rate);
        timeline.comments = self.comments;
        for event in self.events {
            timeline.push(event.build(self.rate, 0)?);
        }
        for track in &mut timeline.tracks {
            track.events.sort_by_key(|e| e.rec_in);
        }
        let timeline = timeline.renumbered();
        timeline.validate()?;
        Ok(timeline)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/dsl.rs"]
mod tests;
