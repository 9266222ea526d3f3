use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::{FrameRate, Timecode},
    error::{EdlError, EdlResult, Location},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Physical channel an event is recorded onto. Video always sorts before audio.
pub enum Channel {
    /// The program video channel.
    Video,
    /// A 1-based audio channel.
    Audio(u32),
}

impl Channel {
    pub fn audio(index: u32) -> EdlResult<Self> {
        if index == 0 {
            return Err(EdlError::validation("audio channel index must be >= 1"));
        }
        Ok(Self::Audio(index))
    }

    pub fn is_audio(self) -> bool {
        matches!(self, Self::Audio(_))
    }

    pub fn audio_index(self) -> Option<u32> {
        match self {
            Self::Video => None,
            Self::Audio(n) => Some(n),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("V"),
            Self::Audio(n) => write!(f, "A{n}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How the program enters an event.
pub enum Transition {
    /// Hard cut.
    #[default]
    Cut,
    /// Cross-dissolve over the given number of frames.
    Dissolve(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A labelled position on the record side.
pub struct Marker {
    pub position: Timecode,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One interchange record: a source range laid onto a record range.
///
/// Events are never retimed: source and record spans always have the same length.
pub struct Event {
    /// Event number as read or as last renumbered. Writers assign their own.
    pub event_id: u32,
    /// Source reel identifier.
    pub reel: String,
    /// Primary channel this event is recorded on.
    pub channel: Channel,
    /// Extra audio channels cut together with this event (continuation lines).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_audio: Vec<u32>,
    #[serde(default)]
    pub transition: Transition,
    pub src_in: Timecode,
    pub src_out: Timecode,
    pub rec_in: Timecode,
    pub rec_out: Timecode,
    /// Media file name carried as a clip-name comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
    /// Unrecognized comment lines, kept verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// Synthetic black/silence filling uncovered record time.
    #[serde(default)]
    pub is_gap: bool,
}

impl Event {
    /// A black/silence event covering `rec_in..rec_out` on `channel`.
    pub fn gap(channel: Channel, reel: &str, rec_in: Timecode, rec_out: Timecode) -> Self {
        let len = rec_out.frames().saturating_sub(rec_in.frames());
        let rate = rec_in.rate();
        Self {
            event_id: 0,
            reel: reel.to_string(),
            channel,
            linked_audio: Vec::new(),
            transition: Transition::Cut,
            src_in: Timecode::zero(rate),
            src_out: Timecode::new(len, rate),
            rec_in,
            rec_out,
            source_filename: None,
            markers: Vec::new(),
            comments: Vec::new(),
            is_gap: true,
        }
    }

    pub fn record_frames(&self) -> u64 {
        self.rec_out.frames().saturating_sub(self.rec_in.frames())
    }

    pub fn source_frames(&self) -> u64 {
        self.src_out.frames().saturating_sub(self.src_in.frames())
    }

    pub fn location(&self) -> Location {
        Location::Event(self.event_id)
    }

    /// Check the per-record invariants: positive record span, no retiming, one rate.
    pub fn validate(&self, rate: FrameRate) -> EdlResult<()> {
        let at = self.location();
        let markers = self.markers.iter().map(|m| m.position);
        for tc in [self.src_in, self.src_out, self.rec_in, self.rec_out]
            .into_iter()
            .chain(markers)
        {
            if tc.rate() != rate {
                return Err(EdlError::validation(format!(
                    "event {:03} mixes {} with timeline rate {rate}",
                    self.event_id,
                    tc.rate()
                )));
            }
        }
        if self.rec_out <= self.rec_in {
            return Err(EdlError::InvalidRange {
                in_frame: self.rec_in.frames(),
                out_frame: self.rec_out.frames(),
                at,
            });
        }
        if self.src_out <= self.src_in {
            return Err(EdlError::InvalidRange {
                in_frame: self.src_in.frames(),
                out_frame: self.src_out.frames(),
                at,
            });
        }
        if self.source_frames() != self.record_frames() {
            return Err(EdlError::DurationMismatch {
                source_frames: self.source_frames(),
                record_frames: self.record_frames(),
                at,
            });
        }
        if let Transition::Dissolve(0) = self.transition {
            return Err(EdlError::validation(format!(
                "event {:03} has a zero-length dissolve",
                self.event_id
            )));
        }
        if self.is_gap && self.source_filename.is_some() {
            return Err(EdlError::validation(format!(
                "gap event {:03} must not carry a source file name",
                self.event_id
            )));
        }
        for &index in &self.linked_audio {
            if index == 0 || Some(index) == self.channel.audio_index() {
                return Err(EdlError::validation(format!(
                    "event {:03} links invalid audio channel {index}",
                    self.event_id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// All events recorded on one channel, in record order.
pub struct Track {
    pub channel: Channel,
    pub events: Vec<Event>,
}

impl Track {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            events: Vec::new(),
        }
    }

    /// Events must be sorted by `rec_in` and must not overlap.
    pub fn validate_order(&self) -> EdlResult<()> {
        check_order(self.channel, &self.events)
    }

    pub fn end(&self) -> u64 {
        self.events
            .iter()
            .map(|e| e.rec_out.frames())
            .max()
            .unwrap_or(0)
    }
}

pub(crate) fn check_order(channel: Channel, events: &[Event]) -> EdlResult<()> {
    for pair in events.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.rec_in < prev.rec_in {
            return Err(EdlError::OutOfOrderEvents {
                channel: channel.to_string(),
                message: format!(
                    "event {:03} starts at {} before event {:03} at {}",
                    next.event_id, next.rec_in, prev.event_id, prev.rec_in
                ),
                at: next.location(),
            });
        }
        if next.rec_in < prev.rec_out {
            return Err(EdlError::OutOfOrderEvents {
                channel: channel.to_string(),
                message: format!(
                    "event {:03} starts at {} inside event {:03} ending at {}",
                    next.event_id, next.rec_in, prev.event_id, prev.rec_out
                ),
                at: next.location(),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Dialect-agnostic edit list: the form every reader produces and every writer consumes.
pub struct Timeline {
    pub title: String,
    pub rate: FrameRate,
    /// Comment lines found before the first record, kept verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// One track per channel, sorted by channel (video first).
    pub tracks: Vec<Track>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A media reference recovered from a clip-name comment, for strip re-creation.
pub struct RecoveredMedia {
    pub event_id: u32,
    pub channel: Channel,
    pub filename: String,
}

impl Timeline {
    pub fn new(title: impl Into<String>, rate: FrameRate) -> Self {
        Self {
            title: title.into(),
            rate,
            comments: Vec::new(),
            tracks: Vec::new(),
        }
    }

    /// Append `event` to the track of its channel, creating the track in channel order.
    pub fn push(&mut self, event: Event) {
        let channel = event.channel;
        let idx = match self.tracks.binary_search_by(|t| t.channel.cmp(&channel)) {
            Ok(idx) => idx,
            Err(idx) => {
                self.tracks.insert(idx, Track::new(channel));
                idx
            }
        };
        self.tracks[idx].events.push(event);
    }

    pub fn track(&self, channel: Channel) -> Option<&Track> {
        self.tracks.iter().find(|t| t.channel == channel)
    }

    /// Events in emission order: video first, then audio by ascending index.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.tracks.iter().flat_map(|t| t.events.iter())
    }

    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(|t| t.events.len()).sum()
    }

    /// Last covered record frame across all channels.
    pub fn end(&self) -> u64 {
        self.tracks.iter().map(Track::end).max().unwrap_or(0)
    }

    /// Audio channel indices present as tracks or as linked audio.
    pub fn audio_channels(&self) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .tracks
            .iter()
            .filter_map(|t| t.channel.audio_index())
            .chain(self.events().flat_map(|e| e.linked_audio.iter().copied()))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn validate(&self) -> EdlResult<()> {
        if self.title.contains(['\n', '\r']) {
            return Err(EdlError::validation("timeline title must be a single line"));
        }
        for pair in self.tracks.windows(2) {
            if pair[0].channel >= pair[1].channel {
                return Err(EdlError::validation(format!(
                    "tracks must be unique and sorted by channel ({} before {})",
                    pair[0].channel, pair[1].channel
                )));
            }
        }
        for track in &self.tracks {
            for event in &track.events {
                if event.channel != track.channel {
                    return Err(EdlError::validation(format!(
                        "event {:03} on channel {} is stored in track {}",
                        event.event_id, event.channel, track.channel
                    )));
                }
                event.validate(self.rate)?;
            }
            track.validate_order()?;
        }
        Ok(())
    }

    /// Reassign event ids 1..N in emission order.
    pub fn renumbered(mut self) -> Self {
        let mut next = 1u32;
        for event in self.tracks.iter_mut().flat_map(|t| t.events.iter_mut()) {
            event.event_id = next;
            next += 1;
        }
        self
    }

    pub fn recovered_media(&self) -> Vec<RecoveredMedia> {
        self.events()
            .filter_map(|e| {
                e.source_filename.as_ref().map(|f| RecoveredMedia {
                    event_id: e.event_id,
                    channel: e.channel,
                    filename: f.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
