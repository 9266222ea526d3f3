use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{FrameRate, Timecode},
    timeline::model::{Channel, Event},
};

/// Reel written for synthetic black/silence records.
pub const GAP_REEL: &str = "BL";

/// Reel names read back as black/silence (case-insensitive).
pub const GAP_REELS: [&str; 4] = ["BL", "BLK", "BLACK", "BW"];

pub fn is_gap_reel(reel: &str) -> bool {
    GAP_REELS.iter().any(|g| g.eq_ignore_ascii_case(reel))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Whether a dialect leaves uncovered record time implicit or spells it out.
pub enum GapPolicy {
    /// Absence of a record is the gap.
    Implicit,
    /// Every uncovered interval gets a black record.
    Explicit,
}

impl GapPolicy {
    /// Apply the policy to one channel's events. `Implicit` is a no-op.
    pub fn apply(self, channel: Channel, events: Vec<Event>, extent: u64, rate: FrameRate) -> Vec<Event> {
        match self {
            Self::Implicit => events,
            Self::Explicit => fill_gaps(channel, events, extent, rate),
        }
    }
}

/// Synthetic gap events covering `[0, extent)` minus the record ranges of `events`.
///
/// `events` must be sorted by `rec_in`. Overlapping inputs are tolerated: coverage
/// only ever moves forward.
#[tracing::instrument(skip(events))]
pub fn resolve_gaps(channel: Channel, events: &[Event], extent: u64, rate: FrameRate) -> Vec<Event> {
    let mut gaps = Vec::new();
    let mut cursor = 0u64;
    for event in events {
        let start = event.rec_in.frames();
        if start > cursor {
            gaps.push(gap_event(channel, cursor, start, rate));
        }
        cursor = cursor.max(event.rec_out.frames());
    }
    if extent > cursor {
        gaps.push(gap_event(channel, cursor, extent, rate));
    }
    tracing::debug!(%channel, gaps = gaps.len(), "resolved gaps");
    gaps
}

/// `events` with [`resolve_gaps`] merged in, in record order.
pub fn fill_gaps(channel: Channel, events: Vec<Event>, extent: u64, rate: FrameRate) -> Vec<Event> {
    let gaps = resolve_gaps(channel, &events, extent, rate);
    let mut out = Vec::with_capacity(events.len() + gaps.len());
    let mut gaps = gaps.into_iter().peekable();
    for event in events {
        while let Some(gap) = gaps.next_if(|g| g.rec_in < event.rec_in) {
            out.push(gap);
        }
        out.push(event);
    }
    out.extend(gaps);
    out
}

fn gap_event(channel: Channel, start: u64, end: u64, rate: FrameRate) -> Event {
    Event::gap(
        channel,
        GAP_REEL,
        Timecode::new(start, rate),
        Timecode::new(end, rate),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/gaps.rs"]
mod tests;
