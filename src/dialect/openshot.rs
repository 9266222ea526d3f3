//! OpenShot-flavoured CMX 3600.
//!
//! Same record grammar as CMX 3600, but every audio channel is folded into a single
//! `A` stream, uncovered record time is written as `BL` records, and media paths
//! travel in `* SOURCE FILE:` comments.

use crate::{
    dialect::{
        config::ExportConfig,
        render::{EdlWriter, write_with},
        grammar::{AudioLayout, Dialect, DialectGrammar, ReelRule},
    },
    foundation::error::EdlResult,
    timeline::{
        gaps::GapPolicy,
        model::{Channel, Event, Timeline, check_order},
    },
};

pub static GRAMMAR: DialectGrammar = DialectGrammar {
    dialect: Dialect::OpenShot,
    name: "OpenShot",
    suffix: "openshot",
    id_width: 3,
    reel: ReelRule::FreeForm { max_len: 8 },
    audio: AudioLayout::Unified,
    gaps: GapPolicy::Explicit,
    fcm_header: true,
    clip_comment: "* SOURCE FILE: ",
    marker_comment: "* MARKER: ",
};

/// Channel of the merged audio stream.
pub const UNIFIED_AUDIO: Channel = Channel::Audio(1);

/// Merge the exported audio of `timeline` into one stream.
///
/// Audio-track events on a channel in `audio` are taken as they are; linked audio of
/// video events becomes a separate audio event over the same range. Exact duplicates
/// (same reel and ranges) are written once. The merged stream cannot overlap itself,
/// so two different clips sharing record time fail with `OutOfOrderEvents`.
pub(crate) fn unify_audio(timeline: &Timeline, audio: &[u32]) -> EdlResult<Vec<Event>> {
    let mut merged: Vec<Event> = Vec::new();
    for event in timeline.events().filter(|e| !e.is_gap) {
        let wanted = match event.channel {
            Channel::Video => event.linked_audio.iter().any(|i| audio.contains(i)),
            Channel::Audio(index) => audio.contains(&index),
        };
        if !wanted {
            continue;
        }
        let mut copy = event.clone();
        copy.channel = UNIFIED_AUDIO;
        copy.linked_audio.clear();
        if event.channel == Channel::Video {
            copy.transition = Default::default();
            copy.markers.clear();
            copy.comments.clear();
        }
        merged.push(copy);
    }
    merged.sort_by_key(|e| e.rec_in);
    merged.dedup_by(|b, a| {
        a.reel == b.reel
            && a.src_in == b.src_in
            && a.rec_in == b.rec_in
            && a.rec_out == b.rec_out
    });

    check_order(UNIFIED_AUDIO, &merged)?;
    tracing::debug!(events = merged.len(), "unified audio stream");
    Ok(merged)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OpenShotWriter;

impl EdlWriter for OpenShotWriter {
    fn dialect(&self) -> Dialect {
        Dialect::OpenShot
    }

    fn write(&self, timeline: &Timeline, config: &ExportConfig) -> EdlResult<String> {
        write_with(&GRAMMAR, timeline, config)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dialect/openshot.rs"]
mod tests;
