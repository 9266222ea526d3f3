//! CMX 3600: the de-facto interchange EDL.
//!
//! Three-digit event numbers, free-form reels up to eight characters, `A`/`A2`.. audio
//! labels and no explicit black records.

use crate::{
    dialect::{
        config::ExportConfig,
        render::{EdlWriter, write_with},
        grammar::{AudioLayout, Dialect, DialectGrammar, ReelRule},
    },
    foundation::error::EdlResult,
    timeline::{gaps::GapPolicy, model::Timeline},
};

pub static GRAMMAR: DialectGrammar = DialectGrammar {
    dialect: Dialect::Cmx3600,
    name: "CMX 3600",
    suffix: "cmx3600",
    id_width: 3,
    reel: ReelRule::FreeForm { max_len: 8 },
    audio: AudioLayout::Discrete {
        max_channels: None,
        bare_first: true,
    },
    gaps: GapPolicy::Implicit,
    fcm_header: true,
    clip_comment: "* FROM CLIP NAME: ",
    marker_comment: "* LOC: ",
};

#[derive(Clone, Copy, Debug, Default)]
pub struct Cmx3600Writer;

impl EdlWriter for Cmx3600Writer {
    fn dialect(&self) -> Dialect {
        Dialect::Cmx3600
    }

    fn write(&self, timeline: &Timeline, config: &ExportConfig) -> EdlResult<String> {
        write_with(&GRAMMAR, timeline, config)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dialect/cmx3600.rs"]
mod tests;
