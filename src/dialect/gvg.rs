//! Grass Valley Group (GVG) list format.

use crate::{
    dialect::{
        config::ExportConfig,
        render::{EdlWriter, write_with},
        grammar::{AudioLayout, Dialect, DialectGrammar, ReelRule},
    },
    foundation::error::EdlResult,
    timeline::{gaps::GapPolicy, model::Timeline},
};

/// Four-digit event numbers; reels are exactly six alphanumerics.
pub static GRAMMAR: DialectGrammar = DialectGrammar {
    dialect: Dialect::Gvg,
    name: "GVG",
    suffix: "gvg",
    id_width: 4,
    reel: ReelRule::Alphanumeric { len: 6 },
    audio: AudioLayout::Discrete {
        max_channels: None,
        bare_first: true,
    },
    gaps: GapPolicy::Implicit,
    fcm_header: false,
    clip_comment: "* FROM CLIP NAME: ",
    marker_comment: "* LOC: ",
};

#[derive(Clone, Copy, Debug, Default)]
pub struct GvgWriter;

impl EdlWriter for GvgWriter {
    fn dialect(&self) -> Dialect {
        Dialect::Gvg
    }

    fn write(&self, timeline: &Timeline, config: &ExportConfig) -> EdlResult<String> {
        write_with(&GRAMMAR, timeline, config)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dialect/gvg.rs"]
mod tests;
