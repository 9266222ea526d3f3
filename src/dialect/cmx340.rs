use crate::{
    dialect::{
        config::ExportConfig,
        render::{EdlWriter, write_with},
        grammar::{AudioLayout, Dialect, DialectGrammar, ReelRule},
    },
    foundation::error::EdlResult,
    timeline::{gaps::GapPolicy, model::Timeline},
};

/// CMX 340: three-digit numeric reels and at most two audio channels, written `A1`/`A2`.
pub static GRAMMAR: DialectGrammar = DialectGrammar {
    dialect: Dialect::Cmx340,
    name: "CMX 340",
    suffix: "cmx340",
    id_width: 3,
    reel: ReelRule::Numeric { len: 3 },
    audio: AudioLayout::Discrete {
        max_channels: Some(2),
        bare_first: false,
    },
    gaps: GapPolicy::Implicit,
    fcm_header: false,
    clip_comment: "* FROM CLIP NAME: ",
    marker_comment: "* LOC: ",
};

#[derive(Clone, Copy, Debug, Default)]
pub struct Cmx340Writer;

impl EdlWriter for Cmx340Writer {
    fn dialect(&self) -> Dialect {
        Dialect::Cmx340
    }

    fn write(&self, timeline: &Timeline, config: &ExportConfig) -> EdlResult<String> {
        write_with(&GRAMMAR, timeline, config)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dialect/cmx340.rs"]
mod tests;
