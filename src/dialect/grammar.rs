use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    dialect::{cmx340, cmx3600, gvg, openshot, render::EdlWriter},
    foundation::error::{EdlError, EdlResult, Location},
    timeline::gaps::GapPolicy,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The four supported EDL dialects.
pub enum Dialect {
    Cmx3600,
    OpenShot,
    Gvg,
    Cmx340,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Cmx3600,
        Dialect::OpenShot,
        Dialect::Gvg,
        Dialect::Cmx340,
    ];

    pub fn grammar(self) -> &'static DialectGrammar {
        match self {
            Self::Cmx3600 => &cmx3600::GRAMMAR,
            Self::OpenShot => &openshot::GRAMMAR,
            Self::Gvg => &gvg::GRAMMAR,
            Self::Cmx340 => &cmx340::GRAMMAR,
        }
    }

    pub fn name(self) -> &'static str {
        self.grammar().name
    }

    pub fn writer(self) -> Box<dyn EdlWriter> {
        match self {
            Self::Cmx3600 => Box::new(cmx3600::Cmx3600Writer),
            Self::OpenShot => Box::new(openshot::OpenShotWriter),
            Self::Gvg => Box::new(gvg::GvgWriter),
            Self::Cmx340 => Box::new(cmx340::Cmx340Writer),
        }
    }

    /// Expand `{stem}` and `{dialect}` in `template`.
    pub fn output_filename(self, stem: &str, template: &str) -> String {
        template
            .replace("{stem}", stem)
            .replace("{dialect}", self.grammar().suffix)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = EdlError;

    fn from_str(s: &str) -> EdlResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "cmx3600" | "cmx" => Ok(Self::Cmx3600),
            "openshot" | "kdenlive" => Ok(Self::OpenShot),
            "gvg" | "grassvalley" => Ok(Self::Gvg),
            "cmx340" => Ok(Self::Cmx340),
            _ => Err(EdlError::validation(format!("unknown EDL dialect '{s}'"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Reel name constraint of a dialect. Names are never truncated.
pub enum ReelRule {
    /// Any non-blank name without whitespace, up to `max_len` characters.
    FreeForm { max_len: usize },
    /// Exactly `len` ASCII letters or digits.
    Alphanumeric { len: usize },
    /// Exactly `len` ASCII digits.
    Numeric { len: usize },
}

impl ReelRule {
    /// Column width of the reel field.
    pub fn width(self) -> usize {
        match self {
            Self::FreeForm { max_len } => max_len,
            Self::Alphanumeric { len } | Self::Numeric { len } => len,
        }
    }

    pub fn check(self, reel: &str, at: Location) -> EdlResult<()> {
        let invalid = |rule: String| EdlError::ReelNameInvalid {
            reel: reel.to_string(),
            rule,
            at,
        };
        // A record whose reel reads `AUD` is taken for a linked-audio continuation.
        if reel.eq_ignore_ascii_case("AUD") {
            return Err(invalid("'AUD' is reserved for linked audio".into()));
        }
        let len = reel.chars().count();
        match self {
            Self::FreeForm { max_len } => {
                if reel.is_empty() || reel.chars().any(char::is_whitespace) {
                    return Err(invalid("must be non-empty without whitespace".into()));
                }
                if len > max_len {
                    return Err(EdlError::ReelNameTooLong {
                        reel: reel.to_string(),
                        max: max_len,
                        at,
                    });
                }
            }
            Self::Alphanumeric { len: want } | Self::Numeric { len: want } => {
                let numeric = matches!(self, Self::Numeric { .. });
                let ok_char = |c: char| {
                    if numeric {
                        c.is_ascii_digit()
                    } else {
                        c.is_ascii_alphanumeric()
                    }
                };
                let kind = if numeric { "digits" } else { "alphanumeric characters" };
                if !reel.chars().all(ok_char) {
                    return Err(invalid(format!("must be exactly {want} {kind}")));
                }
                if len > want {
                    return Err(EdlError::ReelNameTooLong {
                        reel: reel.to_string(),
                        max: want,
                        at,
                    });
                }
                if len < want {
                    return Err(invalid(format!("must be exactly {want} {kind}")));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How audio channels are laid out in the record stream.
pub enum AudioLayout {
    /// One record stream per audio channel, linked audio as continuation lines.
    Discrete {
        max_channels: Option<u32>,
        /// Audio 1 is written as `A` rather than `A1`.
        bare_first: bool,
    },
    /// Every audio channel collapses into one stream labelled `A`.
    Unified,
}

impl AudioLayout {
    pub fn label(self, index: u32) -> String {
        match self {
            Self::Discrete {
                bare_first: true, ..
            } if index == 1 => "A".to_string(),
            Self::Discrete { .. } => format!("A{index}"),
            Self::Unified => "A".to_string(),
        }
    }

    pub fn max_channels(self) -> Option<u32> {
        match self {
            Self::Discrete { max_channels, .. } => max_channels,
            Self::Unified => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
/// Everything that distinguishes one dialect's record grammar from another's.
pub struct DialectGrammar {
    pub dialect: Dialect,
    pub name: &'static str,
    /// Used in generated output file names.
    pub suffix: &'static str,
    pub id_width: usize,
    pub reel: ReelRule,
    pub audio: AudioLayout,
    pub gaps: GapPolicy,
    /// Emit `FCM: NON-DROP FRAME` after the title.
    pub fcm_header: bool,
    pub clip_comment: &'static str,
    pub marker_comment: &'static str,
}

impl DialectGrammar {
    pub fn links_audio(&self) -> bool {
        matches!(self.audio, AudioLayout::Discrete { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dialect/grammar.rs"]
mod tests;
