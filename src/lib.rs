//! edlkit converts editorial timelines to and from Edit Decision Lists.
//!
//! - Build or deserialize a [`Timeline`]
//! - Write it in one of four dialects with [`write`] (or a dialect's [`EdlWriter`])
//! - Read CMX 3600-style text back with [`parse`] or [`read`]
//!
//! Everything here is a pure function of its inputs. File and media lookup live in the
//! binary and in [`media`].
#![forbid(unsafe_code)]

mod foundation;

/// Dialect descriptions and writers.
pub mod dialect;
/// Finding media named in EDL comments.
pub mod media;
/// EDL text reader.
pub mod reader;
/// Dialect-agnostic timeline model.
pub mod timeline;

pub use crate::foundation::core::{FrameRate, Timecode, duration, from_frames, to_frames};
pub use crate::foundation::error::{EdlError, EdlResult, Location};

pub use crate::dialect::config::{AudioChannelConfig, DEFAULT_FILENAME_TEMPLATE, ExportConfig};
pub use crate::dialect::render::{EdlWriter, record_line, write_with};
pub use crate::dialect::grammar::{AudioLayout, Dialect, DialectGrammar, ReelRule};
pub use crate::media::resolver::{DirectoryResolver, MediaResolver, Resolution};
pub use crate::reader::detect::detect_dialect;
pub use crate::reader::parser::{ImportReport, ReadOptions, detect_rate_hint, parse, read};
pub use crate::timeline::dsl::{EventBuilder, TimelineBuilder};
pub use crate::timeline::gaps::{GAP_REEL, GapPolicy, fill_gaps, is_gap_reel, resolve_gaps};
pub use crate::timeline::model::{
    Channel, Event, Marker, RecoveredMedia, Timeline, Track, Transition,
};

/// Write `timeline` as `dialect`.
pub fn write(timeline: &Timeline, dialect: Dialect, config: &ExportConfig) -> EdlResult<String> {
    dialect.writer().write(timeline, config)
}
