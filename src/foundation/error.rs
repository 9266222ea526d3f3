use std::fmt;

use serde::{Deserialize, Serialize};

pub type EdlResult<T> = Result<T, EdlError>;

/// Where in the input (or output) an error was detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// 1-based physical line number of the EDL text.
    Line(usize),
    /// Event number of the offending record.
    Event(u32),
    #[default]
    Unknown,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(n) => write!(f, "line {n}"),
            Location::Event(id) => write!(f, "event {id:03}"),
            Location::Unknown => f.write_str("unknown location"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EdlError {
    #[error("malformed timecode: '{text}' ({reason}) at {at}")]
    MalformedTimecode {
        text: String,
        reason: String,
        at: Location,
    },

    #[error("invalid range: out {out_frame} <= in {in_frame} at {at}")]
    InvalidRange {
        in_frame: u64,
        out_frame: u64,
        at: Location,
    },

    #[error("duration mismatch: source {source_frames} frames, record {record_frames} frames at {at}")]
    DurationMismatch {
        source_frames: u64,
        record_frames: u64,
        at: Location,
    },

    #[error("reel name invalid: '{reel}' ({rule}) at {at}")]
    ReelNameInvalid {
        reel: String,
        rule: String,
        at: Location,
    },

    #[error("reel name too long: '{reel}' exceeds {max} characters at {at}")]
    ReelNameTooLong {
        reel: String,
        max: usize,
        at: Location,
    },

    #[error("unsupported audio channel: {dialect} allows {max} audio channels, got {requested} at {at}")]
    UnsupportedAudioChannel {
        dialect: &'static str,
        max: u32,
        requested: String,
        at: Location,
    },

    #[error("out of order events on channel {channel}: {message} at {at}")]
    OutOfOrderEvents {
        channel: String,
        message: String,
        at: Location,
    },

    #[error("unrecognized record: '{text}' at {at}")]
    UnrecognizedRecord { text: String, at: Location },

    #[error("unsupported: {what} at {at}")]
    Unsupported { what: String, at: Location },

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EdlError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed_timecode(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTimecode {
            text: text.into(),
            reason: reason.into(),
            at: Location::Unknown,
        }
    }

    pub fn unrecognized(text: impl Into<String>, at: Location) -> Self {
        Self::UnrecognizedRecord {
            text: text.into(),
            at,
        }
    }

    pub fn unsupported(what: impl Into<String>, at: Location) -> Self {
        Self::Unsupported {
            what: what.into(),
            at,
        }
    }

    /// Attach `location` to a located variant. Variants without a location are returned as-is.
    pub fn at(mut self, location: Location) -> Self {
        match &mut self {
            Self::MalformedTimecode { at, .. }
            | Self::InvalidRange { at, .. }
            | Self::DurationMismatch { at, .. }
            | Self::ReelNameInvalid { at, .. }
            | Self::ReelNameTooLong { at, .. }
            | Self::UnsupportedAudioChannel { at, .. }
            | Self::OutOfOrderEvents { at, .. }
            | Self::UnrecognizedRecord { at, .. }
            | Self::Unsupported { at, .. } => *at = location,
            Self::Validation(_) | Self::Other(_) => {}
        }
        self
    }

    pub fn location(&self) -> Location {
        match self {
            Self::MalformedTimecode { at, .. }
            | Self::InvalidRange { at, .. }
            | Self::DurationMismatch { at, .. }
            | Self::ReelNameInvalid { at, .. }
            | Self::ReelNameTooLong { at, .. }
            | Self::UnsupportedAudioChannel { at, .. }
            | Self::OutOfOrderEvents { at, .. }
            | Self::UnrecognizedRecord { at, .. }
            | Self::Unsupported { at, .. } => *at,
            Self::Validation(_) | Self::Other(_) => Location::Unknown,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
