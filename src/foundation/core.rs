use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{EdlError, EdlResult, Location};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Integer frames-per-second shared by every timecode of one export/import job.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct FrameRate(u32);

impl FrameRate {
    /// Rates accepted by the common NLEs without warnings.
    pub const STANDARD: [u32; 4] = [24, 25, 30, 60];

    pub fn new(fps: u32) -> EdlResult<Self> {
        if fps == 0 {
            return Err(EdlError::validation("frame rate must be > 0"));
        }
        // FF is a two digit field.
        if fps > 99 {
            return Err(EdlError::validation(format!(
                "frame rate {fps} does not fit a two digit frame field"
            )));
        }
        Ok(Self(fps))
    }

    /// Round a host frame rate (e.g. `30000/1001`) to the nearest integer rate.
    pub fn from_host(fps: f64) -> EdlResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(EdlError::validation(format!(
                "host frame rate must be finite and > 0, got {fps}"
            )));
        }
        let rounded = fps.round();
        if rounded < 1.0 || rounded > f64::from(u32::MAX) {
            return Err(EdlError::validation(format!(
                "host frame rate {fps} rounds outside the supported range"
            )));
        }
        let rate = Self::new(rounded as u32)?;
        if !rate.is_standard() {
            tracing::warn!(host_fps = fps, rate = rate.0, "non-standard EDL frame rate");
        }
        Ok(rate)
    }

    pub fn fps(self) -> u32 {
        self.0
    }

    pub fn is_standard(self) -> bool {
        Self::STANDARD.contains(&self.0)
    }

    pub fn frames_per_day(self) -> u64 {
        u64::from(self.0) * SECS_PER_DAY
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = EdlError;

    fn try_from(value: u32) -> EdlResult<Self> {
        Self::new(value)
    }
}

impl From<FrameRate> for u32 {
    fn from(value: FrameRate) -> Self {
        value.0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fps", self.0)
    }
}

/// An absolute, non-drop-frame position. Frames wrap at 24 hours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawTimecode")]
pub struct Timecode {
    frames: u64,
    rate: FrameRate,
}

#[derive(Deserialize)]
struct RawTimecode {
    frames: u64,
    rate: FrameRate,
}

impl From<RawTimecode> for Timecode {
    fn from(raw: RawTimecode) -> Self {
        Timecode::new(raw.frames, raw.rate)
    }
}

impl Timecode {
    pub fn new(frames: u64, rate: FrameRate) -> Self {
        Self {
            frames: frames % rate.frames_per_day(),
            rate,
        }
    }

    pub fn zero(rate: FrameRate) -> Self {
        Self { frames: 0, rate }
    }

    pub fn frames(self) -> u64 {
        self.frames
    }

    pub fn rate(self) -> FrameRate {
        self.rate
    }

    /// Strict `HH:MM:SS:FF` parse.
    pub fn parse(text: &str, rate: FrameRate) -> EdlResult<Self> {
        Ok(Self {
            frames: to_frames(text, rate)?,
            rate,
        })
    }

    /// Frames from `self` to `end`; fails if `end` precedes `self`.
    pub fn duration_to(self, end: Timecode) -> EdlResult<u64> {
        duration(self, end)
    }

    pub fn offset(self, frames: u64) -> Self {
        Self::new(self.frames.saturating_add(frames), self.rate)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&from_frames(self.frames, self.rate))
    }
}

/// Render `frames` as `HH:MM:SS:FF`. Hours past 24 wrap.
pub fn from_frames(frames: u64, rate: FrameRate) -> String {
    let fps = u64::from(rate.fps());
    let frames = frames % rate.frames_per_day();
    let hh = frames / (fps * 3600);
    let mm = (frames / (fps * 60)) % 60;
    let ss = (frames / fps) % 60;
    let ff = frames % fps;
    format!("{hh:02}:{mm:02}:{ss:02}:{ff:02}")
}

/// Parse four colon/semicolon delimited two digit fields.
pub fn to_frames(text: &str, rate: FrameRate) -> EdlResult<u64> {
    let text = text.trim();
    let fields: Vec<&str> = text.split([':', ';']).collect();
    if fields.len() != 4 {
        return Err(EdlError::malformed_timecode(
            text,
            format!("expected 4 fields, found {}", fields.len()),
        ));
    }

    let mut values = [0u64; 4];
    for (slot, field) in values.iter_mut().zip(&fields) {
        if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EdlError::malformed_timecode(
                text,
                format!("field '{field}' is not two digits"),
            ));
        }
        *slot = field
            .parse()
            .map_err(|_| EdlError::malformed_timecode(text, "field is not numeric"))?;
    }

    let [hh, mm, ss, ff] = values;
    if hh >= 24 {
        return Err(EdlError::malformed_timecode(text, "hours must be < 24"));
    }
    if mm >= 60 || ss >= 60 {
        return Err(EdlError::malformed_timecode(
            text,
            "minutes and seconds must be < 60",
        ));
    }
    let fps = u64::from(rate.fps());
    if ff >= fps {
        return Err(EdlError::malformed_timecode(
            text,
            format!("frame field {ff} must be < {fps}"),
        ));
    }

    Ok(((hh * 60 + mm) * 60 + ss) * fps + ff)
}

/// `b - a` in frames; negative spans are an [`EdlError::InvalidRange`].
pub fn duration(a: Timecode, b: Timecode) -> EdlResult<u64> {
    b.frames
        .checked_sub(a.frames)
        .ok_or(EdlError::InvalidRange {
            in_frame: a.frames,
            out_frame: b.frames,
            at: Location::Unknown,
        })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
