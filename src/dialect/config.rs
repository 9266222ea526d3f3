use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{EdlError, EdlResult},
    timeline::model::Timeline,
};

pub const DEFAULT_FILENAME_TEMPLATE: &str = "{stem}_{dialect}.edl";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One audio channel selected for export.
pub struct AudioChannelConfig {
    pub index: u32,
    /// Muted channels are left out of the output.
    #[serde(default)]
    pub muted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Writer configuration. Every field has a default, so `{}` is a valid config file.
pub struct ExportConfig {
    /// Overrides [`Timeline::title`] in the header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Channel field written for video records.
    pub video_label: String,
    /// Audio channels to export. Empty means every audio channel in the timeline.
    pub audio_channels: Vec<AudioChannelConfig>,
    /// Append the frame rate to the `TITLE:` line.
    pub frame_rate_hint: bool,
    /// Output file name pattern, see [`crate::Dialect::output_filename`].
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: None,
            video_label: "V".to_string(),
            audio_channels: Vec::new(),
            frame_rate_hint: false,
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
        }
    }
}

impl ExportConfig {
    pub fn with_audio(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.audio_channels = indices
            .into_iter()
            .map(|index| AudioChannelConfig {
                index,
                muted: false,
            })
            .collect();
        self
    }

    pub fn validate(&self) -> EdlResult<()> {
        let label = self.video_label.as_str();
        if label.is_empty() || label.len() > 4 || label.chars().any(|c| c.is_whitespace()) {
            return Err(EdlError::validation(format!(
                "video_label '{label}' must be 1-4 non-whitespace characters"
            )));
        }
        if let Some(title) = &self.title
            && title.contains(['\n', '\r'])
        {
            return Err(EdlError::validation("title must be a single line"));
        }
        let mut seen = Vec::with_capacity(self.audio_channels.len());
        for ch in &self.audio_channels {
            if ch.index == 0 {
                return Err(EdlError::validation("audio channel index must be >= 1"));
            }
            if seen.contains(&ch.index) {
                return Err(EdlError::validation(format!(
                    "audio channel {} configured twice",
                    ch.index
                )));
            }
            seen.push(ch.index);
        }
        if !self.filename_template.contains("{stem}") {
            return Err(EdlError::validation(
                "filename_template must contain '{stem}'",
            ));
        }
        Ok(())
    }

    /// Sorted audio channel indices that will be written for `timeline`.
    pub fn effective_audio(&self, timeline: &Timeline) -> Vec<u32> {
        if self.audio_channels.is_empty() {
            return timeline.audio_channels();
        }
        let mut out: Vec<u32> = self
            .audio_channels
            .iter()
            .filter(|c| !c.muted)
            .map(|c| c.index)
            .collect();
        out.sort_unstable();
        out
    }

    pub fn title<'a>(&'a self, timeline: &'a Timeline) -> &'a str {
        self.title.as_deref().unwrap_or(&timeline.title)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dialect/config.rs"]
mod tests;
