//! On-disk booth configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::capture::sequencer::{CaptureTimings, CountdownSecs};
use crate::catalog::filters::{DEFAULT_FILTER_KEY, filter_by_key};
use crate::catalog::themes::ThemeId;
use crate::compose::session::EditOptions;
use crate::export::format::ExportSettings;
use crate::foundation::error::{BoothError, BoothResult};

/// Environment variable that overrides [`BoothConfig::font_path`].
pub const FONT_ENV_VAR: &str = "KAWAII_BOOTH_FONT";

/// Capture delays plus the export settle delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoothTimings {
    /// Countdown, flash, settle and finish delays.
    #[serde(flatten)]
    pub capture: CaptureTimings,
    /// Delay between an export request and the raster.
    pub export_delay_ms: u64,
}

impl Default for BoothTimings {
    fn default() -> Self {
        Self {
            capture: CaptureTimings::default(),
            export_delay_ms: 200,
        }
    }
}

/// Booth configuration. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    /// Countdown before each shot.
    pub countdown_secs: CountdownSecs,
    /// Sequencer and export delays.
    pub timings: BoothTimings,
    /// Export encoding and density.
    pub export: ExportSettings,
    /// Font for captions and sticker glyphs. Without one, text is not drawn.
    pub font_path: Option<PathBuf>,
    /// Theme the editor opens with.
    pub default_theme: ThemeId,
    /// Filter the capture screen starts with.
    pub default_filter: String,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            countdown_secs: CountdownSecs::default(),
            timings: BoothTimings::default(),
            export: ExportSettings::default(),
            font_path: None,
            default_theme: ThemeId::default(),
            default_filter: DEFAULT_FILTER_KEY.to_string(),
        }
    }
}

impl BoothConfig {
    /// Parse config JSON from a reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> BoothResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| BoothError::serde(format!("parse booth config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse config JSON from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open booth config '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> BoothResult<()> {
        CountdownSecs::try_from(self.countdown_secs.secs())?;
        self.export.validate()?;
        let t = &self.timings.capture;
        if t.tick_ms == 0 {
            return Err(BoothError::validation("timings.tick_ms must be > 0"));
        }
        if t.flash_ms > t.settle_ms {
            return Err(BoothError::validation(
                "timings.flash_ms must not exceed timings.settle_ms",
            ));
        }
        if filter_by_key(&self.default_filter).is_none() {
            return Err(BoothError::validation(format!(
                "unknown default_filter '{}'",
                self.default_filter
            )));
        }
        Ok(())
    }

    /// Replace `font_path` when `value` is set and non-empty.
    pub fn with_font_override(mut self, value: Option<impl Into<PathBuf>>) -> Self {
        if let Some(path) = value.map(Into::into)
            && !path.as_os_str().is_empty()
        {
            self.font_path = Some(path);
        }
        self
    }

    /// Apply [`FONT_ENV_VAR`] from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_font_override(std::env::var_os(FONT_ENV_VAR))
    }

    /// Capture delays for [`crate::Sequencer::new`].
    pub fn capture_timings(&self) -> CaptureTimings {
        self.timings.capture
    }

    /// Edit-session options seeded with `seed` and showing `caption`.
    pub fn edit_options(&self, seed: u64, caption: Option<String>) -> EditOptions {
        EditOptions {
            seed,
            theme: self.default_theme,
            caption,
            export: self.export,
            export_delay: Duration::from_millis(self.timings.export_delay_ms),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
