//! Optional `gsx.toml` settings for external-function components.
//!
//! The host gives components no configuration channel of their own, so
//! anything tunable (like where the recorder writes its files) comes
//! from a small toml file looked up next to the process. Every setting
//! has a default; a missing file is not an error.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the time-series recorder component.
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderSettings {
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        RecorderSettings {
            output_dir: PathBuf::from("."),
            file_prefix: String::from("timeseries_"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RecorderToml {
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    file_prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    recorder: Option<RecorderToml>,
}

/// Candidate locations, relative to the host's working directory.
const CONFIG_PATHS: &[&str] = &["gsx.toml", "configs/gsx.toml"];

/// Load recorder settings from the first `gsx.toml` found, falling
/// back to defaults when no file exists. A file that exists but does
/// not parse is an error; silently ignoring it would hide typos.
pub fn load_recorder_settings() -> anyhow::Result<RecorderSettings> {
    for path in CONFIG_PATHS {
        let path = Path::new(path);
        if path.exists() {
            return recorder_settings_from_path(path);
        }
    }
    Ok(RecorderSettings::default())
}

/// Parse recorder settings from a specific file.
pub fn recorder_settings_from_path(path: &Path) -> anyhow::Result<RecorderSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let root: RootConfigToml = toml::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;

    let defaults = RecorderSettings::default();
    let Some(recorder) = root.recorder else {
        return Ok(defaults);
    };
    Ok(RecorderSettings {
        output_dir: recorder.output_dir.unwrap_or(defaults.output_dir),
        file_prefix: recorder.file_prefix.unwrap_or(defaults.file_prefix),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_table_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# no recorder table here").unwrap();
        let settings = recorder_settings_from_path(file.path()).unwrap();
        assert_eq!(settings, RecorderSettings::default());
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[recorder]\noutput_dir = \"/tmp/gsx\"").unwrap();
        let settings = recorder_settings_from_path(file.path()).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/gsx"));
        assert_eq!(settings.file_prefix, "timeseries_");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[recorder\noops").unwrap();
        assert!(recorder_settings_from_path(file.path()).is_err());
    }
}
