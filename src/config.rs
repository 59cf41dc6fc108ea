//! Persisted display preference
//!
//! Stored as TOML:
//!
//! ```toml
//! [display]
//! mode = "sig"
//! digits = 4
//! ```
//!
//! Loading is lenient: a missing file, an unknown mode, or a non-positive digit
//! count each fall back to the default for that value. Only an unreadable or
//! syntactically broken file is an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::format::DisplayFormat;

/// Environment variable naming the preference file
pub const CONFIG_ENV: &str = "LSQCALC_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// On-disk layout written by [`save`]
#[derive(Debug, Clone, Serialize)]
struct Preferences {
    display: DisplayFormat,
}

/// On-disk layout accepted by [`load`]; every value is optional
#[derive(Debug, Default, Deserialize)]
struct RawPreferences {
    #[serde(default)]
    display: RawDisplay,
}

#[derive(Debug, Default, Deserialize)]
struct RawDisplay {
    mode: Option<String>,
    digits: Option<f64>,
}

/// Resolve the preference file location
///
/// Order: explicit path, `$LSQCALC_CONFIG`, `$HOME/.config/lsqcalc/config.toml`.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME")
        .filter(|p| !p.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join("lsqcalc").join("config.toml"))
}

/// Parse preference text
pub fn from_toml(text: &str) -> std::result::Result<DisplayFormat, toml::de::Error> {
    let raw: RawPreferences = toml::from_str(text)?;
    let mut format = DisplayFormat::default();
    format.apply(
        raw.display.mode.as_deref().unwrap_or(""),
        raw.display.digits.unwrap_or(f64::NAN),
    );
    Ok(format)
}

/// Render preference text
pub fn to_toml(format: &DisplayFormat) -> Result<String> {
    let prefs = Preferences { display: *format };
    Ok(toml::to_string(&prefs)?)
}

/// Load the preference, returning the default when the file does not exist
pub fn load(path: &Path) -> Result<DisplayFormat> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(DisplayFormat::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let format = from_toml(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), mode = %format.mode, digits = format.digits, "config loaded");
    Ok(format)
}

/// Write the preference, creating parent directories as needed
pub fn save(path: &Path, format: &DisplayFormat) -> Result<()> {
    let text = to_toml(format)?;
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, text).map_err(write_err)?;
    tracing::debug!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatMode;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let format = load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(format, DisplayFormat::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let format = DisplayFormat::new(FormatMode::DecimalPlaces, 7);

        save(&path, &format).unwrap();
        assert_eq!(load(&path).unwrap(), format);

        // Saving what was loaded changes nothing
        let first = std::fs::read_to_string(&path).unwrap();
        save(&path, &load(&path).unwrap()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_toml_layout() {
        let text = to_toml(&DisplayFormat::default()).unwrap();
        assert!(text.contains("[display]"));
        assert!(text.contains("mode = \"sig\""));
        assert!(text.contains("digits = 4"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let format = from_toml("[display]\nmode = \"roman\"\ndigits = 0\n").unwrap();
        assert_eq!(format, DisplayFormat::default());

        let format = from_toml("[display]\nmode = \"dec\"\ndigits = -3\n").unwrap();
        assert_eq!(format, DisplayFormat::new(FormatMode::DecimalPlaces, 4));

        let format = from_toml("[display]\ndigits = 6.8\n").unwrap();
        assert_eq!(format, DisplayFormat::new(FormatMode::SignificantFigures, 6));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(from_toml("").unwrap(), DisplayFormat::default());
    }

    #[test]
    fn test_broken_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\nmode = ").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_resolve_explicit_path_wins() {
        let path = Path::new("/tmp/explicit.toml");
        assert_eq!(resolve_path(Some(path)), Some(path.to_path_buf()));
    }
}
