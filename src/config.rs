//! Configuration module.
//!
//! Handles loading, validating, and merging `vice.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! 1. `--config <PATH>` on the command line (the file must exist)
//! 2. `vice.toml` in the current directory, if present
//! 3. Stock defaults otherwise
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! filter = "lanczos3"          # nearest | triangle | catmull-rom | gaussian | lanczos3
//! thumbnail_threshold = 401    # thumbnail decode when a resolved side is below this
//!
//! [limits]
//! max_pixels = 268435456       # largest surface decoded or rendered
//!
//! [output]
//! compression = "default"      # PNG effort: fast | default | best
//!
//! [processing]
//! offload_render = false       # render on a worker thread
//! max_processes = 4            # worker threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    DEFAULT_MAX_PIXELS, DEFAULT_THUMBNAIL_THRESHOLD, PngCompression, ResampleFilter,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "vice.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `vice.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViceConfig {
    /// Resampling and strategy settings.
    pub resize: ResizeConfig,
    /// Allocation limits.
    pub limits: LimitsConfig,
    /// Output encoding settings.
    pub output: OutputConfig,
    /// Worker settings.
    pub processing: ProcessingConfig,
}

impl ViceConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "limits.max_pixels must be positive".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Interpolation filter for the render path.
    pub filter: ResampleFilter,
    /// A resolved side below this many pixels makes the target thumbnail-sized.
    /// 0 disables the thumbnail path.
    pub thumbnail_threshold: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::default(),
            thumbnail_threshold: DEFAULT_THUMBNAIL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest surface, in pixels, that will be decoded or rendered.
    pub max_pixels: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// PNG compression effort.
    pub compression: PngCompression,
}

/// Worker settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Run the render step as a task on the worker pool.
    pub offload_render: bool,
    /// Maximum number of worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ViceConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ViceConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ViceConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `vice.toml` from `dir`, falling back to defaults when there is none.
pub fn load_config(dir: &Path) -> Result<ViceConfig, ConfigError> {
    resolve_config(load_raw_config(&dir.join(CONFIG_FILE_NAME))?)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<ViceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `vice.toml` with all keys and explanations.
///
/// Printed by `vice --gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Vice Configuration
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# vice reads ./vice.toml when present, or the file given with --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resizing
# ---------------------------------------------------------------------------
[resize]
# Interpolation filter used when redrawing an image.
# One of: nearest, triangle, catmull-rom, gaussian, lanczos3.
filter = "lanczos3"

# Portrait images going to a target with a side below this many pixels are
# downsampled while decoding instead of redrawn. 0 disables that path.
thumbnail_threshold = 401

# ---------------------------------------------------------------------------
# Limits
# ---------------------------------------------------------------------------
[limits]
# Largest surface, in pixels, that will be decoded or rendered.
max_pixels = 268435456

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# PNG compression effort: fast, default or best. Output is always lossless.
compression = "default"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Run the render step on a worker thread. Output is identical either way.
offload_render = false

# Maximum worker threads.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ViceConfig::default();
        assert_eq!(config.resize.filter, ResampleFilter::Lanczos3);
        assert_eq!(config.resize.thumbnail_threshold, 401);
        assert_eq!(config.limits.max_pixels, 16384 * 16384);
        assert_eq!(config.output.compression, PngCompression::Default);
        assert!(!config.processing.offload_render);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[resize]
filter = "triangle"
"#;
        let config: ViceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.resize.filter, ResampleFilter::Triangle);
        // Defaults preserved
        assert_eq!(config.resize.thumbnail_threshold, 401);
        assert_eq!(config.output.compression, PngCompression::Default);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ViceConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[output]
compression = "best"

[processing]
offload_render = true
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output.compression, PngCompression::Best);
        assert!(config.processing.offload_render);
        assert_eq!(config.resize.filter, ResampleFilter::Lanczos3);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not [valid").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_missing_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("elsewhere.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_file_reads_named_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[resize]\nthumbnail_threshold = 0\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.resize.thumbnail_threshold, 0);
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig::default();
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
            ..ProcessingConfig::default()
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
            ..ProcessingConfig::default()
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"compression = "fast""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"compression = "best""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("compression").unwrap().as_str(), Some("best"));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[resize]
filter = "lanczos3"
thumbnail_threshold = 401
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[resize]
filter = "nearest"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let resize = merged.get("resize").unwrap();
        assert_eq!(resize.get("filter").unwrap().as_str(), Some("nearest"));
        assert_eq!(
            resize.get("thumbnail_threshold").unwrap().as_integer(),
            Some(401)
        );
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ViceConfig, _> = toml::from_str("[resize]\nfilterr = \"nearest\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<ViceConfig, _> = toml::from_str("[colors]\nbackground = \"#fff\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_filter_rejected() {
        let result: Result<ViceConfig, _> = toml::from_str("[resize]\nfilter = \"bicubic\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_zero_max_pixels() {
        let mut config = ViceConfig::default();
        config.limits.max_pixels = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = ViceConfig::default();
        config.processing.max_processes = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[limits]\nmax_pixels = 0\n").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: ViceConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ViceConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[resize]", "[limits]", "[output]", "[processing]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        for key in ["resize", "limits", "output", "processing"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
