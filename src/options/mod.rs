//! Centralized tuning options with TOML preset support.
//!
//! Every constant the morph controller and the marker engine use lives
//! here with its production value as the default. Options serialize
//! to/from TOML so hosts can ship presets, and a JSON schema describes the
//! subset worth exposing in a settings UI.

mod markers;
mod morph;
mod performance;

use std::path::Path;

pub use markers::{MarkerOptions, OcclusionOptions, PhysicsOptions};
pub use morph::{BridgeOptions, MorphOptions};
pub use performance::{
    DeviceClass, PerformanceLevel, PerformanceOptions, TierTable,
    UnknownPerformanceLevel,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MorphoError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[markers]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Morph loop and representation thresholds.
    pub morph: MorphOptions,
    /// Colour-gain and scale bridges.
    pub bridge: BridgeOptions,
    /// Marker scheduling and appearance.
    pub markers: MarkerOptions,
    /// Marker force model.
    pub physics: PhysicsOptions,
    /// Occlusion probe budget.
    pub occlusion: OcclusionOptions,
    /// Device class and performance tier.
    pub performance: PerformanceOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::Io`] if the file cannot be read and
    /// [`MorphoError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, MorphoError> {
        let content = std::fs::read_to_string(path).map_err(MorphoError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::OptionsParse`] on malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, MorphoError> {
        toml::from_str(content)
            .map_err(|e| MorphoError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), MorphoError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MorphoError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MorphoError::Io)?;
        }
        std::fs::write(path, content).map_err(MorphoError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[morph]
loop_seconds = 4.0

[performance]
device = "mobile"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.morph.loop_seconds, 4.0);
        assert_eq!(opts.performance.device, DeviceClass::Mobile);
        // Everything else should be default
        assert_eq!(opts.morph.enter_threshold, 0.38);
        assert_eq!(opts.bridge.max_gain_fall, 1.8);
        assert_eq!(opts.occlusion.alpha_threshold, 14);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml_str("[morph\nloop_seconds = ").unwrap_err();
        assert!(matches!(err, MorphoError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load_and_list() {
        let dir = std::env::temp_dir()
            .join(format!("morpho-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.markers.text_probability = 0.2;
        opts.save(&dir.join("calm.toml")).unwrap();

        let loaded = Options::load(&dir.join("calm.toml")).unwrap();
        assert_eq!(loaded.markers.text_probability, 0.2);
        assert_eq!(Options::list_presets(&dir), vec!["calm".to_owned()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in
            ["morph", "bridge", "markers", "physics", "occlusion", "performance"]
        {
            assert!(props.contains_key(section), "missing {section}");
        }

        let morph = &props["morph"]["properties"];
        assert!(morph.get("loop_seconds").is_some());
        let markers = &props["markers"]["properties"];
        assert!(markers.get("text_probability").is_some());
        assert!(markers.get("palette").is_none());
    }
}
