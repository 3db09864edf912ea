use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Morph", inline)]
#[serde(default)]
/// Morph loop timing and representation-switch thresholds.
pub struct MorphOptions {
    /// Length of one disperse/reassemble loop in seconds.
    #[schemars(title = "Loop Length", range(min = 0.5, max = 20.0), extend("step" = 0.1))]
    pub loop_seconds: f32,
    /// Morph at which dispersal switches to point-cloud rendering.
    #[schemars(title = "Enter Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub enter_threshold: f32,
    /// Morph at which reassembly switches back to assembled rendering.
    #[schemars(title = "Exit Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub exit_threshold: f32,
    /// Morph below which the reveal window pre-stages the assembled look.
    /// Zero disables the reveal window.
    #[schemars(title = "Reveal Start", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub reveal_start_morph: f32,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            loop_seconds: 3.2,
            enter_threshold: 0.38,
            exit_threshold: 0.02,
            reveal_start_morph: 0.34,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Bridge", inline)]
#[serde(default)]
/// Colour-gain and element-scale smoothing across representation switches.
pub struct BridgeOptions {
    /// Duration of the luminance bridge in seconds.
    #[schemars(title = "Luminance Bridge", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub luminance_seconds: f32,
    /// Duration of the scale bridge in seconds.
    #[schemars(title = "Scale Bridge", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub scale_seconds: f32,
    /// Upper bound for the scale bridge's starting value.
    #[schemars(skip)]
    pub scale_bridge_cap: f32,
    /// Exponential smoothing time constant for colour gain.
    #[schemars(skip)]
    pub gain_tau: f32,
    /// Exponential smoothing time constant for element scale.
    #[schemars(skip)]
    pub scale_tau: f32,
    /// Maximum colour-gain rise per second.
    #[schemars(title = "Max Gain Rise", range(min = 0.01, max = 5.0), extend("step" = 0.01))]
    pub max_gain_rise: f32,
    /// Maximum colour-gain fall per second.
    #[schemars(title = "Max Gain Fall", range(min = 0.01, max = 10.0), extend("step" = 0.05))]
    pub max_gain_fall: f32,
    /// Element-scale multiplier while in point-cloud mode on mobile devices.
    #[schemars(skip)]
    pub constrained_scale_boost: f32,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            luminance_seconds: 0.32,
            scale_seconds: 0.28,
            scale_bridge_cap: 0.9,
            gain_tau: 0.18,
            scale_tau: 0.1,
            max_gain_rise: 0.35,
            max_gain_fall: 1.8,
            constrained_scale_boost: 1.18,
        }
    }
}
