use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Host device class. Mobile-class devices get sparser markers, cheaper
/// probes and a larger point-cloud element scale.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Desktop or laptop with a full GPU budget.
    #[default]
    Desktop,
    /// Phone or tablet; treated as a constrained device.
    Mobile,
}

impl DeviceClass {
    /// Whether the device is constrained (mobile-class).
    pub fn is_constrained(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

/// Performance tier requested by the host.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    /// Full quality.
    #[default]
    High,
    /// Reduced marker count, slower probes, lower pixel density.
    Low,
}

impl PerformanceLevel {
    /// Whether this is the reduced tier.
    pub fn is_low(self) -> bool {
        matches!(self, Self::Low)
    }
}

/// Error for performance level names other than `high` / `low`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPerformanceLevel(pub String);

impl fmt::Display for UnknownPerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown performance level {:?}", self.0)
    }
}

impl std::error::Error for UnknownPerformanceLevel {}

impl FromStr for PerformanceLevel {
    type Err = UnknownPerformanceLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            other => Err(UnknownPerformanceLevel(other.to_owned())),
        }
    }
}

/// A value that differs per device class and performance tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TierTable<T> {
    /// Desktop, high tier.
    pub desktop_high: T,
    /// Desktop, low tier.
    pub desktop_low: T,
    /// Mobile, high tier.
    pub mobile_high: T,
    /// Mobile, low tier.
    pub mobile_low: T,
}

impl<T: Copy> TierTable<T> {
    /// Look up the entry for a device class and tier.
    pub fn get(&self, device: DeviceClass, level: PerformanceLevel) -> T {
        match (device, level) {
            (DeviceClass::Desktop, PerformanceLevel::High) => self.desktop_high,
            (DeviceClass::Desktop, PerformanceLevel::Low) => self.desktop_low,
            (DeviceClass::Mobile, PerformanceLevel::High) => self.mobile_high,
            (DeviceClass::Mobile, PerformanceLevel::Low) => self.mobile_low,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Performance", inline)]
#[serde(default)]
/// Device class, tier, and render density settings.
pub struct PerformanceOptions {
    /// Host device class.
    #[schemars(title = "Device Class")]
    pub device: DeviceClass,
    /// Initial performance tier.
    #[schemars(title = "Performance Level")]
    pub level: PerformanceLevel,
    /// Device-pixel-ratio cap handed to the renderer.
    #[schemars(skip)]
    pub pixel_ratio_cap: TierTable<f32>,
    /// Fixed RNG seed for deterministic replays (`None` = OS entropy).
    #[schemars(skip)]
    pub seed: Option<u64>,
}

impl Default for PerformanceOptions {
    fn default() -> Self {
        Self {
            device: DeviceClass::Desktop,
            level: PerformanceLevel::High,
            pixel_ratio_cap: TierTable {
                desktop_high: 2.0,
                desktop_low: 1.25,
                mobile_high: 1.5,
                mobile_low: 1.0,
            },
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(" HIGH ".parse::<PerformanceLevel>(), Ok(PerformanceLevel::High));
        assert_eq!("low".parse::<PerformanceLevel>(), Ok(PerformanceLevel::Low));
        assert!("medium".parse::<PerformanceLevel>().is_err());
    }

    #[test]
    fn tier_table_lookup() {
        let opts = PerformanceOptions::default();
        assert_eq!(
            opts.pixel_ratio_cap.get(DeviceClass::Mobile, PerformanceLevel::Low),
            1.0
        );
        assert_eq!(
            opts.pixel_ratio_cap.get(DeviceClass::Desktop, PerformanceLevel::High),
            2.0
        );
    }
}
