//! Canonical animation modes and free-form name resolution.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Procedural displacement style applied while the asset disperses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnimationMode {
    /// No morph: the asset stays assembled.
    #[default]
    None,
    /// Travelling wave along depth.
    Wave,
    /// Rotation about the vertical axis through the scene centre.
    Swirl,
    /// Sum-of-sines wobble.
    Noise,
    /// Radial breathing.
    Breathe,
    /// Outward bursts.
    Explode,
}

impl AnimationMode {
    /// All modes in kernel-id order.
    pub const ALL: [AnimationMode; 6] = [
        Self::None,
        Self::Wave,
        Self::Swirl,
        Self::Noise,
        Self::Breathe,
        Self::Explode,
    ];

    /// Resolve a free-form name through the alias table.
    ///
    /// Matching is case-insensitive after trimming. Unknown names resolve to
    /// [`AnimationMode::None`].
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "wave" | "z wave" | "z_wave" | "z-wave" | "zwave" => Self::Wave,
            "swirl" => Self::Swirl,
            "noise" => Self::Noise,
            "breath" | "breathe" => Self::Breathe,
            "explode" => Self::Explode,
            _ => Self::None,
        }
    }

    /// Numeric id understood by the displacement kernel.
    #[must_use]
    pub fn kernel_id(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Wave => 1,
            Self::Swirl => 2,
            Self::Noise => 3,
            Self::Breathe => 4,
            Self::Explode => 5,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Wave => "wave",
            Self::Swirl => "swirl",
            Self::Noise => "noise",
            Self::Breathe => "breathe",
            Self::Explode => "explode",
        }
    }

    /// Whether the mode drives the morph at all.
    #[must_use]
    pub fn is_animated(self) -> bool {
        self != Self::None
    }
}

impl FromStr for AnimationMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::resolve(s))
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
