//! Morph animation: mode resolution, loop clock, representation gate,
//! transition bridges and the displacement kernel.

pub mod bridge;
pub mod clock;
pub mod controller;
pub mod gate;
pub mod kernel;
pub mod mode;

pub use clock::{MorphClock, MorphState};
pub use controller::{MorphController, MorphFrame};
pub use kernel::{DisplacementKernel, DisplacementSlot, KernelParams};
pub use mode::AnimationMode;
