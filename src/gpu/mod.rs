//! GPU side of the displacement slot.
//!
//! The kernel lives in `assets/shaders/modules/morph.wgsl` and is composed
//! into consuming shaders with naga-oil. [`kernel_uniform::KernelUniform`]
//! is the uniform-buffer implementation of
//! [`DisplacementSlot`](crate::animation::DisplacementSlot), and
//! [`displace_pass::DisplacePass`] is a ready-made compute-shader asset.

/// Compute-pass point asset.
pub mod displace_pass;
/// Uniform buffer for kernel parameters.
pub mod kernel_uniform;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
