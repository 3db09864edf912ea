// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Morph controller and floating-marker engine for volumetric point-based
//! 3D assets.
//!
//! Morpho cycles a loaded asset between its assembled rendering and a
//! dispersed point cloud through a periodic morph, and fills the scene with
//! ambient, clickable floating markers that steer clear of the rendered
//! geometry.
//!
//! # Key entry points
//!
//! - [`engine::MorphEngine`] - load assets, pick modes, tick once per frame
//! - [`animation`] - morph clock, render-mode gate, transition bridge and
//!   the displacement kernel
//! - [`markers`] - spawning, physics, occlusion and lifecycle of the
//!   floating markers
//! - [`options::Options`] - every tuning constant, TOML-serializable
//!
//! # Architecture
//!
//! Everything runs on the host's thread. Each [`engine::MorphEngine::tick`]
//! samples the morph clock once; the gate, the bridge and the kernel
//! parameters all derive from that sample. The rendering side is reached
//! only through traits: [`scene::SceneTarget`] for the asset,
//! [`animation::DisplacementSlot`] for kernel parameters,
//! [`markers::FrameProbe`] for framebuffer alpha, [`camera::Projector`]
//! for projection and [`markers::MarkerSurface`] for marker presentation.
//! [`gpu`] provides the wgpu implementation of the displacement slot.

pub mod animation;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod markers;
pub mod options;
pub mod scene;
pub mod util;
