//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a pointer
//! gesture or a programmatic call, is represented as an `EngineCommand`.
//! Consumers construct commands and pass them to
//! [`MorphEngine::execute`](super::MorphEngine::execute).

use super::MorphEngine;
use crate::animation::AnimationMode;
use crate::input::PointerEvent;
use crate::options::PerformanceLevel;

/// A discrete or parameterized operation the engine can perform.
///
/// ```ignore
/// engine.execute(EngineCommand::CycleAnimationMode);
/// engine.execute(EngineCommand::SetAnimationMode { name: "z-wave".into() });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    // ── Animation ───────────────────────────────────────────────────
    /// Resolve `name` through the alias table and switch to it.
    SetAnimationMode {
        /// Free-form mode name.
        name: String,
    },

    /// Advance to the next mode in kernel-id order, wrapping to none.
    CycleAnimationMode,

    // ── Performance ─────────────────────────────────────────────────
    /// Change the performance tier.
    SetPerformanceLevel {
        /// New tier.
        level: PerformanceLevel,
    },

    // ── Markers ─────────────────────────────────────────────────────
    /// Pointer press or click over the scene.
    Pointer(PointerEvent),

    /// Close the open text marker.
    CloseActiveMarker,
}

impl MorphEngine {
    /// Execute a command. Returns `true` when it changed engine state.
    pub fn execute(&mut self, command: EngineCommand) -> bool {
        match command {
            EngineCommand::SetAnimationMode { name } => {
                let before = self.animation_mode();
                self.set_animation_mode(&name) != before
            }
            EngineCommand::CycleAnimationMode => {
                let current = self.animation_mode();
                let next = AnimationMode::ALL
                    [(current.kernel_id() as usize + 1) % AnimationMode::ALL.len()];
                self.set_animation_mode(next.name()) != current
            }
            EngineCommand::SetPerformanceLevel { level } => {
                let changed = self.performance_level() != level;
                self.set_performance_level(level);
                changed
            }
            EngineCommand::Pointer(event) => self.handle_pointer(event),
            EngineCommand::CloseActiveMarker => self.close_active_marker(),
        }
    }
}
