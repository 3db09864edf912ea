//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor position,
//! press origin, drag detection) and the key-binding map. It is the only
//! thing that sits between raw window events and the engine's
//! [`execute`](crate::engine::MorphEngine::execute) method.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton, PointerEvent};
use crate::engine::command::EngineCommand;
use crate::options::PerformanceLevel;

/// Cursor travel in CSS pixels after which a press becomes a drag.
const DRAG_THRESHOLD_PX: f32 = 4.0;

/// Maps physical key strings to [`EngineCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyM"`, `"Digit0"`, `"Escape"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`EngineCommand`] that can be
/// key-bound (discrete, parameterless actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Advance to the next animation mode.
    CycleAnimationMode,
    /// Switch animation off.
    AnimationOff,
    /// Full-quality tier.
    PerformanceHigh,
    /// Reduced tier.
    PerformanceLow,
    /// Close the open text marker.
    CloseMarker,
}

impl KeyCommandTag {
    /// Convert to the corresponding [`EngineCommand`].
    fn to_command(self) -> EngineCommand {
        match self {
            Self::CycleAnimationMode => EngineCommand::CycleAnimationMode,
            Self::AnimationOff => EngineCommand::SetAnimationMode {
                name: "none".to_owned(),
            },
            Self::PerformanceHigh => EngineCommand::SetPerformanceLevel {
                level: PerformanceLevel::High,
            },
            Self::PerformanceLow => EngineCommand::SetPerformanceLevel {
                level: PerformanceLevel::Low,
            },
            Self::CloseMarker => EngineCommand::CloseActiveMarker,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyM".into(), KeyCommandTag::CycleAnimationMode),
            ("Digit0".into(), KeyCommandTag::AnimationOff),
            ("KeyH".into(), KeyCommandTag::PerformanceHigh),
            ("KeyL".into(), KeyCommandTag::PerformanceLow),
            ("Escape".into(), KeyCommandTag::CloseMarker),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<EngineCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, returning the previous binding.
    pub fn bind(
        &mut self,
        key: impl Into<String>,
        tag: KeyCommandTag,
    ) -> Option<KeyCommandTag> {
        self.bindings.insert(key.into(), tag)
    }
}

/// Converts raw window events into [`EngineCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    cursor: Vec2,
    press_origin: Option<Vec2>,
    is_dragging: bool,
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Current cursor position in CSS pixels.
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Whether the primary button is held.
    #[must_use]
    pub fn pressed(&self) -> bool {
        self.press_origin.is_some()
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<EngineCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<EngineCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Vec2::new(x, y);
                if let Some(origin) = self.press_origin {
                    if origin.distance(self.cursor) > DRAG_THRESHOLD_PX {
                        self.is_dragging = true;
                    }
                }
                None
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            } => {
                self.press_origin = Some(self.cursor);
                self.is_dragging = false;
                Some(EngineCommand::Pointer(PointerEvent::Press {
                    x: self.cursor.x,
                    y: self.cursor.y,
                }))
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: false,
            } => {
                let was_pressed = self.press_origin.take().is_some();
                let was_dragging = std::mem::take(&mut self.is_dragging);
                (was_pressed && !was_dragging).then(|| {
                    EngineCommand::Pointer(PointerEvent::Click {
                        x: self.cursor.x,
                        y: self.cursor.y,
                    })
                })
            }
            InputEvent::MouseButton { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(pressed: bool) -> InputEvent {
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        }
    }

    #[test]
    fn press_and_release_in_place_is_a_click() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(InputEvent::CursorMoved { x: 10.0, y: 20.0 }), None);
        assert_eq!(
            p.handle_event(button(true)),
            Some(EngineCommand::Pointer(PointerEvent::Press { x: 10.0, y: 20.0 }))
        );
        assert!(p.pressed());
        assert_eq!(
            p.handle_event(button(false)),
            Some(EngineCommand::Pointer(PointerEvent::Click { x: 10.0, y: 20.0 }))
        );
    }

    #[test]
    fn drags_do_not_click() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(button(true));
        let _ = p.handle_event(InputEvent::CursorMoved { x: 50.0, y: 0.0 });
        assert_eq!(p.handle_event(button(false)), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(button(false)), None);
        let right = InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        };
        assert_eq!(p.handle_event(right), None);
    }

    #[test]
    fn key_bindings() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_key_press("Escape"), Some(EngineCommand::CloseActiveMarker));
        assert_eq!(p.handle_key_press("KeyZ"), None);
        let _ = p.key_bindings_mut().bind("KeyZ", KeyCommandTag::PerformanceLow);
        assert_eq!(
            p.handle_key_press("KeyZ"),
            Some(EngineCommand::SetPerformanceLevel {
                level: PerformanceLevel::Low
            })
        );
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let mut bindings = KeyBindings { bindings: HashMap::new() };
        let _ = bindings.bind("Space", KeyCommandTag::AnimationOff);
        let p = InputProcessor::with_key_bindings(bindings);
        assert_eq!(p.handle_key_press("KeyM"), None);
        assert_eq!(
            p.handle_key_press("Space"),
            Some(EngineCommand::SetAnimationMode { name: "none".into() })
        );
    }
}
