//! Input handling: event types, viewport geometry, and the input processor
//! that converts raw window events into engine commands.

/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into engine commands.
pub mod processor;
/// Output surface geometry.
pub mod viewport;

pub use event::{InputEvent, MouseButton, PointerEvent};
pub use processor::{InputProcessor, KeyBindings, KeyCommandTag};
pub use viewport::Viewport;
