/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// converts them into [`EngineCommand`](crate::engine::EngineCommand)
/// values.
///
/// # Example
///
/// ```ignore
/// let cmd = input_processor.handle_event(
///     InputEvent::CursorMoved { x: 100.0, y: 200.0 },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute position.
    CursorMoved {
        /// Horizontal position in CSS pixels.
        x: f32,
        /// Vertical position in CSS pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

/// Pointer interaction the marker field reacts to, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button went down. Closes an open marker when outside it.
    Press {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Press and release without a drag. Opens, dismisses, or closes
    /// markers.
    Click {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
}

impl PointerEvent {
    /// Position of the event.
    pub fn position(&self) -> glam::Vec2 {
        match *self {
            Self::Press { x, y } | Self::Click { x, y } => glam::Vec2::new(x, y),
        }
    }
}
