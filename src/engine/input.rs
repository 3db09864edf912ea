//! Pointer and surface methods for [`MorphEngine`].

use super::MorphEngine;
use crate::input::PointerEvent;
use crate::markers::MarkerSurface;

impl MorphEngine {
    /// Attach the marker presentation surface with the text pool used for
    /// text markers. Replaces any previous surface and clears existing
    /// markers. Spawning starts at the next tick.
    pub fn set_floating_bubbles<I, S>(&mut self, surface: Box<dyn MarkerSurface>, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.disposed {
            return;
        }
        self.markers.set_surface(surface, messages);
    }

    /// Detach the marker surface; no markers spawn until a new one is set.
    pub fn clear_floating_bubbles(&mut self) {
        self.markers.detach_surface();
    }

    /// Forward a pointer press or click to the marker field.
    ///
    /// A click on a text marker opens it, a click on a plain marker pops
    /// it, and a press or click elsewhere closes the open marker. Returns
    /// `true` when a marker reacted.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        !self.disposed && self.markers.handle_pointer(event)
    }

    /// Close the open text marker. Returns `false` if none was open.
    pub fn close_active_marker(&mut self) -> bool {
        !self.disposed && self.markers.close_active()
    }
}
