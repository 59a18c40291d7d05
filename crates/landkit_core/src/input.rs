//! Keyboard input vocabulary shared by menu and carousel controllers.

/// Keys the controllers react to. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Parses a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(value: &str) -> Self {
        match value {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            _ => Self::Other,
        }
    }
}
