use iced::keyboard::{key::Named, Key};

/// What a key press asks for. Grid screens only react to `Back`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    NextPage,
    PrevPage,
    Back,
    RotateClockwise,
    RotateCounterclockwise,
}

/// Map a pressed key to its action, if any
pub fn action_for(key: &Key) -> Option<KeyAction> {
    match key.as_ref() {
        Key::Named(Named::ArrowRight) => Some(KeyAction::NextPage),
        Key::Named(Named::ArrowLeft) => Some(KeyAction::PrevPage),
        Key::Named(Named::Escape) => Some(KeyAction::Back),
        Key::Character(c) if c.eq_ignore_ascii_case("w") => Some(KeyAction::RotateClockwise),
        Key::Character(c) if c.eq_ignore_ascii_case("q") => Some(KeyAction::RotateCounterclockwise),
        _ => None,
    }
}
