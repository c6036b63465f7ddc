/// Presentation module
///
/// Pure view functions over the navigator's screens, plus the keyboard
/// mapping. No state lives here.

pub mod grid;
pub mod reader;
pub mod keys;
