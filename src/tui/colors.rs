//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Used for the active list tab.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for done tasks.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Used for the error message line.
pub const DARK_RED: Color = Color::Rgb(180, 30, 30);
