//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Window background.
pub const BACKGROUND: Color = Color::Rgb(43, 43, 43);
/// Save action
pub const PRIMARY: Color = Color::Rgb(74, 144, 226);
/// Mark Completed action
pub const SUCCESS: Color = Color::Rgb(92, 184, 92);
/// Delete action and error dialogs
pub const DANGER: Color = Color::Rgb(217, 83, 79);
/// Show Pending / Show Completed actions
pub const NEUTRAL: Color = Color::Rgb(108, 117, 125);
/// Focused input border and warning dialogs
pub const GOLD: Color = Color::Rgb(255, 215, 0);
