use colored::Color;

pub const PRIMARY: Color = Color::BrightCyan;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const ADDRESS: Color = Color::Cyan;
pub const REACHABLE: Color = Color::BrightGreen;
pub const ESCALATED: Color = Color::BrightRed;
