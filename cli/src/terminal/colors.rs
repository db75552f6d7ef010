use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 176, b: 0 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const MAC_ADDR: Color = Color::TrueColor { r: 190, g: 140, b: 255 };
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const IPV4_PREFIX: Color = Color::Blue;
