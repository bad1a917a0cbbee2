//! Theme Engine
//!
//! Colors of the text area and the status line.

use crossterm::style;

/// RGB Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn darker(&self, factor: f32) -> Self {
        let factor = 1.0 - factor;
        Self {
            r: (self.r as f32 * factor) as u8,
            g: (self.g as f32 * factor) as u8,
            b: (self.b as f32 * factor) as u8,
        }
    }
}

impl From<Color> for style::Color {
    fn from(color: Color) -> Self {
        style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

/// Terminal theme definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,

    // Text area
    pub text: Color,
    pub background: Color,

    // Status line
    pub status_text: Color,
    pub status_background: Color,
    /// Unsaved-changes marker
    pub modified: Color,
}

impl Theme {
    /// Light text on a near-black background
    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            text: Color::rgb(220, 220, 220),
            background: Color::rgb(24, 24, 28),
            status_text: Color::rgb(24, 24, 28),
            status_background: Color::rgb(150, 170, 200),
            modified: Color::rgb(200, 60, 60),
        }
    }

    /// Dark text on a paper background
    pub fn light() -> Self {
        let paper = Color::rgb(250, 248, 240);
        Self {
            name: "light".into(),
            text: Color::rgb(30, 30, 30),
            background: paper,
            status_text: Color::rgb(250, 250, 250),
            status_background: paper.darker(0.6),
            modified: Color::rgb(170, 30, 30),
        }
    }

    /// Every built-in theme
    pub fn builtin() -> Vec<Theme> {
        vec![Self::dark(), Self::light()]
    }

    /// Look up a built-in theme by name
    pub fn by_name(name: &str) -> Option<Theme> {
        Self::builtin()
            .into_iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
