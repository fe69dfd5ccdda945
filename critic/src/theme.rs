//! Color theme system for critic.
//!
//! A `Theme` holds named `ratatui::style::Color` fields for every UI surface plus the
//! name of the syntect theme used to highlight code. Three built-ins are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal.
//! - `light` uses ANSI 16 colors tuned for light backgrounds.
//! - `catppuccin_mocha` is the Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Whether `toggled()` switches to the dark variant.
    pub is_light: bool,
    /// syntect theme used for the editor panel.
    pub syntax_theme: &'static str,

    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Editor gutter
    pub gutter: Color,
    /// Marker and message color for error diagnostics.
    pub marker_error: Color,

    // Review panel
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,
    pub accepted: Color,
    pub rejected: Color,
    pub score: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    pub spinner: Color,
}

impl Theme {
    /// ANSI 16-color dark theme; the default.
    pub fn dark() -> Self {
        Self {
            name: "dark",
            is_light: false,
            syntax_theme: "base16-ocean.dark",

            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            gutter: Color::DarkGray,
            marker_error: Color::Red,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,
            accepted: Color::Green,
            rejected: Color::Red,
            score: Color::Yellow,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            spinner: Color::Yellow,
        }
    }

    /// ANSI 16-color theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            name: "light",
            is_light: true,
            syntax_theme: "InspiredGitHub",

            border_active: Color::Blue,
            border_inactive: Color::Gray,

            gutter: Color::Gray,
            marker_error: Color::Red,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Black,
            accepted: Color::Green,
            rejected: Color::Red,
            score: Color::Magenta,

            status_bar_bg: Color::Gray,
            status_bar_fg: Color::Black,
            status_mode_normal: Color::Blue,
            status_mode_insert: Color::Green,
            spinner: Color::Magenta,
        }
    }

    /// Catppuccin Mocha palette. Palette source: <https://github.com/catppuccin/catppuccin>.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            name: "catppuccin-mocha",
            is_light: false,
            syntax_theme: "base16-mocha.dark",

            border_active: lavender,
            border_inactive: overlay1,

            gutter: overlay1,
            marker_error: red,

            diff_added: green,
            diff_removed: red,
            diff_context: text,
            accepted: green,
            rejected: red,
            score: yellow,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            spinner: peach,
        }
    }

    /// Resolves a theme name from config or the CLI. Unknown names fall back to `dark()`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// The dark/light counterpart of this theme.
    pub fn toggled(&self) -> Self {
        if self.is_light {
            Self::dark()
        } else {
            Self::light()
        }
    }
}
