//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait applies ANSI styling via the `colored` crate to
//! string slices and owned strings alike.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn item_style(&self) -> ColoredString;
    fn narration_style(&self) -> ColoredString;
    fn success_style(&self) -> ColoredString;
    fn denied_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn engine_style(&self) -> ColoredString;
    fn echo_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn narration_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn success_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110)
    }
    fn denied_style(&self) -> ColoredString {
        self.italic().truecolor(230, 30, 30)
    }
    fn error_style(&self) -> ColoredString {
        self.bold().truecolor(230, 30, 30)
    }
    fn engine_style(&self) -> ColoredString {
        self.truecolor(75, 180, 255)
    }
    fn echo_style(&self) -> ColoredString {
        self.dimmed()
    }
}

impl GameStyle for String {
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn narration_style(&self) -> ColoredString {
        self.as_str().narration_style()
    }
    fn success_style(&self) -> ColoredString {
        self.as_str().success_style()
    }
    fn denied_style(&self) -> ColoredString {
        self.as_str().denied_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn engine_style(&self) -> ColoredString {
        self.as_str().engine_style()
    }
    fn echo_style(&self) -> ColoredString {
        self.as_str().echo_style()
    }
}
