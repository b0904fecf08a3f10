//! ANSI colors applied to whole log lines.
//!
//! See [`Color`] for more details.
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Escape sequence that resets all terminal attributes.
pub const RESET: &str = "\x1b[0m";

/// The color a [`FlexibleFormatter`] wraps each line in.
///
/// Every variant except [`Color::Default`] maps to a fixed ANSI foreground
/// escape. Lines rendered with [`Color::Default`] carry no escape codes at all.
///
/// # Examples
///
/// ```
/// use tracing_flexible::Color;
///
/// assert_eq!(Color::Red.ansi(), "\x1b[31m");
/// assert_eq!(Color::Default.ansi(), "");
/// assert_eq!("purple".parse::<Color>().unwrap(), Color::Purple);
/// ```
///
/// [`FlexibleFormatter`]: crate::FlexibleFormatter
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Color {
    Blue,
    Green,
    Purple,
    Red,
    White,
    Yellow,
    Default,
}

impl Color {
    /// Every color, in declaration order.
    pub const ALL: [Color; 7] = [
        Color::Blue,
        Color::Green,
        Color::Purple,
        Color::Red,
        Color::White,
        Color::Yellow,
        Color::Default,
    ];

    /// Returns the escape sequence that starts this color.
    pub const fn ansi(self) -> &'static str {
        match self {
            Color::Blue => "\x1b[34m",
            Color::Green => "\x1b[32m",
            Color::Purple => "\x1b[35m",
            Color::Red => "\x1b[31m",
            Color::White => "\x1b[37m",
            Color::Yellow => "\x1b[33m",
            Color::Default => "",
        }
    }

    /// Returns the escape sequence that ends this color, which is empty for
    /// [`Color::Default`].
    pub const fn reset(self) -> &'static str {
        match self {
            Color::Default => "",
            _ => RESET,
        }
    }

    /// Returns `true` if lines in this color are wrapped in escape codes.
    pub const fn is_colored(self) -> bool {
        !matches!(self, Color::Default)
    }

    const fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::Red => "red",
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Default => "default",
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .iter()
            .copied()
            .find(|color| color.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseColorError(s.to_owned()))
    }
}

/// Error returned when parsing a [`Color`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown color `{}`, expected one of blue, green, purple, red, white, yellow, default",
            self.0
        )
    }
}

impl Error for ParseColorError {}
