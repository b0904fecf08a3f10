//! Rendering options of a [`FlexibleFormatter`].
//!
//! [`FlexibleFormatter`]: crate::FlexibleFormatter
use crate::cfg_serde;
use crate::color::Color;
use crate::pattern::DEFAULT_DATE_PATTERN;

/// The options a [`FlexibleFormatter`] renders with.
///
/// This is a plain value. Formatters hold one behind a lock and read it on
/// every render, so changes apply to all attached loggers immediately.
///
/// With the `serde` feature, configurations can be deserialized. Missing keys
/// take their default value and `date_pattern` is validated.
/// ```
/// # #[cfg(feature = "serde")]
/// # fn main() -> Result<(), serde_json::Error> {
/// use tracing_flexible::{Color, FormatterConfig};
///
/// let config: FormatterConfig = serde_json::from_str(
///     r#"{ "color": "green", "show_level": true }"#,
/// )?;
///
/// assert_eq!(config.color, Color::Green);
/// assert!(config.show_level);
/// assert!(!config.show_date);
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "serde"))]
/// # fn main() {}
/// ```
///
/// [`FlexibleFormatter`]: crate::FlexibleFormatter
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatterConfig {
    /// Pattern for the date fragment, see [`DatePattern`].
    ///
    /// [`DatePattern`]: crate::DatePattern
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de::date_pattern"))]
    pub date_pattern: String,

    /// Color the whole line is wrapped in.
    pub color: Color,

    /// Whether the `[LEVEL]` fragment is rendered.
    pub show_level: bool,

    /// Whether the `[logger name]` fragment is rendered.
    pub show_name: bool,

    /// Whether the `[date]` fragment is rendered.
    pub show_date: bool,

    /// Which clock the date fragment reads.
    pub timestamp: TimestampSource,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            date_pattern: DEFAULT_DATE_PATTERN.to_owned(),
            color: Color::Default,
            show_level: false,
            show_name: false,
            show_date: false,
            timestamp: TimestampSource::RenderTime,
        }
    }
}

/// The point in time the date fragment shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimestampSource {
    /// The wall clock when the line is rendered.
    RenderTime,
    /// The creation time carried by the record.
    Record,
}

impl Default for TimestampSource {
    fn default() -> Self {
        TimestampSource::RenderTime
    }
}

cfg_serde! {
    mod de {
        use crate::pattern::DatePattern;
        use serde::de::{Deserialize, Deserializer, Error};

        pub(super) fn date_pattern<'de, D>(deserializer: D) -> Result<String, D::Error>
        where
            D: Deserializer<'de>,
        {
            let pattern = String::deserialize(deserializer)?;
            DatePattern::parse(&pattern).map_err(D::Error::custom)?;
            Ok(pattern)
        }
    }
}
