//! Date patterns in the style of `SimpleDateFormat`.
//!
//! See [`DatePattern`] for more details.
use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike};
use std::error::Error;
use std::fmt::{self, Write};
use std::str::FromStr;

/// The pattern used when none is configured.
pub const DEFAULT_DATE_PATTERN: &str = "MM/dd/yyyy HH:mm:ss";

#[cfg(feature = "smallvec")]
type Items = smallvec::SmallVec<[Item; 16]>;
#[cfg(not(feature = "smallvec"))]
type Items = Vec<Item>;

/// A compiled date pattern.
///
/// Patterns are strings of pattern letters, where a run of the same letter is
/// one field and the length of the run selects its width or style. Text can be
/// quoted with single quotes, and `''` is a literal quote. Any other character
/// is copied as is.
///
/// | Letter | Field | Example |
/// |---|---|---|
/// | `G` | era | `AD` |
/// | `y` | year (`yy` keeps two digits) | `2026`, `26` |
/// | `Y` | ISO week year | `2026` |
/// | `M`, `L` | month (`MMM` short name, `MMMM` full name) | `07`, `Jul`, `July` |
/// | `w` | ISO week of year | `42` |
/// | `W` | week of month, weeks starting on Sunday | `3` |
/// | `D` | day of year | `290` |
/// | `d` | day of month | `17` |
/// | `F` | day of week in month | `3` |
/// | `E` | day name (`EEEE` full name) | `Sat`, `Saturday` |
/// | `u` | day number, Monday is 1 | `6` |
/// | `a` | AM/PM marker | `PM` |
/// | `H` | hour, 0-23 | `0` |
/// | `k` | hour, 1-24 | `24` |
/// | `K` | hour, 0-11 | `0` |
/// | `h` | hour, 1-12 | `12` |
/// | `m` | minute | `30` |
/// | `s` | second | `55` |
/// | `S` | millisecond | `978` |
/// | `z` | zone offset | `GMT+02:00` |
/// | `Z` | RFC 822 offset | `+0200` |
/// | `X` | ISO 8601 offset (`X`, `XX`, `XXX`) | `+02`, `+0200`, `+02:00`, `Z` |
///
/// Numbers are zero-padded to the length of the run, so `d` renders `7` and
/// `dd` renders `07`.
///
/// `Y` and `w` follow ISO 8601 weeks, which start on Monday and count the week
/// holding the first Thursday as week 1. `SimpleDateFormat` in a US locale
/// starts weeks on Sunday and counts the week holding January 1st as week 1,
/// so the two can disagree in the days around the new year: Sunday
/// 2026-12-27 is week 52 of 2026 here and week 1 of 2027 there.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use tracing_flexible::DatePattern;
///
/// let pattern: DatePattern = "yyyy-MM-dd'T'HH:mm:ss.SSS".parse().unwrap();
/// let time = FixedOffset::east_opt(0)
///     .unwrap()
///     .with_ymd_and_hms(2026, 10, 17, 9, 5, 3)
///     .unwrap();
///
/// assert_eq!(pattern.format(&time), "2026-10-17T09:05:03.000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    items: Items,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Item {
    Literal(String),
    Field(Field, usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Field {
    Era,
    Year,
    WeekYear,
    Month,
    WeekOfYear,
    WeekOfMonth,
    DayOfYear,
    Day,
    DayOfWeekInMonth,
    DayName,
    DayNumber,
    AmPm,
    Hour0To23,
    Hour1To24,
    Hour0To11,
    Hour1To12,
    Minute,
    Second,
    Millisecond,
    Zone,
    RfcOffset,
    IsoOffset,
}

impl Field {
    fn from_letter(letter: char) -> Option<Self> {
        let field = match letter {
            'G' => Field::Era,
            'y' => Field::Year,
            'Y' => Field::WeekYear,
            'M' | 'L' => Field::Month,
            'w' => Field::WeekOfYear,
            'W' => Field::WeekOfMonth,
            'D' => Field::DayOfYear,
            'd' => Field::Day,
            'F' => Field::DayOfWeekInMonth,
            'E' => Field::DayName,
            'u' => Field::DayNumber,
            'a' => Field::AmPm,
            'H' => Field::Hour0To23,
            'k' => Field::Hour1To24,
            'K' => Field::Hour0To11,
            'h' => Field::Hour1To12,
            'm' => Field::Minute,
            's' => Field::Second,
            'S' => Field::Millisecond,
            'z' => Field::Zone,
            'Z' => Field::RfcOffset,
            'X' => Field::IsoOffset,
            _ => return None,
        };
        Some(field)
    }
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Indexed from Monday
const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

impl DatePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::IllegalLetter`] if an unquoted ASCII letter is
    /// not a pattern letter, and [`PatternError::UnterminatedQuote`] if quoted
    /// text is never closed.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut items = Items::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }

                loop {
                    match chars.next() {
                        None => return Err(PatternError::UnterminatedQuote),
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            literal.push('\'');
                        }
                        Some('\'') => break,
                        Some(quoted) => literal.push(quoted),
                    }
                }
            } else if c.is_ascii_alphabetic() {
                let field = Field::from_letter(c).ok_or(PatternError::IllegalLetter(c))?;
                let mut count = 1;
                while chars.peek() == Some(&c) {
                    chars.next();
                    count += 1;
                }

                if !literal.is_empty() {
                    items.push(Item::Literal(std::mem::take(&mut literal)));
                }
                items.push(Item::Field(field, count));
            } else {
                literal.push(c);
            }
        }

        if !literal.is_empty() {
            items.push(Item::Literal(literal));
        }

        Ok(DatePattern {
            source: pattern.to_owned(),
            items,
        })
    }

    /// Returns the string this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Formats a point in time with this pattern.
    pub fn format<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> String {
        let mut buf = String::with_capacity(self.source.len() + 8);
        // Writing into a `String` cannot fail
        let _ = self.write(time, &mut buf);
        buf
    }

    pub(crate) fn write<Tz, W>(&self, time: &DateTime<Tz>, writer: &mut W) -> fmt::Result
    where
        Tz: TimeZone,
        W: Write,
    {
        for item in self.items.iter() {
            match item {
                Item::Literal(text) => writer.write_str(text)?,
                Item::Field(field, count) => write_field(*field, *count, time, writer)?,
            }
        }
        Ok(())
    }
}

fn write_field<Tz, W>(field: Field, count: usize, time: &DateTime<Tz>, writer: &mut W) -> fmt::Result
where
    Tz: TimeZone,
    W: Write,
{
    match field {
        Field::Era => writer.write_str(if time.year_ce().0 { "AD" } else { "BC" }),
        Field::Year => write_year(time.year_ce().1 as i64, count, writer),
        Field::WeekYear => write_year(time.iso_week().year() as i64, count, writer),
        Field::Month => {
            let name = MONTHS[time.month0() as usize];
            match count {
                1 | 2 => write_number(time.month(), count, writer),
                3 => writer.write_str(&name[..3]),
                _ => writer.write_str(name),
            }
        }
        Field::WeekOfYear => write_number(time.iso_week().week(), count, writer),
        Field::WeekOfMonth => {
            let day0 = time.day0();
            // Weekday of the first of the month, counted from Sunday
            let first = (time.weekday().num_days_from_sunday() + 35 - day0 % 7) % 7;
            write_number((day0 + first) / 7 + 1, count, writer)
        }
        Field::DayOfYear => write_number(time.ordinal(), count, writer),
        Field::Day => write_number(time.day(), count, writer),
        Field::DayOfWeekInMonth => write_number(time.day0() / 7 + 1, count, writer),
        Field::DayName => {
            let name = DAYS[time.weekday().num_days_from_monday() as usize];
            if count >= 4 {
                writer.write_str(name)
            } else {
                writer.write_str(&name[..3])
            }
        }
        Field::DayNumber => write_number(time.weekday().number_from_monday(), count, writer),
        Field::AmPm => writer.write_str(if time.hour() < 12 { "AM" } else { "PM" }),
        Field::Hour0To23 => write_number(time.hour(), count, writer),
        Field::Hour1To24 => {
            let hour = match time.hour() {
                0 => 24,
                hour => hour,
            };
            write_number(hour, count, writer)
        }
        Field::Hour0To11 => write_number(time.hour() % 12, count, writer),
        Field::Hour1To12 => {
            let hour = match time.hour() % 12 {
                0 => 12,
                hour => hour,
            };
            write_number(hour, count, writer)
        }
        Field::Minute => write_number(time.minute(), count, writer),
        Field::Second => write_number(time.second(), count, writer),
        Field::Millisecond => {
            // Leap seconds are represented with nanoseconds past one second
            let millis = (time.nanosecond() / 1_000_000).min(999);
            write_number(millis, count, writer)
        }
        Field::Zone => {
            let seconds = time.offset().fix().local_minus_utc();
            writer.write_str("GMT")?;
            if seconds != 0 {
                write_offset(seconds, Some(':'), true, writer)?;
            }
            Ok(())
        }
        Field::RfcOffset => {
            let seconds = time.offset().fix().local_minus_utc();
            write_offset(seconds, None, true, writer)
        }
        Field::IsoOffset => {
            let seconds = time.offset().fix().local_minus_utc();
            match count {
                _ if seconds == 0 => writer.write_char('Z'),
                1 => write_offset(seconds, None, false, writer),
                2 => write_offset(seconds, None, true, writer),
                _ => write_offset(seconds, Some(':'), true, writer),
            }
        }
    }
}

fn write_number<W: Write>(value: u32, width: usize, writer: &mut W) -> fmt::Result {
    write!(writer, "{:0width$}", value, width = width)
}

fn write_year<W: Write>(year: i64, count: usize, writer: &mut W) -> fmt::Result {
    if count == 2 {
        write!(writer, "{:02}", year.rem_euclid(100))
    } else {
        write!(writer, "{:0width$}", year, width = count)
    }
}

fn write_offset<W: Write>(
    seconds: i32,
    separator: Option<char>,
    with_minutes: bool,
    writer: &mut W,
) -> fmt::Result {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    write!(writer, "{}{:02}", sign, minutes / 60)?;

    if with_minutes {
        if let Some(separator) = separator {
            writer.write_char(separator)?;
        }
        write!(writer, "{:02}", minutes % 60)?;
    }
    Ok(())
}

impl Default for DatePattern {
    fn default() -> Self {
        DatePattern {
            source: DEFAULT_DATE_PATTERN.to_owned(),
            items: Items::from(vec![
                Item::Field(Field::Month, 2),
                Item::Literal("/".to_owned()),
                Item::Field(Field::Day, 2),
                Item::Literal("/".to_owned()),
                Item::Field(Field::Year, 4),
                Item::Literal(" ".to_owned()),
                Item::Field(Field::Hour0To23, 2),
                Item::Literal(":".to_owned()),
                Item::Field(Field::Minute, 2),
                Item::Literal(":".to_owned()),
                Item::Field(Field::Second, 2),
            ]),
        }
    }
}

impl FromStr for DatePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatePattern::parse(s)
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.source)
    }
}

/// Error returned when a date pattern cannot be compiled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternError {
    /// An unquoted ASCII letter that is not a pattern letter.
    IllegalLetter(char),
    /// Quoted text that is never closed.
    UnterminatedQuote,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::IllegalLetter(letter) => {
                write!(f, "illegal pattern letter `{}`, quote it to use it as text", letter)
            }
            PatternError::UnterminatedQuote => f.pad("unterminated quote in date pattern"),
        }
    }
}

impl Error for PatternError {}
