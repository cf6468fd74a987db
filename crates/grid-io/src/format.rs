//! Grid formats and stored numeric representations.
//!
//! A format code is two letters: the family (`n` for COARDS-conforming
//! array files, `c` for the legacy layout) followed by the representation
//! (`b`yte, `s`hort, `i`nt, `f`loat, `d`ouble). Only the COARDS family is
//! handled by the row pipelines in this crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric type a grid is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
}

impl Representation {
    /// True for the integer representations, which need a numeric sentinel
    /// and rounding on write.
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int)
    }

    /// Smallest and largest representable value.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Byte => (i8::MIN as f64, i8::MAX as f64),
            Self::Short => (i16::MIN as f64, i16::MAX as f64),
            Self::Int => (i32::MIN as f64, i32::MAX as f64),
            Self::Float => (-(f32::MAX as f64), f32::MAX as f64),
            Self::Double => (f64::MIN, f64::MAX),
        }
    }

    /// Default no-data value when the header leaves it unset.
    ///
    /// Integer types use their minimum; floating types keep NaN.
    pub fn default_nan_value(&self) -> f64 {
        if self.is_integral() {
            self.bounds().0
        } else {
            f64::NAN
        }
    }

    /// Size of one stored value in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Double => 8,
        }
    }

    /// One-letter code used in format strings.
    pub fn code(&self) -> char {
        match self {
            Self::Byte => 'b',
            Self::Short => 's',
            Self::Int => 'i',
            Self::Float => 'f',
            Self::Double => 'd',
        }
    }

    fn from_code(c: char) -> Option<Self> {
        match c {
            'b' => Some(Self::Byte),
            's' => Some(Self::Short),
            'i' => Some(Self::Int),
            'f' => Some(Self::Float),
            'd' => Some(Self::Double),
            _ => None,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
        };
        write!(f, "{}", s)
    }
}

/// File layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatFamily {
    /// Self-describing COARDS/CF array files.
    Coards,
    /// Legacy single-variable layout, handled elsewhere.
    Legacy,
}

/// Format selector carried by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridFormat {
    pub family: FormatFamily,
    pub representation: Representation,
}

impl GridFormat {
    /// COARDS grid with the given representation.
    pub const fn coards(representation: Representation) -> Self {
        Self {
            family: FormatFamily::Coards,
            representation,
        }
    }

    /// Two-letter format code, e.g. `nf` or `cs`.
    pub fn code(&self) -> String {
        let family = match self.family {
            FormatFamily::Coards => 'n',
            FormatFamily::Legacy => 'c',
        };
        format!("{}{}", family, self.representation.code())
    }
}

impl Default for GridFormat {
    fn default() -> Self {
        Self::coards(Representation::Float)
    }
}

impl fmt::Display for GridFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned when a format code cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grid format code: {0}")]
pub struct FormatParseError(pub String);

impl FromStr for GridFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let mut chars = lower.chars();
        let (Some(family), Some(rep), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(FormatParseError(s.to_string()));
        };

        let family = match family {
            'n' => FormatFamily::Coards,
            'c' => FormatFamily::Legacy,
            _ => return Err(FormatParseError(s.to_string())),
        };
        let representation =
            Representation::from_code(rep).ok_or_else(|| FormatParseError(s.to_string()))?;

        Ok(Self {
            family,
            representation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_codes() {
        assert_eq!(
            "nf".parse::<GridFormat>().unwrap(),
            GridFormat::coards(Representation::Float)
        );
        assert_eq!(
            "NS".parse::<GridFormat>().unwrap(),
            GridFormat::coards(Representation::Short)
        );
        let legacy: GridFormat = "cd".parse().unwrap();
        assert_eq!(legacy.family, FormatFamily::Legacy);
        assert_eq!(legacy.representation, Representation::Double);

        assert!("nx".parse::<GridFormat>().is_err());
        assert!("bf".parse::<GridFormat>().is_err());
        assert!("nff".parse::<GridFormat>().is_err());
        assert!("".parse::<GridFormat>().is_err());
    }

    #[test]
    fn test_code_display() {
        let fmt = GridFormat::coards(Representation::Int);
        assert_eq!(fmt.to_string(), "ni");
        assert_eq!(fmt.code().parse::<GridFormat>().unwrap(), fmt);
    }

    #[test]
    fn test_default_nan_values() {
        assert_eq!(Representation::Byte.default_nan_value(), -128.0);
        assert_eq!(Representation::Short.default_nan_value(), -32768.0);
        assert_eq!(Representation::Int.default_nan_value(), i32::MIN as f64);
        assert!(Representation::Float.default_nan_value().is_nan());
        assert!(Representation::Double.default_nan_value().is_nan());
    }

    #[test]
    fn test_bounds_and_sizes() {
        assert_eq!(Representation::Short.bounds(), (-32768.0, 32767.0));
        assert_eq!(Representation::Byte.size_of(), 1);
        assert_eq!(Representation::Double.size_of(), 8);
        assert!(Representation::Int.is_integral());
        assert!(!Representation::Float.is_integral());
    }
}
