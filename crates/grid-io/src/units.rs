//! Axis label strings of the form `"long_name [units]"`.

use std::fmt;

/// A label split into its descriptive name and units.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameUnits {
    pub long_name: String,
    pub units: Option<String>,
}

impl NameUnits {
    /// Split a label such as `"Longitude [degrees_east]"`.
    ///
    /// Whitespace before the opening bracket is dropped and anything after
    /// the closing bracket is ignored. A label without brackets is all name.
    pub fn parse(label: &str) -> Self {
        let Some(open) = label.find('[') else {
            return Self {
                long_name: label.trim().to_string(),
                units: None,
            };
        };

        let long_name = label[..open].trim_end().to_string();
        let rest = &label[open + 1..];
        let units = match rest.find(']') {
            Some(close) => &rest[..close],
            None => rest,
        };

        Self {
            long_name,
            units: Some(units.to_string()).filter(|u| !u.is_empty()),
        }
    }
}

impl fmt::Display for NameUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.units {
            Some(units) if self.long_name.is_empty() => write!(f, "[{}]", units),
            Some(units) => write!(f, "{} [{}]", self.long_name, units),
            None => write!(f, "{}", self.long_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_units() {
        let label = NameUnits::parse("Longitude [degrees_east]");
        assert_eq!(label.long_name, "Longitude");
        assert_eq!(label.units.as_deref(), Some("degrees_east"));
        assert_eq!(label.to_string(), "Longitude [degrees_east]");
    }

    #[test]
    fn test_parse_without_units() {
        let label = NameUnits::parse("depth");
        assert_eq!(label.long_name, "depth");
        assert!(label.units.is_none());
        assert_eq!(label.to_string(), "depth");
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        let label = NameUnits::parse("Topography   [m] (WGS84)");
        assert_eq!(label.long_name, "Topography");
        assert_eq!(label.units.as_deref(), Some("m"));
    }

    #[test]
    fn test_units_only() {
        let label = NameUnits::parse("[m]");
        assert_eq!(label.long_name, "");
        assert_eq!(label.to_string(), "[m]");
        assert_eq!(NameUnits::parse("z []").units, None);
    }
}
