//! Numeric quantities with units and their conversion to pixels

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when a value cannot be converted to pixels
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("Cannot resolve percentage without container size")]
    PercentWithoutContainer,

    #[error("Cannot resolve '{unit}' without container size")]
    NaturalWithoutContainer { unit: NaturalSize },

    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },
}

/// Named sizes expressed as a fraction of the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaturalSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Full,
    Half,
    Third,
    Quarter,
}

impl NaturalSize {
    pub fn fraction(self) -> f64 {
        match self {
            NaturalSize::Tiny => 0.1,
            NaturalSize::Small => 0.25,
            NaturalSize::Medium => 0.5,
            NaturalSize::Large => 0.75,
            NaturalSize::Huge => 0.9,
            NaturalSize::Full => 1.0,
            NaturalSize::Half => 0.5,
            NaturalSize::Third => 1.0 / 3.0,
            NaturalSize::Quarter => 0.25,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "tiny" => NaturalSize::Tiny,
            "small" => NaturalSize::Small,
            "medium" => NaturalSize::Medium,
            "large" => NaturalSize::Large,
            "huge" => NaturalSize::Huge,
            "full" => NaturalSize::Full,
            "half" => NaturalSize::Half,
            "third" => NaturalSize::Third,
            "quarter" => NaturalSize::Quarter,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NaturalSize::Tiny => "tiny",
            NaturalSize::Small => "small",
            NaturalSize::Medium => "medium",
            NaturalSize::Large => "large",
            NaturalSize::Huge => "huge",
            NaturalSize::Full => "full",
            NaturalSize::Half => "half",
            NaturalSize::Third => "third",
            NaturalSize::Quarter => "quarter",
        }
    }
}

impl fmt::Display for NaturalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of units a [`Value`] may carry.
///
/// Spellings are kept (`pixels` vs `px`, `meters` vs `m`) so that values
/// print back the way they were written; they compare unequal, matching how
/// the unit algebra treats differently spelled units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Pixels,
    Px,
    Cm,
    Mm,
    Meters,
    M,
    Inches,
    Pt,
    Percent,
    Natural(NaturalSize),
}

impl Unit {
    /// Pixels per unit at 96 DPI, for absolute units
    fn px_factor(self) -> Option<f64> {
        match self {
            Unit::Pixels | Unit::Px => Some(1.0),
            Unit::Cm => Some(37.7953),
            Unit::Mm => Some(3.77953),
            Unit::Meters | Unit::M => Some(3779.53),
            Unit::Inches => Some(96.0),
            Unit::Pt => Some(1.3333),
            Unit::Percent | Unit::Natural(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Pixels => "pixels",
            Unit::Px => "px",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::Meters => "meters",
            Unit::M => "m",
            Unit::Inches => "in",
            Unit::Pt => "pt",
            Unit::Percent => "%",
            Unit::Natural(n) => n.as_str(),
        }
    }

    /// Whether `word` names any unit, absolute or natural
    pub fn is_unit_word(word: &str) -> bool {
        word.parse::<Unit>().is_ok()
    }
}

impl FromStr for Unit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pixels" => Unit::Pixels,
            "px" => Unit::Px,
            "cm" => Unit::Cm,
            "mm" => Unit::Mm,
            "meters" => Unit::Meters,
            "m" => Unit::M,
            "in" => Unit::Inches,
            "pt" => Unit::Pt,
            "%" => Unit::Percent,
            other => match NaturalSize::from_name(other) {
                Some(n) => Unit::Natural(n),
                None => {
                    return Err(ValueError::UnknownUnit {
                        unit: other.to_string(),
                    })
                }
            },
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A number with an optional unit. A missing unit means pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value {
    pub number: f64,
    pub unit: Option<Unit>,
}

impl Value {
    pub fn new(number: f64, unit: Option<Unit>) -> Self {
        Self { number, unit }
    }

    /// A unitless value
    pub fn number(number: f64) -> Self {
        Self { number, unit: None }
    }

    pub fn with_unit(number: f64, unit: Unit) -> Self {
        Self {
            number,
            unit: Some(unit),
        }
    }

    pub fn is_unitless(&self) -> bool {
        self.unit.is_none()
    }

    /// Convert to pixels.
    ///
    /// Percentages and natural sizes are relative and need `container`;
    /// a natural size ignores the number and yields its fraction of the
    /// container.
    pub fn to_pixels(&self, container: Option<f64>) -> Result<f64, ValueError> {
        match self.unit {
            None => Ok(self.number),
            Some(Unit::Percent) => container
                .map(|c| self.number / 100.0 * c)
                .ok_or(ValueError::PercentWithoutContainer),
            Some(Unit::Natural(n)) => container
                .map(|c| n.fraction() * c)
                .ok_or(ValueError::NaturalWithoutContainer { unit: n }),
            Some(unit) => Ok(self.number * unit.px_factor().unwrap_or(1.0)),
        }
    }

    /// Convert against a known container; never fails
    pub fn to_pixels_in(&self, container: f64) -> f64 {
        self.to_pixels(Some(container)).unwrap_or(self.number)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_number(self.number))?;
        match self.unit {
            None => Ok(()),
            Some(Unit::Percent) => f.write_str("%"),
            Some(unit) => write!(f, " {}", unit),
        }
    }
}

/// Integers print without a decimal point, everything else as-is
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unitless_passthrough() {
        for container in [None, Some(0.0), Some(500.0)] {
            assert_eq!(Value::number(42.5).to_pixels(container), Ok(42.5));
        }
    }

    #[test]
    fn test_pixel_spellings() {
        assert_eq!(Value::with_unit(10.0, Unit::Px).to_pixels(None), Ok(10.0));
        assert_eq!(Value::with_unit(10.0, Unit::Pixels).to_pixels(None), Ok(10.0));
    }

    #[test]
    fn test_physical_units() {
        let cm = Value::with_unit(1.0, Unit::Cm).to_pixels(None).unwrap();
        assert!((cm - 37.7953).abs() < 1e-9);
        let inch = Value::with_unit(2.0, Unit::Inches).to_pixels(None).unwrap();
        assert_eq!(inch, 192.0);
        let m = Value::with_unit(1.0, Unit::M).to_pixels(None).unwrap();
        assert!((m - 3779.53).abs() < 1e-9);
    }

    #[test]
    fn test_percent_requires_container() {
        let v = Value::with_unit(50.0, Unit::Percent);
        assert_eq!(v.to_pixels(None), Err(ValueError::PercentWithoutContainer));
        assert_eq!(v.to_pixels(Some(800.0)), Ok(400.0));
    }

    #[test]
    fn test_natural_sizes() {
        let half = Value::with_unit(1.0, Unit::Natural(NaturalSize::Half));
        assert_eq!(half.to_pixels(Some(600.0)), Ok(300.0));
        let third = Value::with_unit(7.0, Unit::Natural(NaturalSize::Third));
        assert!((third.to_pixels(Some(300.0)).unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(
            half.to_pixels(None).unwrap_err().to_string(),
            "Cannot resolve 'half' without container size"
        );
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("pixels".parse::<Unit>(), Ok(Unit::Pixels));
        assert_eq!("in".parse::<Unit>(), Ok(Unit::Inches));
        assert_eq!(
            "quarter".parse::<Unit>(),
            Ok(Unit::Natural(NaturalSize::Quarter))
        );
        let err = "furlongs".parse::<Unit>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown unit: furlongs");
        assert!(Unit::is_unit_word("mm"));
        assert!(!Unit::is_unit_word("fill"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::number(200.0).to_string(), "200");
        assert_eq!(Value::with_unit(2.5, Unit::Cm).to_string(), "2.5 cm");
        assert_eq!(Value::with_unit(50.0, Unit::Percent).to_string(), "50%");
    }
}
