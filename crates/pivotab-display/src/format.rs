use crate::rational::{approximate, Approximation};

/// How matrix entries are printed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberFormat {
    /// Fixed number of decimal places
    Decimal(usize),
    /// Integer or fraction within the given tolerance
    Rational(f64),
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::Decimal(3)
    }
}

impl NumberFormat {
    pub fn format(&self, value: f64) -> String {
        match *self {
            NumberFormat::Decimal(places) => {
                let text = format!("{:.*}", places, value);
                // "-0.000" reads as a sign error in a tableau
                match text.strip_prefix('-') {
                    Some(digits) if digits.chars().all(|c| c == '0' || c == '.') => digits.to_string(),
                    _ => text,
                }
            }
            NumberFormat::Rational(tolerance) => approximate(value, tolerance).to_string(),
        }
    }

    pub fn format_latex(&self, value: f64) -> String {
        match *self {
            NumberFormat::Decimal(_) => self.format(value),
            NumberFormat::Rational(tolerance) => approximate(value, tolerance).to_latex(),
        }
    }

    /// Approximation used by [`NumberFormat::Rational`], if that is the mode.
    pub fn approximation(&self, value: f64) -> Option<Approximation> {
        match *self {
            NumberFormat::Decimal(_) => None,
            NumberFormat::Rational(tolerance) => Some(approximate(value, tolerance)),
        }
    }
}
