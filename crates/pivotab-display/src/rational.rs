use std::fmt;

use num_rational::Rational64;

/// Largest denominator tried before settling on the last convergent.
pub const MAX_DENOMINATOR: i64 = 10_000;

/// Display form of a real number: an integer or a signed fraction.
///
/// Only used for presentation; the tableau itself stays in `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Approximation {
    Integer(i64),
    /// Reduced, with the sign on the numerator and a denominator above 1
    Fraction(Rational64),
    /// NaN or infinite, shown as is
    NonFinite(f64),
}

/// Approximate `value` by the first continued-fraction convergent within
/// `tolerance`, or by an integer when it is that close to one.
pub fn approximate(value: f64, tolerance: f64) -> Approximation {
    if !value.is_finite() {
        return Approximation::NonFinite(value);
    }
    let nearest = value.round();
    if (value - nearest).abs() <= tolerance {
        return Approximation::Integer(nearest as i64);
    }

    let negative = value < 0.0;
    let x = value.abs();
    // Convergents h/k, seeded with h(-2)/k(-2) = 0/1 and h(-1)/k(-1) = 1/0
    let (mut h_prev, mut h) = (0i64, 1i64);
    let (mut k_prev, mut k) = (1i64, 0i64);
    let mut rest = x;
    loop {
        let a = rest.floor();
        let term = a as i64;
        let next = term
            .checked_mul(h)
            .and_then(|v| v.checked_add(h_prev))
            .zip(term.checked_mul(k).and_then(|v| v.checked_add(k_prev)));
        let Some((h_next, k_next)) = next else { break };
        if k_next > MAX_DENOMINATOR {
            break;
        }
        (h_prev, h) = (h, h_next);
        (k_prev, k) = (k, k_next);

        if (x - h as f64 / k as f64).abs() <= tolerance {
            break;
        }
        let frac = rest - a;
        if frac <= f64::EPSILON {
            break;
        }
        rest = 1.0 / frac;
    }

    let numer = if negative { -h } else { h };
    if k <= 1 {
        Approximation::Integer(numer)
    } else {
        Approximation::Fraction(Rational64::new(numer, k))
    }
}

impl Approximation {
    /// LaTeX form, `\frac{}{}` with the sign pulled out front.
    pub fn to_latex(&self) -> String {
        match *self {
            Approximation::Integer(n) => n.to_string(),
            Approximation::Fraction(r) => {
                let sign = if *r.numer() < 0 { "-" } else { "" };
                format!("{}\\frac{{{}}}{{{}}}", sign, r.numer().abs(), r.denom())
            }
            Approximation::NonFinite(v) if v.is_nan() => "\\text{NaN}".to_string(),
            Approximation::NonFinite(v) if v > 0.0 => "\\infty".to_string(),
            Approximation::NonFinite(_) => "-\\infty".to_string(),
        }
    }
}

impl fmt::Display for Approximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approximation::Integer(n) => write!(f, "{}", n),
            Approximation::Fraction(r) => write!(f, "{}", r),
            Approximation::NonFinite(v) => write!(f, "{}", v),
        }
    }
}
