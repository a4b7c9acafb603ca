use std::fmt;
use std::str::FromStr;

use crate::error::{KzError, Result};

/// Token accepted in place of a fraction to request automatic computation.
pub const AUTO_TOKEN: &str = "AUTO";

/// A cost weight as decoded from the command line: `numerator / denominator`.
///
/// A numerator of `-1` is the automatic sentinel. It only ever comes from the
/// `AUTO` token, never from a numeric token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    pub const AUTO: Fraction = Fraction {
        numerator: -1,
        denominator: 1,
    };

    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn is_auto(&self) -> bool {
        self.numerator < 0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fraction(f, self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = KzError;

    fn from_str(s: &str) -> Result<Self> {
        parse_fraction(s)
    }
}

/// Decode `AUTO`, `N` or `N/D`.
///
/// The whole token must be consumed. Apart from `AUTO`, the numerator must be
/// non-negative and the denominator at least 1.
pub fn parse_fraction(token: &str) -> Result<Fraction> {
    if token == AUTO_TOKEN {
        return Ok(Fraction::AUTO);
    }

    let invalid = || KzError::InvalidFraction {
        token: token.to_string(),
    };

    let (numerator, denominator) = match token.split_once('/') {
        Some((num, den)) => (
            num.parse::<i64>().map_err(|_| invalid())?,
            den.parse::<i64>().map_err(|_| invalid())?,
        ),
        None => (token.parse::<i64>().map_err(|_| invalid())?, 1),
    };

    if numerator < 0 || denominator < 1 {
        return Err(invalid());
    }
    Ok(Fraction::new(numerator, denominator))
}

/// Write `num` alone when `den == 1`, otherwise `num/den`.
pub(crate) fn write_fraction(f: &mut fmt::Formatter<'_>, num: i64, den: i64) -> fmt::Result {
    if den == 1 {
        write!(f, "{num}")
    } else {
        write!(f, "{num}/{den}")
    }
}
