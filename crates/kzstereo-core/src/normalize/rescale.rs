use std::fmt;

use tracing::debug;

use crate::error::{KzError, Result};
use crate::fraction::Fraction;

use super::CostState;

/// Weight that shares the common denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackedField {
    Lambda,
    Lambda1,
    Lambda2,
    OcclusionCost,
}

impl TrackedField {
    pub const ALL: [TrackedField; 4] = [
        TrackedField::Lambda,
        TrackedField::Lambda1,
        TrackedField::Lambda2,
        TrackedField::OcclusionCost,
    ];
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lambda => write!(f, "lambda"),
            Self::Lambda1 => write!(f, "lambda1"),
            Self::Lambda2 => write!(f, "lambda2"),
            Self::OcclusionCost => write!(f, "K"),
        }
    }
}

impl CostState {
    pub fn field(&self, field: TrackedField) -> i64 {
        match field {
            TrackedField::Lambda => self.lambda,
            TrackedField::Lambda1 => self.params.lambda1,
            TrackedField::Lambda2 => self.params.lambda2,
            TrackedField::OcclusionCost => self.params.occlusion_cost,
        }
    }

    fn field_mut(&mut self, field: TrackedField) -> &mut i64 {
        match field {
            TrackedField::Lambda => &mut self.lambda,
            TrackedField::Lambda1 => &mut self.params.lambda1,
            TrackedField::Lambda2 => &mut self.params.lambda2,
            TrackedField::OcclusionCost => &mut self.params.occlusion_cost,
        }
    }

    /// Set `field` to `fraction` and rescale every other weight so that all
    /// of them keep their value over the new common denominator.
    ///
    /// The common denominator is multiplied by `fraction.denominator`. Only
    /// multiplications are involved, so repeated calls stay exact. Unset
    /// (negative) weights stay negative.
    pub fn rescale(&mut self, field: TrackedField, fraction: Fraction) -> Result<()> {
        let old_denominator = self.params.denominator;
        let d = fraction.denominator;

        let mut scaled = [0i64; 4];
        for (slot, tracked) in scaled.iter_mut().zip(TrackedField::ALL) {
            *slot = if tracked == field {
                checked_mul(fraction.numerator, old_denominator)?
            } else {
                checked_mul(self.field(tracked), d)?
            };
        }
        let denominator = checked_mul(old_denominator, d)?;

        for (value, tracked) in scaled.into_iter().zip(TrackedField::ALL) {
            *self.field_mut(tracked) = value;
        }
        self.params.denominator = denominator;

        debug!(
            %field,
            %fraction,
            lambda = self.lambda,
            lambda1 = self.params.lambda1,
            lambda2 = self.params.lambda2,
            k = self.params.occlusion_cost,
            denominator = self.params.denominator,
            "Rescaled cost weights"
        );
        Ok(())
    }
}

pub(super) fn checked_mul(a: i64, b: i64) -> Result<i64> {
    a.checked_mul(b).ok_or(KzError::Overflow)
}
