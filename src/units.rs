//! This module defines the physical and monetary quantities used in dispatch.
//!
//! Every quantity is a thin wrapper around an `f64` so that, for example, an amount of energy
//! cannot be accidentally added to an amount of money.
use serde::{Deserialize, Serialize};

macro_rules! unit_struct {
    ($name:ident, $unit:literal) => {
        #[doc = concat!("A quantity measured in ", $unit, ".")]
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::SubAssign,
            derive_more::Sum,
            derive_more::Display,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// The larger of `self` and `other`
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            /// The smaller of `self` and `other`
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// The absolute value
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Compare two values using IEEE 754 total ordering
            pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl From<f64> for $name {
            fn from(val: f64) -> Self {
                Self(val)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Energy, "MWh");
unit_struct!(Money, "currency units");
unit_struct!(Emissions, "tonnes of CO2");

// Derived quantities
unit_struct!(MoneyPerEnergy, "currency units per MWh");
unit_struct!(EmissionFactor, "grams of CO2 per kWh (equivalently kg of CO2 per MWh)");

impl_mul!(Energy, MoneyPerEnergy, Money);

/// Conversion from kilograms to tonnes
const KILOGRAMS_PER_TONNE: f64 = 1000.0;

impl Emissions {
    /// Express a mass of CO2 given in kilograms in tonnes
    pub fn from_kilograms(kilograms: f64) -> Self {
        Self(kilograms / KILOGRAMS_PER_TONNE)
    }
}
