//! Unit newtypes for transmission-grid attributes.
//!
//! Grid data mixes voltages in kV and V, lengths in km and m, and
//! capacities in GW. Wrapping each quantity keeps those scales apart at
//! compile time; conversions from the raw source scales are explicit.
//!
//! ```
//! use gridkit_core::units::{Kilometers, Kilovolts};
//!
//! let length = Kilometers::from_metres(12_500.0);
//! assert_eq!(length.value(), 12.5);
//!
//! let v = Kilovolts::from_volts(380_000.0);
//! assert_eq!(v, Kilovolts(380.0));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$type> for f64 {
            type Output = $type;
            fn mul(self, rhs: $type) -> Self::Output {
                <$type>::new(self * rhs.0)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit_name)
            }
        }

        impl $type {
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Nominal voltage level in kilovolts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

impl Kilovolts {
    /// The extra-high-voltage level assumed when a bus carries no voltage.
    pub const EHV_380: Self = Self(380.0);

    /// Convert from volts, the scale SciGRID exports use.
    #[inline]
    pub fn from_volts(volts: f64) -> Self {
        Self(volts / 1000.0)
    }
}

/// Line length in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(pub f64);

impl_unit_ops!(Kilometers, "km");

impl Kilometers {
    #[inline]
    pub fn from_metres(metres: f64) -> Self {
        Self(metres / 1000.0)
    }

    #[inline]
    pub fn to_metres(self) -> f64 {
        self.0 * 1000.0
    }
}

/// Transfer capacity in gigawatts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Gigawatts(pub f64);

impl_unit_ops!(Gigawatts, "GW");

/// Geographic coordinate component (longitude or latitude) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl_unit_ops!(Degrees, "°");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_arithmetic() {
        let a = Gigawatts(1.5);
        let b = Gigawatts(0.5);

        assert_eq!((a + b).value(), 2.0);
        assert_eq!((a - b).value(), 1.0);
        assert_eq!((a * 2.0).value(), 3.0);
        assert_eq!((2.0 * b).value(), 1.0);
        assert_eq!(a / b, 3.0);
    }

    #[test]
    fn test_scale_conversions() {
        assert_eq!(Kilovolts::from_volts(220_000.0), Kilovolts(220.0));
        assert_eq!(Kilometers::from_metres(1500.0), Kilometers(1.5));
        assert_eq!(Kilometers(2.0).to_metres(), 2000.0);
    }

    #[test]
    fn test_voltage_max() {
        assert_eq!(Kilovolts(220.0).max(Kilovolts::EHV_380), Kilovolts(380.0));
    }

    #[test]
    fn test_sum_iterator() {
        let caps = vec![Gigawatts(1.0), Gigawatts(3.0)];
        let total: Gigawatts = caps.into_iter().sum();
        assert_eq!(total.value(), 4.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Kilovolts(380.0)), "380 kV");
        assert_eq!(format!("{}", Gigawatts(1.5)), "1.5 GW");
    }
}
