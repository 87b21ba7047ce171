//! Runtime-order vector algebra
//!
//! Positions, velocities, gravity and arena bounds are all [`Vector`]s whose
//! order (component count) is fixed at construction. Binary operations only
//! combine vectors of equal order; anything else is a `DimensionMismatch`.
//!
//! The algebra is deliberately analytic: `unit()` on a zero vector yields
//! NaN components, which propagate through subsequent computation rather
//! than being special-cased. Callers must avoid zero-length normals
//! (coincident body centers).

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// A fixed-order vector of `f64` components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    comps: Vec<f64>,
}

impl Vector {
    /// Vector with the given components; the order is fixed to their count
    pub fn new(comps: impl Into<Vec<f64>>) -> Self {
        Self {
            comps: comps.into(),
        }
    }

    /// Zero vector of the given order
    pub fn zeros(order: usize) -> Self {
        Self {
            comps: vec![0.0; order],
        }
    }

    /// Number of components
    #[inline]
    pub fn order(&self) -> usize {
        self.comps.len()
    }

    /// Read-only component slice
    #[inline]
    pub fn comps(&self) -> &[f64] {
        &self.comps
    }

    fn check_order(&self, other: &Vector) -> Result<(), SimError> {
        if self.order() != other.order() {
            return Err(SimError::DimensionMismatch {
                expected: self.order(),
                actual: other.order(),
            });
        }
        Ok(())
    }

    /// Component-wise sum
    pub fn add(&self, other: &Vector) -> Result<Vector, SimError> {
        let mut result = self.clone();
        result.add_in_place(other)?;
        Ok(result)
    }

    /// Component-wise difference
    pub fn sub(&self, other: &Vector) -> Result<Vector, SimError> {
        let mut result = self.clone();
        result.sub_in_place(other)?;
        Ok(result)
    }

    /// Add `other` into this vector
    pub fn add_in_place(&mut self, other: &Vector) -> Result<(), SimError> {
        self.check_order(other)?;
        for (a, b) in self.comps.iter_mut().zip(&other.comps) {
            *a += b;
        }
        Ok(())
    }

    /// Subtract `other` from this vector
    pub fn sub_in_place(&mut self, other: &Vector) -> Result<(), SimError> {
        self.check_order(other)?;
        for (a, b) in self.comps.iter_mut().zip(&other.comps) {
            *a -= b;
        }
        Ok(())
    }

    /// New vector with every component multiplied by `scalar`
    pub fn scaled(&self, scalar: f64) -> Vector {
        let mut result = self.clone();
        result.scale_in_place(scalar);
        result
    }

    /// Multiply every component by `scalar`
    pub fn scale_in_place(&mut self, scalar: f64) {
        for comp in &mut self.comps {
            *comp *= scalar;
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Vector) -> Result<f64, SimError> {
        self.check_order(other)?;
        Ok(self
            .comps
            .iter()
            .zip(&other.comps)
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Sum of squared components. Stands in for the magnitude in equations
    /// where the square root can be avoided.
    pub fn squared_magnitude(&self) -> f64 {
        self.comps.iter().map(|c| c * c).sum()
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f64 {
        self.squared_magnitude().sqrt()
    }

    /// Vector of magnitude 1 in the direction of this vector
    ///
    /// A zero vector produces NaN components; the result is propagated, not
    /// special-cased.
    pub fn unit(&self) -> Vector {
        self.scaled(1.0 / self.magnitude())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.comps[index]
    }
}

impl IndexMut<usize> for Vector {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.comps[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (n, comp) in self.comps.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{comp}")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn add_matching_orders() {
        let v = Vector::new([1.0, 2.0, 3.0]);
        let w = Vector::new([0.5, -2.0, 10.0]);
        assert_eq!(v.add(&w).unwrap(), Vector::new([1.5, 0.0, 13.0]));
    }

    #[test]
    fn add_order_mismatch_fails() {
        let v = Vector::new([1.0, 2.0]);
        let w = Vector::new([1.0, 2.0, 3.0]);
        assert_eq!(
            v.add(&w),
            Err(SimError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn dot_order_mismatch_fails() {
        let v = Vector::new([1.0]);
        let w = Vector::new([1.0, 2.0]);
        assert!(v.dot(&w).is_err());
    }

    #[test]
    fn magnitude_of_three_four() {
        let v = Vector::new([3.0, 4.0]);
        assert_relative_eq!(v.magnitude(), 5.0);
        assert_relative_eq!(v.squared_magnitude(), 25.0);
    }

    #[test]
    fn unit_vector_has_magnitude_one() {
        let v = Vector::new([3.0, -4.0]);
        assert_relative_eq!(v.unit().magnitude(), 1.0);
    }

    #[test]
    fn unit_of_zero_vector_is_nan() {
        let v = Vector::zeros(2);
        let u = v.unit();
        assert!(u[0].is_nan());
        assert!(u[1].is_nan());
    }

    #[test]
    fn display_matches_brace_format() {
        let v = Vector::new([1.0, 2.5]);
        assert_eq!(v.to_string(), "{ 1, 2.5 }");
    }

    proptest! {
        #[test]
        fn add_then_sub_round_trips(
            a in prop::array::uniform3(-1e6f64..1e6),
            b in prop::array::uniform3(-1e6f64..1e6),
        ) {
            let v = Vector::new(a.to_vec());
            let w = Vector::new(b.to_vec());
            let back = v.add(&w).unwrap().sub(&w).unwrap();
            for n in 0..3 {
                prop_assert!((back[n] - v[n]).abs() <= 1e-6 * v[n].abs().max(1.0));
            }
        }

        #[test]
        fn scaling_scales_magnitude(
            a in prop::array::uniform2(-1e3f64..1e3),
            k in -100.0f64..100.0,
        ) {
            let v = Vector::new(a.to_vec());
            let scaled = v.scaled(k);
            prop_assert!((scaled.magnitude() - k.abs() * v.magnitude()).abs() < 1e-6);
        }
    }
}
