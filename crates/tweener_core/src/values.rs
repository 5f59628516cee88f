//! Tweenable value types
//!
//! A tween stores its `beginning` and `change` in the target's own element
//! type and reconstructs the current value as `beginning + change * factor`,
//! where `factor` comes from the easing curve.

use std::fmt::Debug;

/// Trait for values that can be driven by a tween
pub trait Tweenable: Copy + PartialEq + Debug + 'static {
    /// The additive identity, used when a target has no readable value yet
    fn zero() -> Self;

    /// `self - from`
    fn difference(self, from: Self) -> Self;

    /// `self + change * factor`
    fn advance(self, change: Self, factor: f64) -> Self;
}

// ============================================================================
// Float Implementations
// ============================================================================

macro_rules! impl_tweenable_float {
    ($($ty:ty),*) => {
        $(
            impl Tweenable for $ty {
                fn zero() -> Self {
                    0.0
                }

                fn difference(self, from: Self) -> Self {
                    self - from
                }

                fn advance(self, change: Self, factor: f64) -> Self {
                    self + (change as f64 * factor) as $ty
                }
            }
        )*
    };
}

impl_tweenable_float!(f32, f64);

// ============================================================================
// Integer Implementations
// ============================================================================

// Intermediate values are rounded to the nearest integer and saturate at the
// type's bounds. A span wider than the type leaves `change` wrapped; `advance`
// recovers the true span from the wrapped end point.
macro_rules! impl_tweenable_int {
    ($($ty:ty),*) => {
        $(
            impl Tweenable for $ty {
                fn zero() -> Self {
                    0
                }

                fn difference(self, from: Self) -> Self {
                    self.wrapping_sub(from)
                }

                fn advance(self, change: Self, factor: f64) -> Self {
                    let end = self.wrapping_add(change);
                    if factor == 1.0 {
                        return end;
                    }

                    let span = (end as i128 - self as i128) as f64;
                    let value = self as i128 + (span * factor).round() as i128;
                    value.clamp(<$ty>::MIN as i128, <$ty>::MAX as i128) as $ty
                }
            }
        )*
    };
}

impl_tweenable_int!(i16, i32, i64);

// ============================================================================
// Component-wise Arrays
// ============================================================================

impl<T: Tweenable, const N: usize> Tweenable for [T; N] {
    fn zero() -> Self {
        [T::zero(); N]
    }

    fn difference(self, from: Self) -> Self {
        let mut out = self;
        for (o, f) in out.iter_mut().zip(from) {
            *o = o.difference(f);
        }
        out
    }

    fn advance(self, change: Self, factor: f64) -> Self {
        let mut out = self;
        for (o, c) in out.iter_mut().zip(change) {
            *o = o.advance(c, factor);
        }
        out
    }
}
