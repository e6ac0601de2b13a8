//! Fixed-point arithmetic for deterministic stat math.
//!
//! Every stat value and modifier factor is stored as [`Fixed`] so that
//! resolution produces bit-identical results on every platform. Floats
//! (f32/f64) are confined to the wire/parse layer and to display code.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

/// 16.16 binary fixed-point value.
///
/// The low 16 bits are the fractional part: 1.0 → 65536, 0.5 → 32768.
/// All arithmetic stays in the integer domain; multiply and divide widen
/// to i128 so intermediate products cannot overflow.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Fixed(pub i64);

impl Fixed {
    /// Fractional bits: 1.0 == 1 << 16.
    pub const FRACT_BITS: u32 = 16;

    /// Scale factor: 65536 = 1.0
    pub const SCALE: i64 = 1 << Self::FRACT_BITS;

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << Self::FRACT_BITS);
    pub const HALF: Fixed = Fixed(1 << (Self::FRACT_BITS - 1));

    /// Create from a raw scaled value.
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    /// Create from an integer (e.g. 5 → 5.0).
    #[inline]
    pub const fn from_int(v: i64) -> Self {
        Fixed(v << Self::FRACT_BITS)
    }

    /// Convert from f32 (wire/parse layer only, never in resolution).
    ///
    /// Uses `.round()` for cross-platform determinism. NaN/Inf collapse
    /// to zero; out-of-range values clamp.
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        if !v.is_finite() {
            return Fixed::ZERO;
        }

        let scaled = v * Self::SCALE as f32;
        if scaled >= i64::MAX as f32 {
            return Fixed(i64::MAX);
        }
        if scaled <= i64::MIN as f32 {
            return Fixed(i64::MIN);
        }

        Fixed(scaled.round() as i64)
    }

    /// Convert to f32 (display only).
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::SCALE as f32
    }

    /// Convert to f64 (display only, higher precision).
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Raw scaled value.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Truncate to integer (rounds toward negative infinity).
    #[inline]
    pub const fn to_int(self) -> i64 {
        self.0 >> Self::FRACT_BITS
    }

    /// Smaller of two values.
    #[inline]
    pub fn min(self, other: Fixed) -> Fixed {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Larger of two values.
    #[inline]
    pub fn max(self, other: Fixed) -> Fixed {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Saturating add (clamps at i64::MAX/MIN).
    #[inline]
    pub fn saturating_add(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(other.0))
    }

    /// Saturating subtract.
    #[inline]
    pub fn saturating_sub(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(other.0))
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, other: Fixed) -> Fixed {
        Fixed(self.0 + other.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, other: Fixed) {
        self.0 += other.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, other: Fixed) -> Fixed {
        Fixed(self.0 - other.0)
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, other: Fixed) {
        self.0 -= other.0;
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, other: Fixed) -> Fixed {
        Fixed(((self.0 as i128 * other.0 as i128) >> Self::FRACT_BITS) as i64)
    }
}

impl MulAssign for Fixed {
    #[inline]
    fn mul_assign(&mut self, other: Fixed) {
        *self = *self * other;
    }
}

impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, other: Fixed) -> Fixed {
        if other.0 == 0 {
            return Fixed::ZERO; // Safe default for division by zero
        }
        Fixed(((self.0 as i128) << Self::FRACT_BITS) as i64 / other.0)
    }
}

impl DivAssign for Fixed {
    #[inline]
    fn div_assign(&mut self, other: Fixed) {
        *self = *self / other;
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fixed({} = {})", self.0, self.to_f32())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.to_f32())
    }
}
