// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Double-width fixed-point arithmetic.
//!
//! Every multiply and divide performed by the matrix generator goes through the
//! functions of this module. A result that does not fit the 32 bit destination
//! after the post-shift is never truncated: the call panics instead.
use core::fmt;
use core::ops::{Add, Neg};

/// Number of fractional bits of every matrix coefficient.
pub const CSC_FRACTIONAL_BITS: u32 = 27;

/// Number of fractional bits of the output offsets.
pub const OUTPUT_OFFSET_FRACTIONAL_BITS: u32 = 1;

const HALF_WORD_BITS: u32 = 16;
const HALF_WORD_MASK: u32 = 0xFFFF;

#[cold]
#[track_caller]
fn overflow(operation: &str) -> ! {
    panic!("fixed-point overflow in {operation}");
}

#[track_caller]
fn narrow(value: i64, operation: &str) -> i32 {
    i32::try_from(value).unwrap_or_else(|_| overflow(operation))
}

#[track_caller]
fn check_shift(post_shift: u32) {
    assert!(post_shift < 64, "post-shift {post_shift} out of range");
}

/// Unsigned 64 bit value stored as two 32 bit words.
#[derive(Copy, Clone, Default)]
struct Wide {
    hi: u32,
    lo: u32,
}

impl Wide {
    fn add_shifted_half(&mut self, partial: u32) {
        let low_part = partial << HALF_WORD_BITS;
        let (lo, carry) = self.lo.overflowing_add(low_part);
        self.lo = lo;
        self.hi = self
            .hi
            .wrapping_add(partial >> HALF_WORD_BITS)
            .wrapping_add(u32::from(carry));
    }

    fn set_bit(&mut self, bit: u32) {
        if bit >= 32 {
            self.hi |= 1 << (bit - 32);
        } else {
            self.lo |= 1 << bit;
        }
    }

    /// Shifts right by `shift` bits, returning `None` if any set bit remains
    /// above the low word.
    fn shift_right(self, shift: u32) -> Option<u32> {
        match shift {
            0 => (self.hi == 0).then_some(self.lo),
            1..=31 => {
                (self.hi >> shift == 0).then(|| (self.lo >> shift) | (self.hi << (32 - shift)))
            }
            _ => Some(self.hi >> (shift - 32)),
        }
    }
}

/// Multiplies two unsigned values into a 64 bit product, then shifts it right
/// by `post_shift` bits.
///
/// The product is built from four 16x16 partial products with explicit carry
/// propagation.
///
/// # Panics
///
/// If `post_shift` is 64 or more, or if the shifted product does not fit
/// into 32 bits.
#[track_caller]
pub fn multiply_unsigned(x: u32, y: u32, post_shift: u32) -> u32 {
    check_shift(post_shift);

    let (x_hi, x_lo) = (x >> HALF_WORD_BITS, x & HALF_WORD_MASK);
    let (y_hi, y_lo) = (y >> HALF_WORD_BITS, y & HALF_WORD_MASK);

    let mut product = Wide {
        hi: x_hi * y_hi,
        lo: x_lo * y_lo,
    };
    product.add_shifted_half(x_lo * y_hi);
    product.add_shifted_half(x_hi * y_lo);

    product
        .shift_right(post_shift)
        .unwrap_or_else(|| overflow("multiply_unsigned"))
}

/// Divides `numerator << 32` by `denominator` into a 64 bit quotient, then
/// shifts it right by `post_shift` bits.
///
/// The quotient is computed one bit at a time by restoring long division.
///
/// # Panics
///
/// If `denominator` is zero, if `post_shift` is 64 or more, or if the shifted
/// quotient does not fit into 32 bits.
#[track_caller]
pub fn divide_unsigned(numerator: u32, denominator: u32, post_shift: u32) -> u32 {
    assert!(denominator != 0, "division by zero");
    check_shift(post_shift);

    if numerator == 0 {
        return 0;
    }

    let mut quotient = Wide::default();
    let mut remainder = 0_u32;
    for bit in (0..64).rev() {
        let incoming = if bit >= 32 {
            (numerator >> (bit - 32)) & 1
        } else {
            0
        };

        // The remainder is always below the denominator, so one extra bit
        // (the carry out of the shift) is enough to hold it.
        let carry = remainder >> 31;
        remainder = (remainder << 1) | incoming;
        if carry != 0 || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient.set_bit(bit);
        }
    }

    quotient
        .shift_right(post_shift)
        .unwrap_or_else(|| overflow("divide_unsigned"))
}

/// Multiplies two signed values into a 64 bit product, then shifts it right
/// (arithmetically) by `post_shift` bits.
///
/// # Panics
///
/// If `post_shift` is 64 or more, or if the shifted product does not fit
/// into 32 bits.
#[track_caller]
pub fn multiply_signed(x: i32, y: i32, post_shift: u32) -> i32 {
    check_shift(post_shift);

    checked_multiply_signed(x, y, post_shift).unwrap_or_else(|| overflow("multiply_signed"))
}

fn checked_multiply_signed(x: i32, y: i32, post_shift: u32) -> Option<i32> {
    let product = i64::from(x) * i64::from(y);
    i32::try_from(product >> post_shift).ok()
}

/// Divides `numerator << 32` by `denominator` into a 64 bit quotient, then
/// shifts it right (arithmetically) by `post_shift` bits.
///
/// # Panics
///
/// If `denominator` is zero, if `post_shift` is 64 or more, or if the shifted
/// quotient does not fit into 32 bits.
#[track_caller]
pub fn divide_signed(numerator: i32, denominator: i32, post_shift: u32) -> i32 {
    assert!(denominator != 0, "division by zero");
    check_shift(post_shift);

    if numerator == 0 {
        return 0;
    }

    let dividend = i64::from(numerator) << 32;
    let quotient = dividend
        .checked_div(i64::from(denominator))
        .unwrap_or_else(|| overflow("divide_signed"));
    narrow(quotient >> post_shift, "divide_signed")
}

/// Computes the matrix product `a * b`.
///
/// Every term is produced by [`multiply_signed`] with `frac_bits` of
/// post-shift, and the running sum is checked against the 32 bit range after
/// each term.
///
/// # Panics
///
/// On overflow of any term or partial sum.
#[track_caller]
pub fn matrix_multiply<const M: usize, const N: usize, const P: usize>(
    a: &[[i32; N]; M],
    b: &[[i32; P]; N],
    frac_bits: u32,
) -> [[i32; P]; M] {
    checked_matrix_multiply(a, b, frac_bits).unwrap_or_else(|| overflow("matrix_multiply"))
}

/// Same as [`matrix_multiply`], returning `None` instead of panicking when
/// a term or partial sum does not fit into 32 bits.
///
/// # Panics
///
/// If `frac_bits` is 64 or more.
#[track_caller]
pub fn checked_matrix_multiply<const M: usize, const N: usize, const P: usize>(
    a: &[[i32; N]; M],
    b: &[[i32; P]; N],
    frac_bits: u32,
) -> Option<[[i32; P]; M]> {
    check_shift(frac_bits);

    let mut result = [[0_i32; P]; M];
    for (row, out) in a.iter().zip(result.iter_mut()) {
        for (col, cell) in out.iter_mut().enumerate() {
            let mut partial = 0_i32;
            for (&lhs, rhs) in row.iter().zip(b.iter()) {
                let term = checked_multiply_signed(lhs, rhs[col], frac_bits)?;
                partial = partial.checked_add(term)?;
            }

            *cell = partial;
        }
    }

    Some(result)
}

/// Computes the elementwise product of `a` and `b`.
///
/// # Panics
///
/// On overflow of any element.
#[track_caller]
pub fn scalar_matrix_multiply<const M: usize, const N: usize>(
    a: &[[i32; N]; M],
    b: &[[i32; N]; M],
    frac_bits: u32,
) -> [[i32; N]; M] {
    checked_scalar_matrix_multiply(a, b, frac_bits)
        .unwrap_or_else(|| overflow("scalar_matrix_multiply"))
}

/// Same as [`scalar_matrix_multiply`], returning `None` instead of panicking
/// when an element does not fit into 32 bits.
///
/// # Panics
///
/// If `frac_bits` is 64 or more.
#[track_caller]
pub fn checked_scalar_matrix_multiply<const M: usize, const N: usize>(
    a: &[[i32; N]; M],
    b: &[[i32; N]; M],
    frac_bits: u32,
) -> Option<[[i32; N]; M]> {
    check_shift(frac_bits);

    let mut result = [[0_i32; N]; M];
    for ((out, lhs), rhs) in result.iter_mut().zip(a.iter()).zip(b.iter()) {
        for ((cell, &x), &y) in out.iter_mut().zip(lhs.iter()).zip(rhs.iter()) {
            *cell = checked_multiply_signed(x, y, frac_bits)?;
        }
    }

    Some(result)
}

/// A signed fixed-point number with `FRAC` fractional bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed<const FRAC: u32>(i32);

/// Matrix coefficient format.
pub type Coefficient = Fixed<CSC_FRACTIONAL_BITS>;
/// Hue (in degrees), saturation and contrast format.
pub type HsbcFactor = Fixed<25>;
/// User brightness format, in output code values.
pub type BrightnessValue = Fixed<10>;
/// Output offset format.
pub type OutputOffset = Fixed<OUTPUT_OFFSET_FRACTIONAL_BITS>;
/// Sine and cosine format.
pub type TrigValue = Fixed<30>;

impl<const FRAC: u32> Fixed<FRAC> {
    /// Number of fractional bits.
    pub const FRACTIONAL_BITS: u32 = FRAC;
    /// Zero.
    pub const ZERO: Self = Self(0);
    /// One.
    pub const ONE: Self = Self(1 << FRAC);

    /// Wraps raw bits.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Converts an integer.
    ///
    /// # Panics
    ///
    /// If the value cannot be represented.
    #[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
    pub const fn from_int(value: i32) -> Self {
        let wide = (value as i64) << FRAC;
        assert!(wide >= i32::MIN as i64 && wide <= i32::MAX as i64);
        Self(wide as i32)
    }

    /// Returns the absolute value.
    ///
    /// # Panics
    ///
    /// On `i32::MIN` bits.
    #[track_caller]
    pub fn abs(self) -> Self {
        Self(
            self.0
                .checked_abs()
                .unwrap_or_else(|| overflow("Fixed::abs")),
        )
    }

    /// Converts to another format. Right shifts round half up, left shifts
    /// are overflow-checked.
    ///
    /// # Panics
    ///
    /// If the value cannot be represented in the target format.
    #[track_caller]
    pub fn rescale<const TO: u32>(self) -> Fixed<TO> {
        let bits = i64::from(self.0);
        let rescaled = if TO >= FRAC {
            bits << (TO - FRAC)
        } else {
            let shift = FRAC - TO;
            (bits + (1 << (shift - 1))) >> shift
        };

        Fixed(narrow(rescaled, "Fixed::rescale"))
    }

    /// Multiplies by a value in any format, producing a value in format `OUT`.
    ///
    /// # Panics
    ///
    /// If `OUT` has more fractional bits than the two operands together, or
    /// on overflow.
    #[track_caller]
    pub fn multiply<const RHS: u32, const OUT: u32>(self, rhs: Fixed<RHS>) -> Fixed<OUT> {
        assert!(FRAC + RHS >= OUT, "product format too precise");
        Fixed(multiply_signed(self.0, rhs.0, FRAC + RHS - OUT))
    }
}

impl<const FRAC: u32> Add for Fixed<FRAC> {
    type Output = Self;

    #[track_caller]
    fn add(self, rhs: Self) -> Self {
        Self(
            self.0
                .checked_add(rhs.0)
                .unwrap_or_else(|| overflow("Fixed::add")),
        )
    }
}

impl<const FRAC: u32> Neg for Fixed<FRAC> {
    type Output = Self;

    #[track_caller]
    fn neg(self) -> Self {
        Self(
            self.0
                .checked_neg()
                .unwrap_or_else(|| overflow("Fixed::neg")),
        )
    }
}

impl<const FRAC: u32> fmt::Display for Fixed<FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/2^{}", self.0, FRAC)
    }
}

/// A 3x3 matrix of [`Coefficient`]s, row-major.
///
/// Matrices act on column vectors: `out = m * in`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Matrix3(pub [[i32; 3]; 3]);

impl Matrix3 {
    /// The identity matrix.
    pub const IDENTITY: Matrix3 = Matrix3([
        [Coefficient::ONE.to_bits(), 0, 0],
        [0, Coefficient::ONE.to_bits(), 0],
        [0, 0, Coefficient::ONE.to_bits()],
    ]);

    /// The all-zero matrix.
    pub const ZERO: Matrix3 = Matrix3([[0; 3]; 3]);

    /// Returns the raw rows.
    pub const fn rows(&self) -> &[[i32; 3]; 3] {
        &self.0
    }

    /// Returns one coefficient.
    pub const fn get(&self, row: usize, col: usize) -> Coefficient {
        Coefficient::from_bits(self.0[row][col])
    }

    /// Returns `true` if the matrix is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Matrix3::IDENTITY
    }

    /// Returns the matrix that applies `self` first and `next` afterwards,
    /// that is `next * self`.
    #[must_use]
    #[track_caller]
    pub fn then(&self, next: &Matrix3) -> Matrix3 {
        Matrix3(matrix_multiply(&next.0, &self.0, CSC_FRACTIONAL_BITS))
    }

    /// Multiplies every coefficient by the matching coefficient of `scale`.
    #[must_use]
    #[track_caller]
    pub fn scale(&self, scale: &Matrix3) -> Matrix3 {
        Matrix3(scalar_matrix_multiply(&self.0, &scale.0, CSC_FRACTIONAL_BITS))
    }

    /// Same as [`Matrix3::then`], `None` if a coefficient of the product
    /// leaves the coefficient range.
    #[must_use]
    pub fn checked_then(&self, next: &Matrix3) -> Option<Matrix3> {
        checked_matrix_multiply(&next.0, &self.0, CSC_FRACTIONAL_BITS).map(Matrix3)
    }

    /// Same as [`Matrix3::scale`], `None` if a coefficient leaves the
    /// coefficient range.
    #[must_use]
    pub fn checked_scale(&self, scale: &Matrix3) -> Option<Matrix3> {
        checked_scalar_matrix_multiply(&self.0, &scale.0, CSC_FRACTIONAL_BITS).map(Matrix3)
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::IDENTITY
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [r0, r1, r2] = &self.0;
        write!(f, "[{r0:?}, {r1:?}, {r2:?}]")
    }
}
