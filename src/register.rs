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
//! Hand-off of a generated configuration to a device.
//!
//! Register layout and bit packing belong to the device driver, which
//! implements [`CscRegisterWriter`].
use crate::fixed_point::CSC_FRACTIONAL_BITS;
use crate::generator::CscConfiguration;

/// A configuration in the device's native coefficient format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HardwareCsc {
    /// Coefficients with `fractional_bits` fractional bits, row-major
    pub coefficients: [[i32; 3]; 3],
    /// Fractional bits of `coefficients`
    pub fractional_bits: u32,
    /// Input offsets, in code values
    pub input_offsets: [i32; 3],
    /// Output offsets, raw bits with one fractional bit
    pub output_offsets: [i32; 3],
}

/// Writes a configuration into device registers.
pub trait CscRegisterWriter {
    /// Programs the device with `csc`.
    fn write_csc(&mut self, csc: &HardwareCsc);
}

#[track_caller]
fn round_shift(value: i32, shift: u32) -> i32 {
    if shift == 0 {
        return value;
    }

    let rounded = (i64::from(value) + (1 << (shift - 1))) >> shift;
    i32::try_from(rounded)
        .unwrap_or_else(|_| panic!("coefficient {value} overflows after shift by {shift}"))
}

impl CscConfiguration {
    /// Converts the coefficients to `fractional_bits` fractional bits,
    /// rounding half up.
    ///
    /// # Panics
    ///
    /// If `fractional_bits` exceeds [`CSC_FRACTIONAL_BITS`].
    #[track_caller]
    pub fn to_hardware(&self, fractional_bits: u32) -> HardwareCsc {
        assert!(
            fractional_bits <= CSC_FRACTIONAL_BITS,
            "hardware format cannot have more than {CSC_FRACTIONAL_BITS} fractional bits"
        );

        let shift = CSC_FRACTIONAL_BITS - fractional_bits;
        HardwareCsc {
            coefficients: self.matrix.0.map(|row| row.map(|c| round_shift(c, shift))),
            fractional_bits,
            input_offsets: self.input_offsets,
            output_offsets: self.output_offsets.map(|offset| offset.to_bits()),
        }
    }

    /// Converts the configuration and hands it to `writer`.
    ///
    /// # Panics
    ///
    /// If `fractional_bits` exceeds [`CSC_FRACTIONAL_BITS`].
    #[track_caller]
    pub fn upload<W: CscRegisterWriter + ?Sized>(&self, fractional_bits: u32, writer: &mut W) {
        let csc = self.to_hardware(fractional_bits);
        tracing::debug!(fractional_bits, coefficients = ?csc.coefficients, "uploading csc");
        writer.write_csc(&csc);
    }
}
