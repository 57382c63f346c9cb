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
#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::missing_safety_doc, // Until we add them...
    clippy::similar_names, // This requires effort to ensure
    // Yield false positives
    clippy::must_use_candidate,
)]

//! Fixed CSC is a library to generate the colour space conversion matrix of
//! fixed-function video hardware.
//!
//! A conversion is described by a [`CscRequest`] and produces a
//! [`CscConfiguration`]: a 3x3 matrix of Q27 coefficients plus input and
//! output offsets, such that
//! `out = matrix * (in + input_offsets) + output_offsets`.
//!
//! The supported colour spaces are:
//! * ycbcr, ITU-R Recommendation BT.601
//! * ycbcr, ITU-R Recommendation BT.709
//! * ycbcr, SMPTE 240M
//! * rgb
//!
//! Full (0-255), studio (16-235) and limited (48-208) ranges are supported,
//! as well as BT.709, BT.601, BT.470-2 System B/G and System M primaries.
//! An optional hue, saturation, brightness and contrast adjustment is folded
//! into the same matrix.
//!
//! No floating point is used: every value is an integer in a fixed-point
//! format (see [`fixed_point`]).
//!
//! # Examples
//!
//! Convert studio range BT.601 video to full range RGB:
//! ```
//! use fixed_csc::{generate_matrix, ColourSpace, CscRequest, Range};
//!
//! let request = CscRequest::new(ColourSpace::Bt601Yuv, ColourSpace::Rgb)
//!     .with_ranges(Range::Studio, Range::Full);
//! let configuration = generate_matrix(&request);
//!
//! assert_eq!(configuration.input_offsets, [-16, 0, 0]);
//! ```
//!
//! Apply a picture adjustment and handle errors:
//! ```
//! use fixed_csc::fixed_point::{BrightnessValue, HsbcFactor};
//! use fixed_csc::{try_generate_matrix, ColourSpace, CscRequest, HsbcSettings};
//! use std::error;
//!
//! fn adjust() -> Result<(), Box<dyn error::Error>> {
//!     let hsbc = HsbcSettings::new(
//!         HsbcFactor::from_int(10),
//!         HsbcFactor::ONE,
//!         BrightnessValue::from_int(5),
//!         HsbcFactor::ONE,
//!     )?;
//!
//!     let request = CscRequest::new(ColourSpace::Bt709Yuv, ColourSpace::Rgb).with_hsbc(hsbc);
//!     let configuration = try_generate_matrix(&request)?;
//!
//!     // Brightness ends up in the output offsets
//!     assert_eq!(configuration.output_offsets[0].to_bits(), 10);
//!
//!     Ok(())
//! }
//! # adjust().unwrap();
//! ```
//!
//! Upload the result to a device:
//! ```
//! use fixed_csc::{generate_matrix, ColourSpace, CscRegisterWriter, CscRequest, HardwareCsc};
//!
//! struct Device {
//!     registers: Vec<i32>,
//! }
//!
//! impl CscRegisterWriter for Device {
//!     fn write_csc(&mut self, csc: &HardwareCsc) {
//!         self.registers.clear();
//!         self.registers.extend(csc.coefficients.iter().flatten());
//!         self.registers.extend(&csc.input_offsets);
//!         self.registers.extend(&csc.output_offsets);
//!     }
//! }
//!
//! let mut device = Device { registers: Vec::new() };
//! let request = CscRequest::new(ColourSpace::Rgb, ColourSpace::Bt709Yuv);
//! generate_matrix(&request).upload(12, &mut device);
//!
//! assert_eq!(device.registers.len(), 15);
//! ```
mod colour_space;
pub mod fixed_point;
mod generator;
pub mod hsbc;
pub mod register;
mod static_assert;
pub mod tables;
pub mod trig;

use thiserror::Error;

pub use colour_space::{ColourPrimary, ColourSpace, Range};
pub use fixed_point::Matrix3;
pub use generator::{CscConfiguration, CscGenerator, CscRequest};
pub use hsbc::HsbcSettings;
pub use register::{CscRegisterWriter, HardwareCsc};
pub use tables::{ColourTables, TableError};

/// An enumeration of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(C)]
pub enum ErrorKind {
    /// One or more parameters have invalid values for the called function
    #[error("One or more parameters have not legal values for the command")]
    InvalidValue,
    /// The combination of parameters is unsupported for the called function
    #[error("The combination of parameters is not legal for the command")]
    InvalidOperation,
}

/// Computes the conversion matrix and offsets for `request`, using the
/// built-in tables.
///
/// # Errors
///
/// * [`InvalidValue`] if the HSBC settings are out of range
/// * [`InvalidOperation`] if a colour space or primary conversion needed by
///   the request is not characterized, or if a coefficient of the result
///   falls outside of the Q27 range
///
/// # Panics
///
/// If the built-in tables are inconsistent.
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
pub fn try_generate_matrix(request: &CscRequest) -> Result<CscConfiguration, ErrorKind> {
    CscGenerator::global().try_generate(request)
}

/// Computes the conversion matrix and offsets for `request`, using the
/// built-in tables.
///
/// # Panics
///
/// On any error [`try_generate_matrix`] would return, or if the built-in
/// tables are inconsistent.
#[track_caller]
pub fn generate_matrix(request: &CscRequest) -> CscConfiguration {
    CscGenerator::global().generate(request)
}

#[doc(hidden)]
#[cfg(not(tarpaulin_include))]
pub mod c_api {
    #![allow(clippy::wildcard_imports)]
    use super::*; // We are importing everything
    use fixed_point::{BrightnessValue, HsbcFactor};

    #[repr(C)]
    pub enum Result {
        Ok,
        Err,
    }

    /// Raw fixed-point bits of each setting.
    #[repr(C)]
    pub struct CscHsbcSettings {
        pub hue: i32,
        pub saturation: i32,
        pub brightness: i32,
        pub contrast: i32,
    }

    #[repr(C)]
    pub struct CscRequestDesc {
        pub input_space: i32,
        pub output_space: i32,
        pub input_range: i32,
        pub output_range: i32,
        pub input_primary: i32,
        pub output_primary: i32,
        /// Null for no adjustment
        pub hsbc: *const CscHsbcSettings,
    }

    #[repr(C)]
    pub struct CscConfigurationDesc {
        pub matrix: [[i32; 3]; 3],
        pub input_offsets: [i32; 3],
        pub output_offsets: [i32; 3],
    }

    unsafe fn set_error(error: *mut ErrorKind, value: ErrorKind) -> self::Result {
        if !error.is_null() {
            *error = value;
        }

        self::Result::Err
    }

    fn to_request(desc: &CscRequestDesc, hsbc: Option<&CscHsbcSettings>) -> Option<CscRequest> {
        Some(CscRequest {
            input_space: ColourSpace::try_from(desc.input_space).ok()?,
            output_space: ColourSpace::try_from(desc.output_space).ok()?,
            input_range: Range::try_from(desc.input_range).ok()?,
            output_range: Range::try_from(desc.output_range).ok()?,
            input_primary: ColourPrimary::try_from(desc.input_primary).ok()?,
            output_primary: ColourPrimary::try_from(desc.output_primary).ok()?,
            hsbc: hsbc.map(|settings| HsbcSettings {
                hue: HsbcFactor::from_bits(settings.hue),
                saturation: HsbcFactor::from_bits(settings.saturation),
                brightness: BrightnessValue::from_bits(settings.brightness),
                contrast: HsbcFactor::from_bits(settings.contrast),
            }),
        })
    }

    #[no_mangle]
    pub unsafe extern "C" fn csc_generate_matrix(
        request: *const CscRequestDesc,
        configuration: *mut CscConfigurationDesc,
        error: *mut ErrorKind,
    ) -> self::Result {
        if request.is_null() || configuration.is_null() {
            return set_error(error, ErrorKind::InvalidValue);
        }

        let desc = &*request;
        let Some(request) = to_request(desc, desc.hsbc.as_ref()) else {
            return set_error(error, ErrorKind::InvalidValue);
        };

        match try_generate_matrix(&request) {
            Ok(result) => {
                *configuration = CscConfigurationDesc {
                    matrix: result.matrix.0,
                    input_offsets: result.input_offsets,
                    output_offsets: result.output_offsets.map(fixed_point::Fixed::to_bits),
                };
                self::Result::Ok
            }
            Err(error_kind) => set_error(error, error_kind),
        }
    }
}
