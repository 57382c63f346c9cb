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

//! Hue, saturation, brightness and contrast adjustment.
//!
//! Hue rotates the chroma plane, saturation and contrast scale it, contrast
//! alone scales luma. Brightness is not part of the matrix: the generator
//! adds it to the output offsets.
use crate::fixed_point::{BrightnessValue, Coefficient, HsbcFactor, Matrix3, OutputOffset};
use crate::trig::{cosine, sine, Angle};
use crate::ErrorKind;

/// Hue limit, in degrees.
pub const HUE_LIMIT: HsbcFactor = HsbcFactor::from_int(30);
/// Saturation upper bound.
pub const SATURATION_MAX: HsbcFactor = HsbcFactor::from_int(2);
/// Brightness limit, in output code values.
pub const BRIGHTNESS_LIMIT: BrightnessValue = BrightnessValue::from_int(50);
/// Contrast upper bound.
pub const CONTRAST_MAX: HsbcFactor = HsbcFactor::from_int(2);

/// User picture adjustment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HsbcSettings {
    /// Hue rotation in degrees, in [-30, 30]
    pub hue: HsbcFactor,
    /// Saturation factor, in [0, 2]
    pub saturation: HsbcFactor,
    /// Brightness in output code values, in [-50, 50]
    pub brightness: BrightnessValue,
    /// Contrast factor, in [0, 2]
    pub contrast: HsbcFactor,
}

impl HsbcSettings {
    /// Settings that leave the picture unchanged.
    pub const NEUTRAL: HsbcSettings = HsbcSettings {
        hue: HsbcFactor::ZERO,
        saturation: HsbcFactor::ONE,
        brightness: BrightnessValue::ZERO,
        contrast: HsbcFactor::ONE,
    };

    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidValue`] if any value is outside its range.
    pub fn new(
        hue: HsbcFactor,
        saturation: HsbcFactor,
        brightness: BrightnessValue,
        contrast: HsbcFactor,
    ) -> Result<Self, ErrorKind> {
        let settings = HsbcSettings {
            hue,
            saturation,
            brightness,
            contrast,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every value is inside its range.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidValue`] if any value is outside its range.
    pub fn validate(&self) -> Result<(), ErrorKind> {
        let hue = (-HUE_LIMIT..=HUE_LIMIT).contains(&self.hue);
        let saturation = (HsbcFactor::ZERO..=SATURATION_MAX).contains(&self.saturation);
        let brightness = (-BRIGHTNESS_LIMIT..=BRIGHTNESS_LIMIT).contains(&self.brightness);
        let contrast = (HsbcFactor::ZERO..=CONTRAST_MAX).contains(&self.contrast);

        if hue && saturation && brightness && contrast {
            Ok(())
        } else {
            Err(ErrorKind::InvalidValue)
        }
    }

    /// Brightness converted to the output offset format.
    pub fn brightness_offset(&self) -> OutputOffset {
        self.brightness.rescale()
    }
}

impl Default for HsbcSettings {
    fn default() -> Self {
        HsbcSettings::NEUTRAL
    }
}

/// Builds the contrast, saturation and hue matrix:
///
/// ```text
/// | c  0             0            |
/// | 0  c * s * cos   c * s * sin  |
/// | 0  -c * s * sin  c * s * cos  |
/// ```
///
/// # Panics
///
/// If any setting is outside its range.
#[track_caller]
pub fn build_matrix(settings: &HsbcSettings) -> Matrix3 {
    if let Err(error) = settings.validate() {
        panic!("{error}: {settings:?}");
    }

    let angle = Angle::from_degrees(settings.hue.abs());
    let cos_hue = cosine(angle);
    let sin_hue = if settings.hue < HsbcFactor::ZERO {
        -sine(angle)
    } else {
        sine(angle)
    };

    let contrast_times_saturation: HsbcFactor = settings.contrast.multiply(settings.saturation);
    let contrast: Coefficient = settings.contrast.rescale();
    let chroma_cos: Coefficient = contrast_times_saturation.multiply(cos_hue);
    let chroma_sin: Coefficient = contrast_times_saturation.multiply(sin_hue);

    Matrix3([
        [contrast.to_bits(), 0, 0],
        [0, chroma_cos.to_bits(), chroma_sin.to_bits()],
        [0, (-chroma_sin).to_bits(), chroma_cos.to_bits()],
    ])
}
