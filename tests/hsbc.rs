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
use fixed_csc::fixed_point::{BrightnessValue, HsbcFactor, OutputOffset};
use fixed_csc::hsbc::{build_matrix, BRIGHTNESS_LIMIT, CONTRAST_MAX, HUE_LIMIT, SATURATION_MAX};
use fixed_csc::{ErrorKind, HsbcSettings, Matrix3};

use itertools::iproduct;

mod common;

use common::{check_matrix, q27};

fn factor(value: f64) -> HsbcFactor {
    HsbcFactor::from_bits((value * f64::from(HsbcFactor::ONE.to_bits())).round() as i32)
}

fn settings(hue: f64, saturation: f64, brightness: f64, contrast: f64) -> HsbcSettings {
    HsbcSettings {
        hue: factor(hue),
        saturation: factor(saturation),
        brightness: BrightnessValue::from_bits(
            (brightness * f64::from(BrightnessValue::ONE.to_bits())).round() as i32,
        ),
        contrast: factor(contrast),
    }
}

#[test]
fn neutral_is_identity() {
    assert_eq!(build_matrix(&HsbcSettings::NEUTRAL), Matrix3::IDENTITY);
    assert_eq!(HsbcSettings::default(), HsbcSettings::NEUTRAL);
}

#[test]
fn brightness_is_not_in_the_matrix() {
    let brighter = settings(0.0, 1.0, 50.0, 1.0);
    assert_eq!(build_matrix(&brighter), Matrix3::IDENTITY);
}

#[test]
fn matches_reference() {
    let hues = [-30.0, -12.5, 0.0, 7.0, 30.0];
    let factors = [0.0, 0.5, 1.0, 1.25, 2.0];
    for (&hue, &saturation, &contrast) in iproduct!(&hues, &factors, &factors) {
        let settings = settings(hue, saturation, 0.0, contrast);
        let (sin, cos) = f64::to_radians(hue).sin_cos();
        let chroma = contrast * saturation;
        let reference = [
            [contrast, 0.0, 0.0],
            [0.0, chroma * cos, chroma * sin],
            [0.0, -chroma * sin, chroma * cos],
        ];

        let tolerance = q27(1e-5 * chroma.max(1.0)) + 1.0;
        check_matrix(&build_matrix(&settings), &reference, tolerance);
    }
}

#[test]
fn hue_sign() {
    let positive = build_matrix(&settings(20.0, 1.0, 0.0, 1.0));
    let negative = build_matrix(&settings(-20.0, 1.0, 0.0, 1.0));

    assert_eq!(positive.get(1, 1), negative.get(1, 1));
    assert_eq!(positive.get(2, 2), negative.get(2, 2));
    assert_eq!(positive.get(1, 2), -negative.get(1, 2));
    assert_eq!(positive.get(2, 1), -negative.get(2, 1));
    assert_eq!(positive.get(1, 2), -positive.get(2, 1));
}

#[test]
fn validation() {
    let limits = [
        HsbcSettings {
            hue: HUE_LIMIT,
            saturation: SATURATION_MAX,
            brightness: BRIGHTNESS_LIMIT,
            contrast: CONTRAST_MAX,
        },
        HsbcSettings {
            hue: -HUE_LIMIT,
            saturation: HsbcFactor::ZERO,
            brightness: -BRIGHTNESS_LIMIT,
            contrast: HsbcFactor::ZERO,
        },
    ];
    for limit in limits {
        assert_eq!(limit.validate(), Ok(()));
        build_matrix(&limit);
    }

    let invalid = [
        settings(30.5, 1.0, 0.0, 1.0),
        settings(-31.0, 1.0, 0.0, 1.0),
        settings(0.0, -0.25, 0.0, 1.0),
        settings(0.0, 2.5, 0.0, 1.0),
        settings(0.0, 1.0, 50.5, 1.0),
        settings(0.0, 1.0, -51.0, 1.0),
        settings(0.0, 1.0, 0.0, -1.0),
        settings(0.0, 1.0, 0.0, 2.125),
    ];
    for settings in invalid {
        assert_eq!(settings.validate(), Err(ErrorKind::InvalidValue), "{settings:?}");
    }
}

#[test]
fn constructor() {
    let settings = HsbcSettings::new(
        HsbcFactor::from_int(-10),
        HsbcFactor::ONE,
        BrightnessValue::from_int(5),
        HsbcFactor::from_int(2),
    );
    assert!(settings.is_ok());

    let settings = HsbcSettings::new(
        HsbcFactor::from_int(45),
        HsbcFactor::ONE,
        BrightnessValue::ZERO,
        HsbcFactor::ONE,
    );
    assert_eq!(settings, Err(ErrorKind::InvalidValue));
}

#[test]
fn brightness_offset() {
    assert_eq!(
        settings(0.0, 1.0, 5.0, 1.0).brightness_offset(),
        OutputOffset::from_int(5)
    );
    assert_eq!(
        settings(0.0, 1.0, -12.5, 1.0).brightness_offset(),
        OutputOffset::from_bits(-25)
    );
    assert_eq!(
        HsbcSettings::NEUTRAL.brightness_offset(),
        OutputOffset::ZERO
    );
}

#[test]
#[should_panic(expected = "not legal values")]
fn build_rejects_invalid_settings() {
    build_matrix(&settings(0.0, 3.0, 0.0, 1.0));
}
