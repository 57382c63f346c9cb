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
use fixed_csc::c_api::{
    csc_generate_matrix, CscConfigurationDesc, CscHsbcSettings, CscRequestDesc, Result,
};
use fixed_csc::tables::BT601YUV_TO_RGB;
use fixed_csc::{ColourPrimary, ColourSpace, ErrorKind, Range};

use std::ptr;

fn request_desc(input_space: i32, output_space: i32) -> CscRequestDesc {
    CscRequestDesc {
        input_space,
        output_space,
        input_range: Range::Full as i32,
        output_range: Range::Full as i32,
        input_primary: ColourPrimary::Bt709 as i32,
        output_primary: ColourPrimary::Bt709 as i32,
        hsbc: ptr::null(),
    }
}

fn empty_configuration() -> CscConfigurationDesc {
    CscConfigurationDesc {
        matrix: [[0; 3]; 3],
        input_offsets: [0; 3],
        output_offsets: [0; 3],
    }
}

fn check_err(result: ErrorKind, err: ErrorKind) {
    assert_eq!(result as u32, err as u32);
}

#[test]
fn generate() {
    let request = request_desc(ColourSpace::Bt601Yuv as i32, ColourSpace::Rgb as i32);
    let mut configuration = empty_configuration();
    let mut error = ErrorKind::InvalidOperation;

    let result = unsafe { csc_generate_matrix(&request, &mut configuration, &mut error) };

    assert!(matches!(result, Result::Ok));
    assert_eq!(configuration.matrix, BT601YUV_TO_RGB.0);
    assert_eq!(configuration.output_offsets, [0; 3]);
    check_err(error, ErrorKind::InvalidOperation);
}

#[test]
fn generate_with_adjustment() {
    let hsbc = CscHsbcSettings {
        hue: 0,
        saturation: 1 << 25,
        brightness: 4 << 10,
        contrast: 1 << 25,
    };
    let mut request = request_desc(ColourSpace::Rgb as i32, ColourSpace::Bt709Yuv as i32);
    request.output_range = Range::Studio as i32;
    request.hsbc = &hsbc;
    let mut configuration = empty_configuration();

    let result = unsafe { csc_generate_matrix(&request, &mut configuration, ptr::null_mut()) };

    assert!(matches!(result, Result::Ok));
    assert_eq!(configuration.output_offsets, [40, 0, 0]);

    let invalid = CscHsbcSettings {
        hue: 40 << 25,
        ..hsbc
    };
    request.hsbc = &invalid;
    let mut error = ErrorKind::InvalidOperation;
    let result = unsafe { csc_generate_matrix(&request, &mut configuration, &mut error) };

    assert!(matches!(result, Result::Err));
    check_err(error, ErrorKind::InvalidValue);
}

#[test]
fn unrepresentable_coefficients() {
    let hsbc = CscHsbcSettings {
        hue: 0,
        saturation: 2 << 25,
        brightness: 0,
        contrast: 2 << 25,
    };
    let mut request = request_desc(ColourSpace::Bt709Yuv as i32, ColourSpace::Rgb as i32);
    request.input_range = Range::Limited as i32;
    request.input_primary = ColourPrimary::Bt470_2SysM as i32;
    request.output_primary = ColourPrimary::Bt601 as i32;
    request.hsbc = &hsbc;
    let mut configuration = empty_configuration();
    let mut error = ErrorKind::InvalidValue;

    let result = unsafe { csc_generate_matrix(&request, &mut configuration, &mut error) };

    assert!(matches!(result, Result::Err));
    check_err(error, ErrorKind::InvalidOperation);
}

#[test]
fn invalid_enumerations() {
    let requests = [
        request_desc(4, ColourSpace::Rgb as i32),
        request_desc(ColourSpace::Rgb as i32, -1),
        CscRequestDesc {
            input_range: 3,
            ..request_desc(0, 0)
        },
        CscRequestDesc {
            output_primary: 7,
            ..request_desc(0, 0)
        },
    ];

    for request in &requests {
        let mut configuration = empty_configuration();
        let mut error = ErrorKind::InvalidOperation;
        let result = unsafe { csc_generate_matrix(request, &mut configuration, &mut error) };

        assert!(matches!(result, Result::Err));
        check_err(error, ErrorKind::InvalidValue);
    }
}

#[test]
fn null_pointers() {
    let request = request_desc(0, 0);
    let mut configuration = empty_configuration();
    let mut error = ErrorKind::InvalidOperation;

    let result = unsafe { csc_generate_matrix(ptr::null(), &mut configuration, &mut error) };
    assert!(matches!(result, Result::Err));
    check_err(error, ErrorKind::InvalidValue);

    error = ErrorKind::InvalidOperation;
    let result = unsafe { csc_generate_matrix(&request, ptr::null_mut(), &mut error) };
    assert!(matches!(result, Result::Err));
    check_err(error, ErrorKind::InvalidValue);

    let result = unsafe { csc_generate_matrix(ptr::null(), ptr::null_mut(), ptr::null_mut()) };
    assert!(matches!(result, Result::Err));
}
