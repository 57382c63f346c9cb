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
#![allow(dead_code)]

use fixed_csc::fixed_point::CSC_FRACTIONAL_BITS;
use fixed_csc::{ColourPrimary, ColourSpace, Matrix3};

pub type Reference = [[f64; 3]; 3];

pub const REFERENCE_IDENTITY: Reference = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

pub fn q27(value: f64) -> f64 {
    value * f64::from(1_u32 << CSC_FRACTIONAL_BITS)
}

pub fn from_q27(bits: i32) -> f64 {
    f64::from(bits) / f64::from(1_u32 << CSC_FRACTIONAL_BITS)
}

pub fn mul(a: &Reference, b: &Reference) -> Reference {
    let mut result = [[0.0; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }

    result
}

pub fn mul_vec(a: &Reference, v: [f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for (cell, row) in result.iter_mut().zip(a) {
        *cell = row.iter().zip(v).map(|(x, y)| x * y).sum();
    }

    result
}

pub fn inverse(m: &Reference) -> Reference {
    let cofactor = |i: usize, j: usize| {
        let r = [(i + 1) % 3, (i + 2) % 3];
        let c = [(j + 1) % 3, (j + 2) % 3];
        m[r[0]][c[0]] * m[r[1]][c[1]] - m[r[0]][c[1]] * m[r[1]][c[0]]
    };

    let det: f64 = (0..3).map(|j| m[0][j] * cofactor(0, j)).sum();
    let mut result = [[0.0; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = cofactor(j, i) / det;
        }
    }

    result
}

pub fn diagonal(d: [f64; 3]) -> Reference {
    [[d[0], 0.0, 0.0], [0.0, d[1], 0.0], [0.0, 0.0, d[2]]]
}

fn luma_weights(colour_space: ColourSpace) -> (f64, f64) {
    match colour_space {
        ColourSpace::Bt601Yuv => (0.299, 0.114),
        ColourSpace::Bt709Yuv => (0.2126, 0.0722),
        ColourSpace::Smpte240Yuv => (0.212, 0.087),
        ColourSpace::Rgb => unreachable!(),
    }
}

pub fn yuv_to_rgb(colour_space: ColourSpace) -> Reference {
    let (kr, kb) = luma_weights(colour_space);
    let kg = 1.0 - kr - kb;
    [
        [1.0, 0.0, 2.0 * (1.0 - kr)],
        [
            1.0,
            -2.0 * kb * (1.0 - kb) / kg,
            -2.0 * kr * (1.0 - kr) / kg,
        ],
        [1.0, 2.0 * (1.0 - kb), 0.0],
    ]
}

pub fn rgb_to_yuv(colour_space: ColourSpace) -> Reference {
    let (kr, kb) = luma_weights(colour_space);
    let kg = 1.0 - kr - kb;
    [
        [kr, kg, kb],
        [-kr / (2.0 * (1.0 - kb)), -kg / (2.0 * (1.0 - kb)), 0.5],
        [0.5, -kg / (2.0 * (1.0 - kr)), -kb / (2.0 * (1.0 - kr))],
    ]
}

pub fn colour_space_reference(input: ColourSpace, output: ColourSpace) -> Reference {
    match (input, output) {
        (input, output) if input == output => REFERENCE_IDENTITY,
        (ColourSpace::Rgb, output) => rgb_to_yuv(output),
        (input, ColourSpace::Rgb) => yuv_to_rgb(input),
        (input, output) => mul(&rgb_to_yuv(output), &yuv_to_rgb(input)),
    }
}

const D65: (f64, f64) = (0.3127, 0.3290);
const ILLUMINANT_C: (f64, f64) = (0.310, 0.316);

fn chromaticities(primary: ColourPrimary) -> [(f64, f64); 4] {
    match primary {
        ColourPrimary::Bt709 => [(0.64, 0.33), (0.30, 0.60), (0.15, 0.06), D65],
        ColourPrimary::Bt601 => [(0.630, 0.340), (0.310, 0.595), (0.155, 0.070), D65],
        ColourPrimary::Bt470_2SysBg => [(0.64, 0.33), (0.29, 0.60), (0.15, 0.06), D65],
        ColourPrimary::Bt470_2SysM => [(0.67, 0.33), (0.21, 0.71), (0.14, 0.08), ILLUMINANT_C],
    }
}

fn xyz((x, y): (f64, f64)) -> [f64; 3] {
    [x / y, 1.0, (1.0 - x - y) / y]
}

fn rgb_to_xyz(primary: ColourPrimary) -> Reference {
    let [r, g, b, white] = chromaticities(primary).map(xyz);
    let p = [[r[0], g[0], b[0]], [r[1], g[1], b[1]], [r[2], g[2], b[2]]];
    let s = mul_vec(&inverse(&p), white);
    mul(&p, &diagonal(s))
}

const BRADFORD: Reference = [
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
];

fn adaptation(from: (f64, f64), to: (f64, f64)) -> Reference {
    let source = mul_vec(&BRADFORD, xyz(from));
    let destination = mul_vec(&BRADFORD, xyz(to));
    let scale = diagonal([
        destination[0] / source[0],
        destination[1] / source[1],
        destination[2] / source[2],
    ]);

    mul(&inverse(&BRADFORD), &mul(&scale, &BRADFORD))
}

pub fn primary_reference(input: ColourPrimary, output: ColourPrimary) -> Reference {
    if input == output {
        return REFERENCE_IDENTITY;
    }

    let from = chromaticities(input)[3];
    let to = chromaticities(output)[3];
    let to_xyz = rgb_to_xyz(input);
    let to_xyz = if from == to {
        to_xyz
    } else {
        mul(&adaptation(from, to), &to_xyz)
    };

    mul(&inverse(&rgb_to_xyz(output)), &to_xyz)
}

/// Asserts that every coefficient is within `tolerance` Q27 units of the
/// reference.
pub fn check_matrix(matrix: &Matrix3, reference: &Reference, tolerance: f64) {
    for (row, (actual, expected)) in matrix.rows().iter().zip(reference).enumerate() {
        for (col, (&bits, &value)) in actual.iter().zip(expected).enumerate() {
            let error = (f64::from(bits) - q27(value)).abs();
            assert!(
                error <= tolerance,
                "coefficient [{row}][{col}] is {bits}, expected {} (matrix {matrix})",
                q27(value)
            );
        }
    }
}
