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

//! Sine and cosine by quarter-wave table lookup with linear interpolation.
use crate::fixed_point::{
    divide_unsigned, multiply_signed, multiply_unsigned, HsbcFactor, TrigValue,
};
use crate::static_assert;
use core::fmt;

/// Number of fractional bits of an [`Angle`].
pub const ANGLE_FRACTIONAL_BITS: u32 = 29;

const HALF_PI_BITS: u32 = 843_314_857;
const PI_BITS: u32 = 2 * HALF_PI_BITS;
const THREE_HALVES_PI_BITS: u32 = 3 * HALF_PI_BITS;
const TWO_PI_BITS: u32 = 4 * HALF_PI_BITS;
static_assert!(TWO_PI_BITS.checked_add(HALF_PI_BITS).is_some());

// pi / 180 with 32 fractional bits
const DEGREES_TO_RADIANS: u32 = 74_961_321;

const INTERVAL_BITS: u32 = 8;
const INTERVALS: usize = 1 << INTERVAL_BITS;
const POSITION_FRACTIONAL_BITS: u32 = 16;
const POSITION_FRACTION_MASK: u32 = (1 << POSITION_FRACTIONAL_BITS) - 1;

/// An angle in radians, unsigned, with [`ANGLE_FRACTIONAL_BITS`] fractional bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Angle(u32);

impl Angle {
    /// 0
    pub const ZERO: Angle = Angle(0);
    /// pi / 2
    pub const HALF_PI: Angle = Angle(HALF_PI_BITS);
    /// pi
    pub const PI: Angle = Angle(PI_BITS);
    /// 3 pi / 2
    pub const THREE_HALVES_PI: Angle = Angle(THREE_HALVES_PI_BITS);
    /// 2 pi
    pub const TWO_PI: Angle = Angle(TWO_PI_BITS);

    /// Wraps raw bits.
    pub const fn from_bits(bits: u32) -> Angle {
        Angle(bits)
    }

    /// Returns the raw bits.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Converts a non-negative angle expressed in degrees.
    ///
    /// # Panics
    ///
    /// If `degrees` is negative or above 360.
    #[track_caller]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_degrees(degrees: HsbcFactor) -> Angle {
        assert!(
            degrees >= HsbcFactor::ZERO,
            "negative angle {degrees} degrees"
        );

        let shift = HsbcFactor::FRACTIONAL_BITS + 32 - ANGLE_FRACTIONAL_BITS;
        let radians = multiply_unsigned(degrees.to_bits() as u32, DEGREES_TO_RADIANS, shift);
        assert!(radians <= TWO_PI_BITS, "angle {degrees} degrees above 360");
        Angle(radians)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/2^{} rad", self.0, ANGLE_FRACTIONAL_BITS)
    }
}

/// sin(i * pi / 512) with 30 fractional bits, for i in 0..=256
const SINE_TABLE: [i32; INTERVALS + 1] = [
    0, 6588356, 13176464, 19764076, 26350943, 32936819, 39521455,
    46104602, 52686014, 59265442, 65842639, 72417357, 78989349, 85558366,
    92124163, 98686491, 105245103, 111799753, 118350194, 124896179, 131437462,
    137973796, 144504935, 151030634, 157550647, 164064728, 170572633, 177074115,
    183568930, 190056834, 196537583, 203010932, 209476638, 215934457, 222384147,
    228825464, 235258165, 241682010, 248096755, 254502159, 260897982, 267283981,
    273659918, 280025552, 286380643, 292724951, 299058239, 305380268, 311690799,
    317989595, 324276419, 330551034, 336813204, 343062693, 349299266, 355522689,
    361732726, 367929144, 374111709, 380280190, 386434353, 392573967, 398698801,
    404808624, 410903207, 416982319, 423045732, 429093217, 435124548, 441139496,
    447137835, 453119340, 459083786, 465030947, 470960600, 476872522, 482766489,
    488642281, 494499676, 500338453, 506158392, 511959275, 517740883, 523502998,
    529245404, 534967884, 540670223, 546352205, 552013618, 557654248, 563273883,
    568872310, 574449320, 580004702, 585538248, 591049748, 596538995, 602005783,
    607449906, 612871159, 618269338, 623644239, 628995660, 634323400, 639627258,
    644907034, 650162530, 655393548, 660599890, 665781362, 670937767, 676068911,
    681174602, 686254647, 691308855, 696337036, 701339000, 706314559, 711263525,
    716185713, 721080937, 725949013, 730789757, 735602987, 740388522, 745146182,
    749875788, 754577161, 759250125, 763894504, 768510122, 773096806, 777654384,
    782182683, 786681534, 791150767, 795590213, 799999706, 804379079, 808728167,
    813046808, 817334838, 821592095, 825818421, 830013654, 834177638, 838310216,
    842411232, 846480531, 850517961, 854523370, 858496606, 862437520, 866345964,
    870221790, 874064853, 877875009, 881652112, 885396022, 889106597, 892783698,
    896427186, 900036924, 903612776, 907154608, 910662286, 914135678, 917574653,
    920979082, 924348837, 927683790, 930983817, 934248793, 937478595, 940673101,
    943832191, 946955747, 950043650, 953095785, 956112036, 959092290, 962036435,
    964944360, 967815955, 970651112, 973449725, 976211688, 978936898, 981625251,
    984276646, 986890984, 989468165, 992008094, 994510675, 996975812, 999403415,
    1001793390, 1004145648, 1006460100, 1008736660, 1010975242, 1013175761, 1015338134,
    1017462281, 1019548121, 1021595575, 1023604567, 1025575020, 1027506862, 1029400018,
    1031254418, 1033069992, 1034846671, 1036584389, 1038283080, 1039942680, 1041563127,
    1043144360, 1044686319, 1046188946, 1047652185, 1049075980, 1050460278, 1051805027,
    1053110176, 1054375676, 1055601479, 1056787540, 1057933813, 1059040255, 1060106826,
    1061133483, 1062120190, 1063066909, 1063973603, 1064840240, 1065666786, 1066453210,
    1067199483, 1067905576, 1068571464, 1069197120, 1069782521, 1070327646, 1070832474,
    1071296985, 1071721163, 1072104991, 1072448455, 1072751542, 1073014240, 1073236540,
    1073418433, 1073559913, 1073660973, 1073721611, 1073741824,
];
static_assert!(SINE_TABLE[INTERVALS] == TrigValue::ONE.to_bits());

/// Sine of an angle in [0, pi / 2].
fn quarter_wave(angle: u32) -> i32 {
    // Table position with POSITION_FRACTIONAL_BITS fractional bits
    let position = divide_unsigned(
        angle,
        HALF_PI_BITS,
        32 - INTERVAL_BITS - POSITION_FRACTIONAL_BITS,
    );

    let index = (position >> POSITION_FRACTIONAL_BITS) as usize;
    if index >= INTERVALS {
        return SINE_TABLE[INTERVALS];
    }

    let lower = SINE_TABLE[index];
    let upper = SINE_TABLE[index + 1];
    #[allow(clippy::cast_possible_wrap)]
    let fraction = (position & POSITION_FRACTION_MASK) as i32;
    lower + multiply_signed(upper - lower, fraction, POSITION_FRACTIONAL_BITS)
}

/// Computes the sine of `theta`.
///
/// # Panics
///
/// If `theta` is above 2 pi.
#[track_caller]
pub fn sine(theta: Angle) -> TrigValue {
    assert!(theta <= Angle::TWO_PI, "angle {theta} above 2 pi");

    let theta = theta.0;
    let (folded, negative) = if theta <= HALF_PI_BITS {
        (theta, false)
    } else if theta <= PI_BITS {
        (PI_BITS - theta, false)
    } else if theta <= THREE_HALVES_PI_BITS {
        (theta - PI_BITS, true)
    } else {
        (TWO_PI_BITS - theta, true)
    };

    let value = quarter_wave(folded);
    TrigValue::from_bits(if negative { -value } else { value })
}

/// Computes the cosine of `theta` as `sine(theta + pi / 2)`.
///
/// # Panics
///
/// If `theta` is above 2 pi.
#[track_caller]
pub fn cosine(theta: Angle) -> TrigValue {
    assert!(theta <= Angle::TWO_PI, "angle {theta} above 2 pi");

    let mut shifted = theta.0 + HALF_PI_BITS;
    if shifted > TWO_PI_BITS {
        shifted -= TWO_PI_BITS;
    }

    sine(Angle(shifted))
}
