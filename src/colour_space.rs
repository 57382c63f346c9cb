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
use core::fmt;

/// An enumeration of supported colour spaces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum ColourSpace {
    /// YCbCr, ITU-R Recommendation BT.601
    Bt601Yuv,
    /// YCbCr, ITU-R Recommendation BT.709
    Bt709Yuv,
    /// YCbCr, SMPTE 240M
    Smpte240Yuv,
    /// Gamma-corrected R'G'B'
    Rgb,
}

impl ColourSpace {
    /// Number of colour spaces.
    pub const COUNT: usize = 4;

    /// All colour spaces, in table order.
    pub const ALL: [ColourSpace; ColourSpace::COUNT] = [
        ColourSpace::Bt601Yuv,
        ColourSpace::Bt709Yuv,
        ColourSpace::Smpte240Yuv,
        ColourSpace::Rgb,
    ];

    /// Returns `true` for the luma/chroma colour spaces.
    pub const fn is_yuv(self) -> bool {
        !matches!(self, ColourSpace::Rgb)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ColourSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColourSpace::Bt601Yuv => write!(f, "bt-601"),
            ColourSpace::Bt709Yuv => write!(f, "bt-709"),
            ColourSpace::Smpte240Yuv => write!(f, "smpte-240"),
            ColourSpace::Rgb => write!(f, "rgb"),
        }
    }
}

impl TryFrom<i32> for ColourSpace {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColourSpace::Bt601Yuv),
            1 => Ok(ColourSpace::Bt709Yuv),
            2 => Ok(ColourSpace::Smpte240Yuv),
            3 => Ok(ColourSpace::Rgb),
            _ => Err(()),
        }
    }
}

/// An enumeration of supported quantization ranges.
///
/// Luma and RGB components share the range bounds. Chroma components are
/// signed and zero-centred whatever the range, so their offset is always 0:
/// a studio range image spans -112 to 112, a limited range one -80 to 80.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum Range {
    /// 0-255
    Full,
    /// 16-235
    Studio,
    /// 48-208
    Limited,
}

impl Range {
    /// Number of ranges.
    pub const COUNT: usize = 3;

    /// All ranges, in table order.
    pub const ALL: [Range; Range::COUNT] = [Range::Full, Range::Studio, Range::Limited];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Range::Full => write!(f, "0-255"),
            Range::Studio => write!(f, "16-235"),
            Range::Limited => write!(f, "48-208"),
        }
    }
}

impl TryFrom<i32> for Range {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Range::Full),
            1 => Ok(Range::Studio),
            2 => Ok(Range::Limited),
            _ => Err(()),
        }
    }
}

/// An enumeration of supported colour primaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum ColourPrimary {
    /// ITU-R Recommendation BT.709
    Bt709,
    /// ITU-R Recommendation BT.601 (SMPTE 170M)
    Bt601,
    /// ITU-R Recommendation BT.470-2, System B, G
    Bt470_2SysBg,
    /// ITU-R Recommendation BT.470-2, System M
    Bt470_2SysM,
}

impl ColourPrimary {
    /// Number of colour primaries.
    pub const COUNT: usize = 4;

    /// All colour primaries, in table order.
    pub const ALL: [ColourPrimary; ColourPrimary::COUNT] = [
        ColourPrimary::Bt709,
        ColourPrimary::Bt601,
        ColourPrimary::Bt470_2SysBg,
        ColourPrimary::Bt470_2SysM,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ColourPrimary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColourPrimary::Bt709 => write!(f, "bt-709"),
            ColourPrimary::Bt601 => write!(f, "bt-601"),
            ColourPrimary::Bt470_2SysBg => write!(f, "bt-470-2-bg"),
            ColourPrimary::Bt470_2SysM => write!(f, "bt-470-2-m"),
        }
    }
}

impl TryFrom<i32> for ColourPrimary {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColourPrimary::Bt709),
            1 => Ok(ColourPrimary::Bt601),
            2 => Ok(ColourPrimary::Bt470_2SysBg),
            3 => Ok(ColourPrimary::Bt470_2SysM),
            _ => Err(()),
        }
    }
}
