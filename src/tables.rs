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

//! Characterization tables.
//!
//! The matrices map full range components with zero-centred chroma. Range
//! scaling and offsets are applied separately by the generator.
//!
//! Colour space matrices derive from the luma weights (Kr, Kb) of each
//! standard. Primary matrices map linear RGB through CIE XYZ; pairs with
//! different white points (BT.470-2 System M uses Illuminant C) include a
//! Bradford adaptation.
use crate::colour_space::{ColourPrimary, ColourSpace, Range};
use crate::fixed_point::{Coefficient, Matrix3};
use core::fmt;
use paste::paste;
use thiserror::Error;

/// Luma/chroma flag of a colour space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColourSpaceEntry {
    /// Described colour space
    pub colour_space: ColourSpace,
    /// Whether the colour space has a luma and two chroma components
    pub is_yuv: bool,
}

/// Scale factors and offsets of a quantization range.
///
/// Scales expand the range to full range (e.g. 255/219 for studio luma).
/// Offsets are the code value of black (or of zero chroma) in the range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RangeEntry {
    /// Described range
    pub range: Range,
    /// Scale of RGB components
    pub rgb_scale: Coefficient,
    /// Scale of the luma component
    pub y_scale: Coefficient,
    /// Scale of the chroma components
    pub uv_scale: Coefficient,
    /// Offset of RGB components
    pub rgb_offset: i32,
    /// Offset of the luma component
    pub y_offset: i32,
    /// Offset of the chroma components
    pub uv_offset: i32,
}

/// A pre-characterized conversion between two colour spaces or primaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConversionEntry<K> {
    /// Source
    pub input: K,
    /// Destination
    pub output: K,
    /// The matrix is the identity and the conversion can be skipped
    pub is_identity: bool,
    /// The conversion is characterized
    pub is_supported: bool,
    /// Conversion matrix
    pub matrix: Matrix3,
}

/// Conversion between colour spaces.
pub type ColourSpaceConversion = ConversionEntry<ColourSpace>;
/// Conversion between colour primaries.
pub type PrimaryConversion = ConversionEntry<ColourPrimary>;

/// Full set of tables consumed by the generator.
#[derive(Copy, Clone, Debug)]
pub struct ColourTables {
    /// Indexed by [`ColourSpace`]
    pub colour_spaces: &'static [ColourSpaceEntry; ColourSpace::COUNT],
    /// Indexed by [`Range`]
    pub ranges: &'static [RangeEntry; Range::COUNT],
    /// Indexed by input, then output [`ColourSpace`]
    pub colour_space_conversions:
        &'static [[ColourSpaceConversion; ColourSpace::COUNT]; ColourSpace::COUNT],
    /// Indexed by input, then output [`ColourPrimary`]
    pub primary_conversions:
        &'static [[PrimaryConversion; ColourPrimary::COUNT]; ColourPrimary::COUNT],
}

/// An inconsistency found in a set of [`ColourTables`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// An entry is stored at a position that does not match what it describes
    #[error("{table} entry at [{row}][{col}] describes {input} -> {output}")]
    MisplacedEntry {
        /// Table name
        table: &'static str,
        /// Row of the entry
        row: usize,
        /// Column of the entry
        col: usize,
        /// Recorded input
        input: String,
        /// Recorded output
        output: String,
    },
    /// A conversion to the same colour space or primary is not a supported identity
    #[error("{table} entry {input} -> {input} is not a supported identity")]
    NonIdentityDiagonal {
        /// Table name
        table: &'static str,
        /// Colour space or primary
        input: String,
    },
    /// An entry is flagged identity but its matrix is not the identity
    #[error("{table} entry {input} -> {output} is flagged identity but its matrix is not")]
    FalseIdentity {
        /// Table name
        table: &'static str,
        /// Recorded input
        input: String,
        /// Recorded output
        output: String,
    },
    /// A colour space conversion is not characterized
    #[error("colour space conversion {input} -> {output} is unsupported")]
    UnsupportedColourSpacePair {
        /// Input colour space
        input: ColourSpace,
        /// Output colour space
        output: ColourSpace,
    },
    /// A colour space entry is stored at the wrong position or has a wrong flag
    #[error("colour space entry {index} describes {colour_space} (yuv: {is_yuv})")]
    InvalidColourSpace {
        /// Position of the entry
        index: usize,
        /// Recorded colour space
        colour_space: ColourSpace,
        /// Recorded flag
        is_yuv: bool,
    },
    /// A range entry is stored at the wrong position or has a non-positive scale
    #[error("range entry {index} describes {range} with scales {rgb}, {y}, {uv}")]
    InvalidRange {
        /// Position of the entry
        index: usize,
        /// Recorded range
        range: Range,
        /// RGB scale
        rgb: Coefficient,
        /// Luma scale
        y: Coefficient,
        /// Chroma scale
        uv: Coefficient,
    },
}

fn validate_conversions<K, const N: usize>(
    table: &'static str,
    entries: &[[ConversionEntry<K>; N]; N],
    keys: &[K; N],
) -> Result<(), TableError>
where
    K: Copy + PartialEq + fmt::Display,
{
    for (row, (line, &input)) in entries.iter().zip(keys.iter()).enumerate() {
        for (col, (entry, &output)) in line.iter().zip(keys.iter()).enumerate() {
            if entry.input != input || entry.output != output {
                return Err(TableError::MisplacedEntry {
                    table,
                    row,
                    col,
                    input: entry.input.to_string(),
                    output: entry.output.to_string(),
                });
            }

            if row == col && !(entry.is_identity && entry.is_supported) {
                return Err(TableError::NonIdentityDiagonal {
                    table,
                    input: input.to_string(),
                });
            }

            if entry.is_identity && !entry.matrix.is_identity() {
                return Err(TableError::FalseIdentity {
                    table,
                    input: input.to_string(),
                    output: output.to_string(),
                });
            }
        }
    }

    Ok(())
}

impl ColourTables {
    /// Checks that every entry sits at the position matching what it
    /// describes, that conversions to self are supported identities, that
    /// identity flags are truthful, that every colour space pair is
    /// supported and that range scales are positive.
    ///
    /// # Errors
    ///
    /// The first inconsistency found.
    pub fn validate(&self) -> Result<(), TableError> {
        for (index, (entry, &colour_space)) in self
            .colour_spaces
            .iter()
            .zip(ColourSpace::ALL.iter())
            .enumerate()
        {
            if entry.colour_space != colour_space || entry.is_yuv != colour_space.is_yuv() {
                return Err(TableError::InvalidColourSpace {
                    index,
                    colour_space: entry.colour_space,
                    is_yuv: entry.is_yuv,
                });
            }
        }

        for (index, (entry, &range)) in self.ranges.iter().zip(Range::ALL.iter()).enumerate() {
            let positive = [entry.rgb_scale, entry.y_scale, entry.uv_scale]
                .iter()
                .all(|scale| *scale > Coefficient::ZERO);
            if entry.range != range || !positive {
                return Err(TableError::InvalidRange {
                    index,
                    range: entry.range,
                    rgb: entry.rgb_scale,
                    y: entry.y_scale,
                    uv: entry.uv_scale,
                });
            }
        }

        validate_conversions(
            "colour space",
            self.colour_space_conversions,
            &ColourSpace::ALL,
        )?;
        validate_conversions("primary", self.primary_conversions, &ColourPrimary::ALL)?;

        for entry in self.colour_space_conversions.iter().flatten() {
            if !entry.is_supported {
                return Err(TableError::UnsupportedColourSpacePair {
                    input: entry.input,
                    output: entry.output,
                });
            }
        }

        Ok(())
    }

    /// Returns the luma/chroma flag of a colour space.
    pub fn is_yuv(&self, colour_space: ColourSpace) -> bool {
        self.colour_spaces[colour_space.index()].is_yuv
    }

    /// Returns the scales and offsets of a range.
    pub fn range(&self, range: Range) -> &RangeEntry {
        &self.ranges[range.index()]
    }

    /// Returns the conversion between two colour spaces.
    pub fn colour_space_conversion(
        &self,
        input: ColourSpace,
        output: ColourSpace,
    ) -> &ColourSpaceConversion {
        &self.colour_space_conversions[input.index()][output.index()]
    }

    /// Returns the conversion between two colour primaries.
    pub fn primary_conversion(
        &self,
        input: ColourPrimary,
        output: ColourPrimary,
    ) -> &PrimaryConversion {
        &self.primary_conversions[input.index()][output.index()]
    }
}

macro_rules! matrices {
    ($($input:ident => $output:ident: $rows:expr;)*) => {
        paste! {
            $(
                #[doc = concat!(stringify!($input), " to ", stringify!($output), " conversion matrix")]
                pub const [<$input:upper _TO_ $output:upper>]: Matrix3 = Matrix3($rows);
            )*
        }
    };
}

macro_rules! identity {
    ($kind:ident, $key:ident) => {
        ConversionEntry {
            input: $kind::$key,
            output: $kind::$key,
            is_identity: true,
            is_supported: true,
            matrix: Matrix3::IDENTITY,
        }
    };
}

macro_rules! conversion {
    ($kind:ident, $input:ident, $output:ident) => {
        paste! {
            ConversionEntry {
                input: $kind::$input,
                output: $kind::$output,
                is_identity: false,
                is_supported: true,
                matrix: [<$input:upper _TO_ $output:upper>],
            }
        }
    };
}

matrices! {
    Bt601Yuv => Bt709Yuv: [
        [134_217_728, -15_862_908, -28_546_107],
        [0, 136_719_509, 15_383_761],
        [0, 10_072_966, 137_617_070],
    ];
    Bt601Yuv => Smpte240Yuv: [
        [134_217_728, -11_687_081, -27_297_945],
        [0, 136_648_902, 14_949_586],
        [0, 7_415_660, 136_720_304],
    ];
    Bt601Yuv => Rgb: [
        [134_217_728, 0, 188_173_255],
        [134_217_728, -46_189_190, -95_849_750],
        [134_217_728, 237_833_814, 0],
    ];
    Bt709Yuv => Bt601Yuv: [
        [134_217_728, 13_633_710, 26_316_909],
        [0, 132_855_929, -14_851_529],
        [0, -9_724_472, 131_989_422],
    ];
    Bt709Yuv => Smpte240Yuv: [
        [134_217_728, 4_043_025, 765_375],
        [0, 134_179_294, -419_154],
        [0, -2_565_371, 133_629_888],
    ];
    Bt709Yuv => Rgb: [
        [134_217_728, 0, 211_366_078],
        [134_217_728, -25_142_238, -62_830_576],
        [134_217_728, 249_054_416, 0],
    ];
    Smpte240Yuv => Bt601Yuv: [
        [134_217_728, 10_084_705, 25_695_569],
        [0, 132_616_742, -14_500_885],
        [0, -7_193_085, 132_547_483],
    ];
    Smpte240Yuv => Bt709Yuv: [
        [134_217_728, -4_059_124, -781_474],
        [0, 134_264_225, 421_143],
        [0, 2_577_549, 134_816_239],
    ];
    Smpte240Yuv => Rgb: [
        [134_217_728, 0, 211_527_139],
        [134_217_728, -30_416_686, -63_971_118],
        [134_217_728, 245_081_571, 0],
    ];
    Rgb => Bt601Yuv: [
        [40_131_101, 78_785_806, 15_300_821],
        [-22_647_348, -44_461_516, 67_108_864],
        [67_108_864, -56_195_297, -10_913_567],
    ];
    Rgb => Bt709Yuv: [
        [28_534_689, 95_992_519, 9_690_520],
        [-15_377_608, -51_731_256, 67_108_864],
        [67_108_864, -60_955_372, -6_153_492],
    ];
    Rgb => Smpte240Yuv: [
        [28_454_158, 94_086_627, 11_676_942],
        [-15_582_781, -51_526_083, 67_108_864],
        [67_108_864, -59_699_637, -7_409_227],
    ];
}

matrices! {
    Bt709 => Bt601: [
        [142_992_753, -7_435_779, -1_339_246],
        [-2_635_036, 139_098_300, -2_245_536],
        [219_050, 592_219, 133_406_459],
    ];
    Bt709 => Bt470_2SysBg: [
        [128_555_722, 5_662_006, 0],
        [0, 134_217_728, 0],
        [0, -1_601_771, 135_819_499],
    ];
    Bt709 => Bt470_2SysM: [
        [91_047_455, 38_719_045, 4_451_227],
        [2_216_359, 141_198_246, -9_196_877],
        [2_404_892, 6_795_600, 125_017_236],
    ];
    Bt601 => Bt709: [
        [126_103_201, 6_735_228, 1_379_299],
        [2_385_347, 129_626_524, 2_205_857],
        [-217_647, -586_498, 135_021_873],
    ];
    Bt601 => Bt470_2SysBg: [
        [120_884_134, 11_919_426, 1_414_168],
        [2_385_347, 129_626_524, 2_205_857],
        [-248_712, -2_140_476, 136_606_916],
    ];
    Bt601 => Bt470_2SysM: [
        [86_223_820, 41_944_012, 6_049_897],
        [4_606_683, 136_519_666, -6_908_621],
        [2_177_542, 6_137_529, 125_902_657],
    ];
    Bt470_2SysBg => Bt709: [
        [140_129_107, -5_911_379, 0],
        [0, 134_217_728, 0],
        [0, 1_582_880, 132_634_848],
    ];
    Bt470_2SysBg => Bt601: [
        [149_290_613, -13_749_433, -1_323_452],
        [-2_751_092, 139_187_873, -2_219_053],
        [228_698, 2_155_884, 131_833_146],
    ];
    Bt470_2SysBg => Bt470_2SysM: [
        [95_057_477, 34_761_518, 4_398_732],
        [2_313_974, 140_992_168, -9_088_414],
        [2_510_811, 8_164_056, 123_542_861],
    ];
    Bt470_2SysM => Bt709: [
        [199_468_595, -54_164_223, -11_086_645],
        [-3_369_014, 128_047_026, 9_539_716],
        [-3_653_944, -5_918_362, 143_790_034],
    ];
    Bt470_2SysM => Bt601: [
        [212_732_765, -64_740_290, -13_774_748],
        [-7_346_466, 133_865_611, 7_698_583],
        [-3_321_180, -5_405_996, 142_944_905],
    ];
    Bt470_2SysM => Bt470_2SysBg: [
        [190_911_843, -46_477_598, -10_216_517],
        [-3_369_014, 128_047_026, 9_539_716],
        [-3_657_344, -7_517_121, 145_392_193],
    ];
}

/// Built-in colour space flags.
pub const COLOUR_SPACES: [ColourSpaceEntry; ColourSpace::COUNT] = [
    ColourSpaceEntry {
        colour_space: ColourSpace::Bt601Yuv,
        is_yuv: true,
    },
    ColourSpaceEntry {
        colour_space: ColourSpace::Bt709Yuv,
        is_yuv: true,
    },
    ColourSpaceEntry {
        colour_space: ColourSpace::Smpte240Yuv,
        is_yuv: true,
    },
    ColourSpaceEntry {
        colour_space: ColourSpace::Rgb,
        is_yuv: false,
    },
];

/// Built-in ranges.
pub const RANGES: [RangeEntry; Range::COUNT] = [
    RangeEntry {
        range: Range::Full,
        rgb_scale: Coefficient::ONE,
        y_scale: Coefficient::ONE,
        uv_scale: Coefficient::ONE,
        rgb_offset: 0,
        y_offset: 0,
        uv_offset: 0,
    },
    // 255/219, chroma 255/224
    RangeEntry {
        range: Range::Studio,
        rgb_scale: Coefficient::from_bits(156_280_916),
        y_scale: Coefficient::from_bits(156_280_916),
        uv_scale: Coefficient::from_bits(152_792_503),
        rgb_offset: 16,
        y_offset: 16,
        uv_offset: 0,
    },
    // 255/160
    RangeEntry {
        range: Range::Limited,
        rgb_scale: Coefficient::from_bits(213_909_504),
        y_scale: Coefficient::from_bits(213_909_504),
        uv_scale: Coefficient::from_bits(213_909_504),
        rgb_offset: 48,
        y_offset: 48,
        uv_offset: 0,
    },
];

/// Built-in colour space conversions.
pub const COLOUR_SPACE_CONVERSIONS: [[ColourSpaceConversion; ColourSpace::COUNT];
    ColourSpace::COUNT] = [
    [
        identity!(ColourSpace, Bt601Yuv),
        conversion!(ColourSpace, Bt601Yuv, Bt709Yuv),
        conversion!(ColourSpace, Bt601Yuv, Smpte240Yuv),
        conversion!(ColourSpace, Bt601Yuv, Rgb),
    ],
    [
        conversion!(ColourSpace, Bt709Yuv, Bt601Yuv),
        identity!(ColourSpace, Bt709Yuv),
        conversion!(ColourSpace, Bt709Yuv, Smpte240Yuv),
        conversion!(ColourSpace, Bt709Yuv, Rgb),
    ],
    [
        conversion!(ColourSpace, Smpte240Yuv, Bt601Yuv),
        conversion!(ColourSpace, Smpte240Yuv, Bt709Yuv),
        identity!(ColourSpace, Smpte240Yuv),
        conversion!(ColourSpace, Smpte240Yuv, Rgb),
    ],
    [
        conversion!(ColourSpace, Rgb, Bt601Yuv),
        conversion!(ColourSpace, Rgb, Bt709Yuv),
        conversion!(ColourSpace, Rgb, Smpte240Yuv),
        identity!(ColourSpace, Rgb),
    ],
];

/// Built-in colour primary conversions.
pub const PRIMARY_CONVERSIONS: [[PrimaryConversion; ColourPrimary::COUNT];
    ColourPrimary::COUNT] = [
    [
        identity!(ColourPrimary, Bt709),
        conversion!(ColourPrimary, Bt709, Bt601),
        conversion!(ColourPrimary, Bt709, Bt470_2SysBg),
        conversion!(ColourPrimary, Bt709, Bt470_2SysM),
    ],
    [
        conversion!(ColourPrimary, Bt601, Bt709),
        identity!(ColourPrimary, Bt601),
        conversion!(ColourPrimary, Bt601, Bt470_2SysBg),
        conversion!(ColourPrimary, Bt601, Bt470_2SysM),
    ],
    [
        conversion!(ColourPrimary, Bt470_2SysBg, Bt709),
        conversion!(ColourPrimary, Bt470_2SysBg, Bt601),
        identity!(ColourPrimary, Bt470_2SysBg),
        conversion!(ColourPrimary, Bt470_2SysBg, Bt470_2SysM),
    ],
    [
        conversion!(ColourPrimary, Bt470_2SysM, Bt709),
        conversion!(ColourPrimary, Bt470_2SysM, Bt601),
        conversion!(ColourPrimary, Bt470_2SysM, Bt470_2SysBg),
        identity!(ColourPrimary, Bt470_2SysM),
    ],
];

/// The tables compiled into the library.
pub static BUILTIN_TABLES: ColourTables = ColourTables {
    colour_spaces: &COLOUR_SPACES,
    ranges: &RANGES,
    colour_space_conversions: &COLOUR_SPACE_CONVERSIONS,
    primary_conversions: &PRIMARY_CONVERSIONS,
};
