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
use crate::colour_space::{ColourPrimary, ColourSpace, Range};
use crate::fixed_point::{divide_signed, Coefficient, Matrix3, OutputOffset, CSC_FRACTIONAL_BITS};
use crate::hsbc::{self, HsbcSettings};
use crate::tables::{
    ColourSpaceConversion, ColourTables, ConversionEntry, PrimaryConversion, RangeEntry,
    TableError, BUILTIN_TABLES,
};
use crate::ErrorKind;
use core::fmt;
use std::sync::OnceLock;
use tracing::{debug, error, trace};

/// Describes a conversion: source and destination colour space, range and
/// primaries, plus an optional picture adjustment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CscRequest {
    /// Source colour space
    pub input_space: ColourSpace,
    /// Destination colour space
    pub output_space: ColourSpace,
    /// Source range
    pub input_range: Range,
    /// Destination range
    pub output_range: Range,
    /// Source primaries
    pub input_primary: ColourPrimary,
    /// Destination primaries
    pub output_primary: ColourPrimary,
    /// Hue, saturation, brightness and contrast adjustment
    pub hsbc: Option<HsbcSettings>,
}

impl CscRequest {
    /// Full range BT.709 conversion between two colour spaces.
    pub const fn new(input_space: ColourSpace, output_space: ColourSpace) -> Self {
        CscRequest {
            input_space,
            output_space,
            input_range: Range::Full,
            output_range: Range::Full,
            input_primary: ColourPrimary::Bt709,
            output_primary: ColourPrimary::Bt709,
            hsbc: None,
        }
    }

    /// Sets source and destination ranges.
    #[must_use]
    pub fn with_ranges(mut self, input: Range, output: Range) -> Self {
        self.input_range = input;
        self.output_range = output;
        self
    }

    /// Sets source and destination primaries.
    #[must_use]
    pub fn with_primaries(mut self, input: ColourPrimary, output: ColourPrimary) -> Self {
        self.input_primary = input;
        self.output_primary = output;
        self
    }

    /// Sets the picture adjustment.
    #[must_use]
    pub fn with_hsbc(mut self, settings: HsbcSettings) -> Self {
        self.hsbc = Some(settings);
        self
    }
}

impl Default for CscRequest {
    fn default() -> Self {
        CscRequest::new(ColourSpace::Rgb, ColourSpace::Rgb)
    }
}

impl fmt::Display for CscRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} -> {}/{}/{}",
            self.input_space,
            self.input_range,
            self.input_primary,
            self.output_space,
            self.output_range,
            self.output_primary
        )?;

        if self.hsbc.is_some() {
            write!(f, " (hsbc)")?;
        }

        Ok(())
    }
}

/// Result of a matrix generation.
///
/// A pixel is converted as `out = matrix * (in + input_offsets) + output_offsets`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CscConfiguration {
    /// Composite conversion matrix
    pub matrix: Matrix3,
    /// Added to each input component, in code values
    pub input_offsets: [i32; 3],
    /// Added to each output component
    pub output_offsets: [OutputOffset; 3],
}

/// Luma and chroma scale of one side of the conversion. RGB sides use the
/// same value for both.
#[derive(Copy, Clone, Debug)]
struct ChannelScales {
    luma: Coefficient,
    chroma: Coefficient,
}

impl ChannelScales {
    fn pick(entry: &RangeEntry, is_yuv: bool) -> ChannelScales {
        if is_yuv {
            ChannelScales {
                luma: entry.y_scale,
                chroma: entry.uv_scale,
            }
        } else {
            ChannelScales {
                luma: entry.rgb_scale,
                chroma: entry.rgb_scale,
            }
        }
    }

    fn is_unity(&self) -> bool {
        self.luma == Coefficient::ONE && self.chroma == Coefficient::ONE
    }

    fn input(entry: &RangeEntry, is_yuv: bool) -> Option<ChannelScales> {
        let scales = ChannelScales::pick(entry, is_yuv);
        (!scales.is_unity()).then_some(scales)
    }

    fn output(entry: &RangeEntry, is_yuv: bool) -> Option<ChannelScales> {
        let scales = ChannelScales::pick(entry, is_yuv);
        (!scales.is_unity()).then(|| ChannelScales {
            luma: reciprocal(scales.luma),
            chroma: reciprocal(scales.chroma),
        })
    }

    fn per_channel(&self) -> [Coefficient; 3] {
        [self.luma, self.chroma, self.chroma]
    }
}

fn reciprocal(scale: Coefficient) -> Coefficient {
    if scale == Coefficient::ONE {
        return scale;
    }

    Coefficient::from_bits(divide_signed(
        Coefficient::ONE.to_bits(),
        scale.to_bits(),
        32 - CSC_FRACTIONAL_BITS,
    ))
}

/// Range scale matrices, applied elementwise to a conversion matrix.
/// `None` stands for a matrix of ones.
#[derive(Debug)]
struct RangeScaling {
    /// Scales column j by the input scale of channel j
    input: Option<Matrix3>,
    /// Scales row i by the output scale of channel i
    output: Option<Matrix3>,
    /// Both of the above
    combined: Option<Matrix3>,
}

impl RangeScaling {
    fn new(
        tables: &ColourTables,
        request: &CscRequest,
        input_yuv: bool,
        output_yuv: bool,
    ) -> RangeScaling {
        let input = ChannelScales::input(tables.range(request.input_range), input_yuv);
        let output = ChannelScales::output(tables.range(request.output_range), output_yuv);

        let input_matrix = input.map(|scales| {
            let [y, u, v] = scales.per_channel().map(Coefficient::to_bits);
            Matrix3([[y, u, v]; 3])
        });
        let output_matrix = output.map(|scales| {
            let [y, u, v] = scales.per_channel().map(Coefficient::to_bits);
            Matrix3([[y; 3], [u; 3], [v; 3]])
        });

        // Same range and kind on both sides: no scaling at all, even where
        // studio luma and chroma scales differ.
        let same_kind = request.input_range == request.output_range && input_yuv == output_yuv;
        let combined = if same_kind {
            None
        } else {
            match (input, output) {
                (Some(input), Some(output)) => {
                    let mut rows = [[0; 3]; 3];
                    for (row, out_scale) in rows.iter_mut().zip(output.per_channel()) {
                        for (cell, in_scale) in row.iter_mut().zip(input.per_channel()) {
                            let scale: Coefficient = out_scale.multiply(in_scale);
                            *cell = scale.to_bits();
                        }
                    }

                    Some(Matrix3(rows))
                }
                (Some(_), None) => input_matrix,
                (None, Some(_)) => output_matrix,
                (None, None) => None,
            }
        };

        RangeScaling {
            input: input_matrix,
            output: output_matrix,
            combined,
        }
    }
}

fn out_of_range() -> ErrorKind {
    debug!("coefficient outside of the Q27 range");
    ErrorKind::InvalidOperation
}

/// Matrix of a table entry, scaled elementwise. `None` when the result
/// is the identity.
fn conversion_stage<K>(
    entry: &ConversionEntry<K>,
    scale: Option<&Matrix3>,
) -> Result<Option<Matrix3>, ErrorKind> {
    let scaled = match (entry.is_identity, scale) {
        (true, None) => return Ok(None),
        (false, None) => return Ok(Some(entry.matrix)),
        (true, Some(scale)) => Matrix3::IDENTITY.checked_scale(scale),
        (false, Some(scale)) => entry.matrix.checked_scale(scale),
    };

    scaled.map(Some).ok_or_else(out_of_range)
}

/// Appends a stage to the accumulated transform. `None` on either side
/// stands for the identity and costs no multiplication.
fn then(
    accumulated: Option<Matrix3>,
    next: Option<Matrix3>,
) -> Result<Option<Matrix3>, ErrorKind> {
    match (accumulated, next) {
        (Some(accumulated), Some(next)) => accumulated
            .checked_then(&next)
            .map(Some)
            .ok_or_else(out_of_range),
        (None, next) => Ok(next),
        (accumulated, None) => Ok(accumulated),
    }
}

/// Matrix generator over a set of validated tables.
#[derive(Copy, Clone, Debug)]
pub struct CscGenerator {
    tables: &'static ColourTables,
}

impl CscGenerator {
    /// Validates `tables` and builds a generator over them.
    ///
    /// # Errors
    ///
    /// The first inconsistency found in the tables.
    pub fn new(tables: &'static ColourTables) -> Result<Self, TableError> {
        tables.validate()?;
        Ok(CscGenerator { tables })
    }

    /// Returns the generator over the built-in tables. The tables are
    /// validated on first use.
    ///
    /// # Panics
    ///
    /// If the built-in tables are inconsistent.
    pub fn global() -> &'static CscGenerator {
        static INSTANCE: OnceLock<CscGenerator> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            CscGenerator::new(&BUILTIN_TABLES).unwrap_or_else(|err| {
                error!(error = %err, "built-in colour tables are inconsistent");
                panic!("built-in colour tables are inconsistent: {err}");
            })
        })
    }

    /// Returns the tables in use.
    pub fn tables(&self) -> &'static ColourTables {
        self.tables
    }

    /// Computes the conversion matrix and offsets for `request`.
    ///
    /// # Panics
    ///
    /// On invalid HSBC settings, on unsupported colour space or primary
    /// pairs and when a coefficient cannot be represented.
    #[track_caller]
    pub fn generate(&self, request: &CscRequest) -> CscConfiguration {
        match self.try_generate(request) {
            Ok(configuration) => configuration,
            Err(err) => panic!("cannot generate matrix for {request}: {err}"),
        }
    }

    /// Computes the conversion matrix and offsets for `request`.
    ///
    /// # Errors
    ///
    /// * [`InvalidValue`] if the HSBC settings are out of range
    /// * [`InvalidOperation`] if a colour space or primary conversion needed
    ///   by the request is unsupported, or if a coefficient of the result
    ///   falls outside of the Q27 range
    ///
    /// [`InvalidValue`]: ../enum.ErrorKind.html#variant.InvalidValue
    /// [`InvalidOperation`]: ../enum.ErrorKind.html#variant.InvalidOperation
    pub fn try_generate(&self, request: &CscRequest) -> Result<CscConfiguration, ErrorKind> {
        if let Some(settings) = &request.hsbc {
            settings.validate()?;
        }

        let input_yuv = self.tables.is_yuv(request.input_space);
        let output_yuv = self.tables.is_yuv(request.output_space);
        let scaling = RangeScaling::new(self.tables, request, input_yuv, output_yuv);
        trace!(?scaling, "range scaling");

        let hsbc = request.hsbc.as_ref().map(hsbc::build_matrix);
        let matrix = match (input_yuv, output_yuv) {
            (true, true) => self.yuv_to_yuv(request, &scaling, hsbc)?,
            (true, false) => self.yuv_to_rgb(request, &scaling, hsbc)?,
            (false, true) => self.rgb_to_yuv(request, &scaling, hsbc)?,
            (false, false) => self.rgb_to_rgb(request, &scaling, hsbc)?,
        }
        .unwrap_or(Matrix3::IDENTITY);
        trace!(%matrix, "composite matrix");

        let (input_offsets, output_offsets) = self.offsets(request, input_yuv, output_yuv, &matrix);
        Ok(CscConfiguration {
            matrix,
            input_offsets,
            output_offsets,
        })
    }

    fn colour_space_conversion(
        &self,
        input: ColourSpace,
        output: ColourSpace,
    ) -> Result<&'static ColourSpaceConversion, ErrorKind> {
        let entry = self.tables.colour_space_conversion(input, output);
        if entry.is_supported {
            Ok(entry)
        } else {
            debug!(%input, %output, "unsupported colour space conversion");
            Err(ErrorKind::InvalidOperation)
        }
    }

    fn primary_conversion(
        &self,
        input: ColourPrimary,
        output: ColourPrimary,
    ) -> Result<&'static PrimaryConversion, ErrorKind> {
        let entry = self.tables.primary_conversion(input, output);
        if entry.is_supported {
            Ok(entry)
        } else {
            debug!(%input, %output, "unsupported primary conversion");
            Err(ErrorKind::InvalidOperation)
        }
    }

    fn yuv_to_yuv(
        &self,
        request: &CscRequest,
        scaling: &RangeScaling,
        hsbc: Option<Matrix3>,
    ) -> Result<Option<Matrix3>, ErrorKind> {
        let primaries = self.primary_conversion(request.input_primary, request.output_primary)?;

        if primaries.is_identity {
            debug!(%request, "yuv to yuv, direct");
            let direct = self.colour_space_conversion(request.input_space, request.output_space)?;
            let matrix = conversion_stage(direct, scaling.combined.as_ref())?;
            return then(matrix, hsbc);
        }

        debug!(%request, "yuv to yuv through rgb");
        let to_rgb = self.colour_space_conversion(request.input_space, ColourSpace::Rgb)?;
        let from_rgb = self.colour_space_conversion(ColourSpace::Rgb, request.output_space)?;

        // Applied first, multiplied in last: keeps partial products in range.
        let mut conversion = conversion_stage(to_rgb, scaling.input.as_ref())?;
        conversion = then(conversion, conversion_stage(primaries, None)?)?;
        conversion = then(conversion, conversion_stage(from_rgb, scaling.output.as_ref())?)?;
        then(hsbc, conversion)
    }

    fn yuv_to_rgb(
        &self,
        request: &CscRequest,
        scaling: &RangeScaling,
        hsbc: Option<Matrix3>,
    ) -> Result<Option<Matrix3>, ErrorKind> {
        debug!(%request, "yuv to rgb");
        let primaries = self.primary_conversion(request.input_primary, request.output_primary)?;
        let to_rgb = self.colour_space_conversion(request.input_space, request.output_space)?;

        let conversion = then(
            conversion_stage(to_rgb, scaling.combined.as_ref())?,
            conversion_stage(primaries, None)?,
        )?;
        then(hsbc, conversion)
    }

    fn rgb_to_yuv(
        &self,
        request: &CscRequest,
        scaling: &RangeScaling,
        hsbc: Option<Matrix3>,
    ) -> Result<Option<Matrix3>, ErrorKind> {
        debug!(%request, "rgb to yuv");
        let primaries = self.primary_conversion(request.input_primary, request.output_primary)?;
        let to_yuv = self.colour_space_conversion(request.input_space, request.output_space)?;

        let conversion = then(
            conversion_stage(primaries, None)?,
            conversion_stage(to_yuv, scaling.combined.as_ref())?,
        )?;
        then(conversion, hsbc)
    }

    fn rgb_to_rgb(
        &self,
        request: &CscRequest,
        scaling: &RangeScaling,
        hsbc: Option<Matrix3>,
    ) -> Result<Option<Matrix3>, ErrorKind> {
        let Some(hsbc) = hsbc else {
            debug!(%request, "rgb to rgb, direct");
            let primaries =
                self.primary_conversion(request.input_primary, request.output_primary)?;
            let direct = self.colour_space_conversion(request.input_space, request.output_space)?;

            // Both sides are RGB, so the combined scale is the same for every
            // coefficient and folds into the primary matrix.
            return if primaries.is_identity {
                conversion_stage(direct, scaling.combined.as_ref())
            } else {
                conversion_stage(primaries, scaling.combined.as_ref())
            };
        };

        // The adjustment happens in BT.709 YUV whatever the primaries, so
        // the primary conversion is split around it.
        debug!(%request, "rgb to rgb through bt-709 yuv");
        let to_reference = self.primary_conversion(request.input_primary, ColourPrimary::Bt709)?;
        let from_reference =
            self.primary_conversion(ColourPrimary::Bt709, request.output_primary)?;
        let to_yuv = self.colour_space_conversion(request.input_space, ColourSpace::Bt709Yuv)?;
        let from_yuv = self.colour_space_conversion(ColourSpace::Bt709Yuv, request.output_space)?;

        let mut matrix = conversion_stage(to_reference, None)?;
        matrix = then(matrix, conversion_stage(to_yuv, scaling.input.as_ref())?)?;
        matrix = then(matrix, Some(hsbc))?;
        matrix = then(matrix, conversion_stage(from_yuv, scaling.output.as_ref())?)?;
        then(matrix, conversion_stage(from_reference, None)?)
    }

    fn offsets(
        &self,
        request: &CscRequest,
        input_yuv: bool,
        output_yuv: bool,
        matrix: &Matrix3,
    ) -> ([i32; 3], [OutputOffset; 3]) {
        let input = self.tables.range(request.input_range);
        let mut input_offsets = if input_yuv {
            [-input.y_offset, -input.uv_offset, -input.uv_offset]
        } else {
            [-input.rgb_offset; 3]
        };

        let output = self.tables.range(request.output_range);
        let brightness = request
            .hsbc
            .map_or(OutputOffset::ZERO, |settings| settings.brightness_offset());
        let mut output_offsets = if output_yuv {
            let chroma = OutputOffset::from_int(output.uv_offset);
            [
                OutputOffset::from_int(output.y_offset) + brightness,
                chroma,
                chroma,
            ]
        } else {
            [OutputOffset::from_int(output.rgb_offset) + brightness; 3]
        };

        // out = (in + a) + b when the matrix is the identity
        if matrix.is_identity() {
            for (input_offset, output_offset) in input_offsets.iter_mut().zip(&mut output_offsets) {
                *output_offset = *output_offset + OutputOffset::from_int(*input_offset);
                *input_offset = 0;
            }
        }

        (input_offsets, output_offsets)
    }
}
