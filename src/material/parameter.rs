// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(clippy::unnecessary_fallible_conversions)] // This wrongly trips on binrw code

use binrw::binread;
use tracing::trace;

use crate::codes::{ExternMode, FilterMode, SharpenMode, WrapMode};
use crate::common_file_operations::{read_bool_from, strip_path_prefix};
use crate::cursor::TagCursor;
use crate::Error;

/// The type tag stored in front of every parameter body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ParameterKind {
    Bitmap = 0,
    Real = 1,
    Int = 2,
    Boolean = 3,
    Color = 4,
}

/// Where the value sits inside a parameter body of one kind.
///
/// Bodies aren't self-describing, so every kind has a fixed stride: the 8 byte preamble, `lead` bytes of padding, the `payload`, then `trail` bytes of padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterLayout {
    pub kind: ParameterKind,
    pub lead: u32,
    pub payload: u32,
    pub trail: u32,
}

/// Index placeholder plus type tag.
pub const PARAMETER_PREAMBLE_SIZE: u32 = 8;

/// Body layouts, indexed by type tag.
///
/// Int's trailing padding is much larger than everyone else's even though its payload is the smallest.
/// It matches every file decoded so far, so leave it alone until a file proves otherwise.
pub const PARAMETER_LAYOUTS: [ParameterLayout; 5] = [
    ParameterLayout {
        kind: ParameterKind::Bitmap,
        lead: 40,
        payload: 34,
        trail: 86,
    },
    ParameterLayout {
        kind: ParameterKind::Real,
        lead: 40,
        payload: 4,
        trail: 116,
    },
    ParameterLayout {
        kind: ParameterKind::Int,
        lead: 68,
        payload: 4,
        trail: 624,
    },
    ParameterLayout {
        kind: ParameterKind::Boolean,
        lead: 56,
        payload: 4,
        trail: 100,
    },
    ParameterLayout {
        kind: ParameterKind::Color,
        lead: 24,
        payload: 16,
        trail: 120,
    },
];

impl ParameterLayout {
    /// Looks up the layout for a raw type tag.
    pub fn for_code(code: u32) -> Option<&'static ParameterLayout> {
        PARAMETER_LAYOUTS.get(code as usize)
    }

    /// Total size of a body of this kind, preamble included.
    pub const fn stride(&self) -> u64 {
        (PARAMETER_PREAMBLE_SIZE + self.lead + self.payload + self.trail) as u64
    }
}

/// A texture reference, with the sampler settings used for it.
#[binread]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitmapParameter {
    pub scale: (f32, f32),
    pub offset: (f32, f32),

    #[br(pad_before = 6)]
    pub filter_mode: FilterMode,
    pub wrap_mode: WrapMode,
    pub wrap_mode_u: WrapMode,
    pub wrap_mode_v: WrapMode,
    pub sharpen_mode: SharpenMode,
    pub extern_mode: ExternMode,

    /// Tag path of the bitmap, without the four character prefix it's stored with.
    #[br(ignore)]
    pub file_path: String,
    #[br(ignore)]
    pub default_file_path: String,
}

/// A color in the order it's stored on disk.
#[binread]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Argb {
    pub a: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Argb {
    /// Reorders into red, green, blue, alpha.
    pub fn to_rgba(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterValue {
    Bitmap(BitmapParameter),
    Real(f32),
    Int(i32),
    Boolean(bool),
    Color(Argb),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Bitmap(_) => ParameterKind::Bitmap,
            ParameterValue::Real(_) => ParameterKind::Real,
            ParameterValue::Int(_) => ParameterKind::Int,
            ParameterValue::Boolean(_) => ParameterKind::Boolean,
            ParameterValue::Color(_) => ParameterKind::Color,
        }
    }
}

/// One named, typed shader parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    /// Position in the file, which is also how names are matched up to bodies.
    pub index: usize,
    /// Where the body started, only useful for debugging.
    pub offset: u64,
    /// Empty until the name pass runs.
    pub name: String,
    pub value: ParameterValue,
}

impl Parameter {
    pub fn kind(&self) -> ParameterKind {
        self.value.kind()
    }
}

/// Reads one fixed-stride parameter body. The name is left empty.
pub(crate) fn read_parameter_body(
    cursor: &mut TagCursor,
    index: usize,
) -> Result<Parameter, Error> {
    let offset = cursor.tell();

    cursor.skip(4)?; // index placeholder
    let code = cursor.read_u32()?;
    let layout = ParameterLayout::for_code(code).ok_or(Error::UnknownParameterType {
        code,
        index,
        offset,
    })?;

    cursor.skip(i64::from(layout.lead))?;
    let value = match layout.kind {
        ParameterKind::Bitmap => ParameterValue::Bitmap(cursor.read_record()?),
        ParameterKind::Real => ParameterValue::Real(cursor.read_f32()?),
        ParameterKind::Int => ParameterValue::Int(cursor.read_i32()?),
        ParameterKind::Boolean => ParameterValue::Boolean(read_bool_from(cursor.read_u32()?)),
        ParameterKind::Color => ParameterValue::Color(cursor.read_record()?),
    };
    cursor.skip(i64::from(layout.trail))?;

    debug_assert_eq!(cursor.tell(), offset + layout.stride());
    trace!(index, offset, kind = ?layout.kind, "Read parameter body");

    Ok(Parameter {
        index,
        offset,
        name: String::new(),
        value,
    })
}

/// Padding in front of every parameter's name.
const NAME_LEAD: i64 = 20;
/// Padding in front of each of a bitmap's two paths.
const PATH_LEAD: i64 = 8;
/// What non-bitmap parameters have instead of the two paths.
const PATHLESS_GAP: i64 = 24;
/// Padding in front of the trailing data block's length.
const DATA_LEAD: i64 = 8;
/// Padding after the trailing data block.
const TRAILER_TAIL: i64 = 36;

/// Second pass over the parameters, filling in names and bitmap paths.
///
/// The trailers are stored after all of the bodies, in the same order, so this must run once every body has been read.
pub(crate) fn resolve_parameter_names(
    cursor: &mut TagCursor,
    parameters: &mut [Parameter],
) -> Result<(), Error> {
    for parameter in parameters.iter_mut() {
        cursor.skip(NAME_LEAD)?;
        parameter.name = cursor.read_sized_string()?;

        match &mut parameter.value {
            ParameterValue::Bitmap(bitmap) => {
                cursor.skip(PATH_LEAD)?;
                bitmap.file_path = strip_path_prefix(&cursor.read_sized_string()?);
                cursor.skip(PATH_LEAD)?;
                bitmap.default_file_path = cursor.read_sized_string()?;
            }
            _ => cursor.skip(PATHLESS_GAP)?,
        }

        // every kind has this block, nobody knows what's in it
        cursor.skip(DATA_LEAD)?;
        let data_length = cursor.read_u32()?;
        cursor.skip(i64::from(data_length))?;
        cursor.skip(TRAILER_TAIL)?;

        trace!(index = parameter.index, name = %parameter.name, "Resolved parameter name");
    }

    Ok(())
}
