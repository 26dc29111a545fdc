// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::debug;

use crate::codes::{BlendMode, ShadowPolicy};
use crate::common_file_operations::last_path_segment;
use crate::cursor::TagCursor;
use crate::{ByteSpan, Error, ReadableFile};

mod framing;
pub use framing::{SHADER_HEADER_SIGNATURE, SIGNATURE_REWIND};

mod header;
use header::ShaderHeader;

mod intent;
pub use intent::{blend_intent, shadow_intent, DerivedFields};

mod parameter;
pub use parameter::{
    Argb, BitmapParameter, Parameter, ParameterKind, ParameterLayout, ParameterValue,
    PARAMETER_LAYOUTS, PARAMETER_PREAMBLE_SIZE,
};

#[cfg(test)]
pub(crate) mod synthetic;

/// Framing constants used to find the shader block. These were worked out from existing tags, not from any documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    /// Bytes skipped before the first chunk.
    pub prologue_size: u64,
    /// How many chunks to skip before scanning for the signature.
    pub chunk_count: u32,
    /// How many 4-byte probes the signature scan gets.
    pub max_probes: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            prologue_size: 176,
            chunk_count: 12,
            max_probes: 100,
        }
    }
}

/// A material tag, usually with the `.material` file extension.
///
/// Contains the shader it's built on, how it blends, and the shader's parameters in file order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialTag {
    /// Where the shader header was found.
    pub header_offset: u64,
    pub blend_mode: BlendMode,
    pub shadow_policy: ShadowPolicy,
    /// The shader's tag path, as stored.
    pub shader_path: String,
    /// The last segment of `shader_path`, e.g. `srf_forerunner`.
    pub shader_name: String,
    pub parameters: Vec<Parameter>,
    pub derived: DerivedFields,
}

impl MaterialTag {
    /// Decodes a material tag using explicit framing options.
    pub fn from_existing_with(
        buffer: ByteSpan,
        options: &DecodeOptions,
    ) -> Result<MaterialTag, Error> {
        let mut cursor = TagCursor::new(buffer);
        let (header_offset, header) = read_header(&mut cursor, options)?;

        let mut parameters = Vec::new();
        for index in 0..header.parameter_count as usize {
            parameters.push(parameter::read_parameter_body(&mut cursor, index)?);
        }
        parameter::resolve_parameter_names(&mut cursor, &mut parameters)?;

        debug!(
            end = cursor.tell(),
            len = cursor.len(),
            "Finished reading parameters"
        );

        Ok(MaterialTag {
            header_offset,
            blend_mode: header.blend_mode,
            shadow_policy: header.shadow_policy,
            shader_name: last_path_segment(&header.shader_path).to_string(),
            shader_path: header.shader_path,
            parameters,
            derived: DerivedFields::compute(header.blend_mode, header.shadow_policy),
        })
    }

    /// Reads just enough of the tag to return the shader's path, skipping the parameters entirely.
    pub fn peek_shader_path(buffer: ByteSpan, options: &DecodeOptions) -> Result<String, Error> {
        let mut cursor = TagCursor::new(buffer);
        let (_, header) = read_header(&mut cursor, options)?;

        Ok(header.shader_path)
    }

    /// Returns the first parameter called `name`.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    /// Iterates over just the bitmap parameters, along with their names.
    pub fn bitmaps(&self) -> impl Iterator<Item = (&str, &BitmapParameter)> {
        self.parameters
            .iter()
            .filter_map(|parameter| match &parameter.value {
                ParameterValue::Bitmap(bitmap) => Some((parameter.name.as_str(), bitmap)),
                _ => None,
            })
    }
}

impl ReadableFile for MaterialTag {
    fn from_existing(buffer: ByteSpan) -> Result<Self, Error> {
        MaterialTag::from_existing_with(buffer, &DecodeOptions::default())
    }
}

fn read_header(
    cursor: &mut TagCursor,
    options: &DecodeOptions,
) -> Result<(u64, ShaderHeader), Error> {
    framing::walk_chunks(cursor, options)?;
    let header_offset = framing::find_signature(cursor, options.max_probes)?;
    let header: ShaderHeader = cursor.read_record()?;

    debug!(
        header_offset,
        blend_mode = %header.blend_mode,
        shadow_policy = %header.shadow_policy,
        shader = %header.shader_path,
        parameter_count = header.parameter_count,
        "Read shader header"
    );

    Ok((header_offset, header))
}
