// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(clippy::unnecessary_fallible_conversions)] // This wrongly trips on binrw code

use binrw::binread;

use crate::codes::{BlendMode, ShadowPolicy};
use crate::common_file_operations::read_sized_string;

/// The fixed part of the shader block, found by the signature scan.
///
/// `parameter_count` isn't validated here, a bogus count runs into the end of the buffer soon enough.
#[binread]
#[derive(Debug)]
pub(crate) struct ShaderHeader {
    #[br(pad_after = 3)]
    pub blend_mode: BlendMode,

    // the signature lives in this padding
    #[br(pad_after = 20)]
    pub shadow_policy: ShadowPolicy,

    #[br(parse_with = read_sized_string)]
    #[br(pad_after = 12)]
    pub shader_path: String,

    #[br(pad_after = 4)]
    pub parameter_count: u32,
}
