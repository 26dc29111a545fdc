// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Lays out material tags byte by byte, for tests.
//!
//! The offsets here are written out by hand on purpose, so they don't share a mistake with the decoder's tables.

const PROLOGUE_SIZE: usize = 176;
const PAD: u8 = 0x5A;

pub(crate) enum SyntheticValue {
    Bitmap {
        scale: (f32, f32),
        offset: (f32, f32),
        modes: [u16; 6],
        file_path: String,
        default_file_path: String,
    },
    Real(f32),
    Int(i32),
    Boolean(u32),
    Color([f32; 4]),
    /// A type tag the decoder doesn't know, followed by a plausible body.
    Unknown(u32),
}

impl SyntheticValue {
    pub(crate) fn bitmap(file_path: &str) -> Self {
        SyntheticValue::Bitmap {
            scale: (2.0, 4.0),
            offset: (0.5, -0.5),
            modes: [6, 1, 2, 3, 8, 1],
            file_path: file_path.to_string(),
            default_file_path: "shaders\\default_bitmaps\\bitmaps\\gray_50_percent".to_string(),
        }
    }

    fn code(&self) -> u32 {
        match self {
            SyntheticValue::Bitmap { .. } => 0,
            SyntheticValue::Real(_) => 1,
            SyntheticValue::Int(_) => 2,
            SyntheticValue::Boolean(_) => 3,
            SyntheticValue::Color(_) => 4,
            SyntheticValue::Unknown(code) => *code,
        }
    }
}

fn pad(buffer: &mut Vec<u8>, count: usize) {
    buffer.extend(std::iter::repeat(PAD).take(count));
}

fn sized_string(buffer: &mut Vec<u8>, string: &str) {
    buffer.extend_from_slice(&(string.len() as u32).to_le_bytes());
    buffer.extend_from_slice(string.as_bytes());
}

pub(crate) fn encode_body(index: u32, value: &SyntheticValue) -> Vec<u8> {
    let mut buffer = vec![];
    buffer.extend_from_slice(&index.to_le_bytes());
    buffer.extend_from_slice(&value.code().to_le_bytes());

    match value {
        SyntheticValue::Bitmap {
            scale,
            offset,
            modes,
            ..
        } => {
            pad(&mut buffer, 40);
            for float in [scale.0, scale.1, offset.0, offset.1] {
                buffer.extend_from_slice(&float.to_le_bytes());
            }
            pad(&mut buffer, 6);
            for mode in modes {
                buffer.extend_from_slice(&mode.to_le_bytes());
            }
            pad(&mut buffer, 86);
        }
        SyntheticValue::Real(real) => {
            pad(&mut buffer, 40);
            buffer.extend_from_slice(&real.to_le_bytes());
            pad(&mut buffer, 116);
        }
        SyntheticValue::Int(int) => {
            pad(&mut buffer, 68);
            buffer.extend_from_slice(&int.to_le_bytes());
            pad(&mut buffer, 624);
        }
        SyntheticValue::Boolean(boolean) => {
            pad(&mut buffer, 56);
            buffer.extend_from_slice(&boolean.to_le_bytes());
            pad(&mut buffer, 100);
        }
        SyntheticValue::Color(argb) => {
            pad(&mut buffer, 24);
            for float in argb {
                buffer.extend_from_slice(&float.to_le_bytes());
            }
            pad(&mut buffer, 120);
        }
        SyntheticValue::Unknown(_) => pad(&mut buffer, 160),
    }

    buffer
}

pub(crate) fn encode_trailer(name: &str, value: &SyntheticValue, data: &[u8]) -> Vec<u8> {
    let mut buffer = vec![];
    pad(&mut buffer, 20);
    sized_string(&mut buffer, name);

    if let SyntheticValue::Bitmap {
        file_path,
        default_file_path,
        ..
    } = value
    {
        pad(&mut buffer, 8);
        sized_string(&mut buffer, file_path);
        pad(&mut buffer, 8);
        sized_string(&mut buffer, default_file_path);
    } else {
        pad(&mut buffer, 24);
    }

    pad(&mut buffer, 8);
    buffer.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buffer.extend_from_slice(data);
    pad(&mut buffer, 36);

    buffer
}

pub(crate) struct SyntheticParameter {
    pub name: String,
    pub value: SyntheticValue,
    pub data: Vec<u8>,
}

/// A whole material tag: prologue, twelve chunks, the shader header and parameters.
pub(crate) struct SyntheticMaterial {
    pub blend_mode: u8,
    pub shadow_policy: i32,
    pub shader_path: String,
    /// Payload sizes of the leading chunks. The last one has to be at least 8 bytes, small probes put the header inside it.
    pub chunk_sizes: [u32; 12],
    /// Which probe of the signature scan should hit the marker.
    pub probe: usize,
    pub parameters: Vec<SyntheticParameter>,
}

impl SyntheticMaterial {
    pub(crate) fn new(shader_path: &str) -> Self {
        Self {
            blend_mode: 3,
            shadow_policy: 2,
            shader_path: shader_path.to_string(),
            chunk_sizes: [8, 16, 40, 0, 12, 100, 8, 9, 10, 33, 8, 64],
            probe: 25,
            parameters: vec![],
        }
    }

    pub(crate) fn with_parameter(mut self, name: &str, value: SyntheticValue) -> Self {
        self.parameters.push(SyntheticParameter {
            name: name.to_string(),
            value,
            data: b"\x01\x02\x03".to_vec(),
        });
        self
    }

    /// One parameter of every kind.
    pub(crate) fn with_every_kind(self) -> Self {
        self.with_parameter("base_map", SyntheticValue::bitmap("0000levels\\ca_port\\bitmaps\\port_wall"))
            .with_parameter("roughness", SyntheticValue::Real(0.375))
            .with_parameter("layer_count", SyntheticValue::Int(3))
            .with_parameter("use_detail", SyntheticValue::Boolean(1))
            .with_parameter("tint", SyntheticValue::Color([1.0, 0.8, 0.6, 0.4]))
    }

    /// Where the signature scan starts, right after the last chunk.
    pub(crate) fn scan_start(&self) -> usize {
        PROLOGUE_SIZE
            + self
                .chunk_sizes
                .iter()
                .map(|size| 12 + *size as usize)
                .sum::<usize>()
    }

    pub(crate) fn header_offset(&self) -> usize {
        self.scan_start() + 4 * self.probe - 8
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; PROLOGUE_SIZE];

        for (index, size) in self.chunk_sizes.iter().enumerate() {
            buffer.extend_from_slice(b"chnk");
            buffer.extend_from_slice(&(index as u32).to_le_bytes());
            buffer.extend_from_slice(&size.to_le_bytes());
            buffer.extend(std::iter::repeat(0xCD).take(*size as usize));
        }

        // drift between the chunks and the header, or overlap with the last chunk for the first two probes
        buffer.resize(self.header_offset(), 0xEE);

        buffer.push(self.blend_mode);
        buffer.extend_from_slice(&[0; 3]);
        buffer.extend_from_slice(&self.shadow_policy.to_le_bytes());
        buffer.extend_from_slice(b"tsgt");
        buffer.extend_from_slice(&[0; 16]);
        sized_string(&mut buffer, &self.shader_path);
        buffer.extend_from_slice(&[0; 12]);
        buffer.extend_from_slice(&(self.parameters.len() as u32).to_le_bytes());
        buffer.extend_from_slice(&[0; 4]);

        for (index, parameter) in self.parameters.iter().enumerate() {
            buffer.extend(encode_body(index as u32, &parameter.value));
        }
        for parameter in &self.parameters {
            buffer.extend(encode_trailer(
                &parameter.name,
                &parameter.value,
                &parameter.data,
            ));
        }

        buffer
    }
}
