// SPDX-FileCopyrightText: 2023 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

/// Represents a continuous block of memory which is not owned, and comes either from an in-memory location or from a file.
pub type ByteSpan<'a> = &'a [u8];

/// Represents a continuous block of memory which is owned.
pub type ByteBuffer = Vec<u8>;

#[macro_use]
mod macros;

mod error;
pub use error::Error;

/// Small integer codes stored in tags, and their labels.
pub mod codes;

/// Little-endian reader used by every tag parser.
pub mod cursor;

/// Reading material tags (`.material`).
pub mod material;

/// Reading and writing the bitmap curve database (`bitmap.db`).
pub mod bitmapdb;

/// Where tag files are read from.
pub mod resource;

/// Decoding many tags at once, and counting the shaders they use.
pub mod batch;

mod common_file_operations;

/// Implemented by every file format that can be parsed out of a buffer.
pub trait ReadableFile: Sized {
    /// Parses an existing file from `buffer`.
    fn from_existing(buffer: ByteSpan) -> Result<Self, Error>;
}

/// Feeds deterministic garbage to `T`, which has to fail (or succeed) without panicking.
#[cfg(test)]
pub(crate) fn pass_random_invalid<T: ReadableFile>() {
    let mut state = 0x2545F491u32;
    let mut garbage = ByteBuffer::with_capacity(4096);
    for _ in 0..4096 {
        // xorshift
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        garbage.push(state as u8);
    }

    for len in [0, 1, 4, 176, 512, 4096] {
        let _ = T::from_existing(&garbage[..len]);
    }
}
