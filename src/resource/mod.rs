// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

mod unpacked;
pub use unpacked::UnpackedResource;

use crate::{ByteBuffer, Error, ReadableFile};

/// Represents a source of tag files for reading.
///
/// This abstracts away where the bytes come from, usually a tags directory on disk. Every tag is read fully into memory before it's parsed.
pub trait Resource {
    /// Reads the file located at `path`. This is returned as an in-memory buffer, and will usually
    /// have to be further parsed.
    ///
    /// # Example
    ///
    /// ```should_panic
    /// # use halomat::resource::{Resource, UnpackedResource};
    /// let mut tags = UnpackedResource::from_existing("H4EK/tags");
    /// let data = tags.read("levels\\dlc\\materials\\ca_port\\ca_port_emissive_lights.material").unwrap();
    /// ```
    fn read(&mut self, path: &str) -> Option<ByteBuffer>;

    /// Checks if a file exists.
    ///
    /// While you could abuse `read` to do this, in some Resources they can optimize this since it doesn't read data.
    fn exists(&mut self, path: &str) -> bool;

    /// Reads and parses the file located at `path`. This avoids having to call both `read` and `from_existing`.
    fn parsed<F: ReadableFile>(&mut self, path: &str) -> Result<F, Error>
    where
        Self: Sized,
    {
        let buffer = self.read(path).ok_or_else(|| Error::FileNotFound {
            path: path.to_string(),
        })?;

        F::from_existing(&buffer)
    }
}
