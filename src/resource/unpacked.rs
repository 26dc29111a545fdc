// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use tracing::debug;

use crate::ByteBuffer;

use super::Resource;

/// Used to read tags from an unpacked tags directory, such as the one shipped with the editing kit.
pub struct UnpackedResource {
    base_directory: PathBuf,
}

impl UnpackedResource {
    pub fn from_existing(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    /// Turns a tag path into a path on disk. Tags use `\` regardless of platform.
    fn resolve(&self, path: &str) -> PathBuf {
        let mut new_path = self.base_directory.clone();
        for segment in path.split(['\\', '/']).filter(|segment| !segment.is_empty()) {
            new_path.push(segment);
        }
        new_path
    }
}

impl Resource for UnpackedResource {
    fn read(&mut self, path: &str) -> Option<ByteBuffer> {
        let new_path = self.resolve(path);
        debug!(file = %new_path.display(), "Reading tag");

        std::fs::read(new_path).ok()
    }

    fn exists(&mut self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}
