// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The specified path was not found in any resources.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path to the file that wasn't found.
        path: String,
    },
    /// A read or skip ran past the end of the buffer.
    #[error("truncated input: access at offset {offset:#x} runs outside the {len}-byte buffer")]
    TruncatedInput {
        /// Where the failing access started.
        offset: u64,
        /// Length of the buffer being read.
        len: u64,
    },
    /// The `tsgt` marker wasn't found within the probe budget.
    #[error("shader header signature not found within {probes} probes from {start:#x}")]
    SignatureNotFound {
        /// Offset the scan started at.
        start: u64,
        /// How many probes were allowed.
        probes: u32,
    },
    /// A parameter carried a type tag with no known layout.
    #[error("unknown parameter type {code} for parameter {index} at {offset:#x}")]
    UnknownParameterType {
        code: u32,
        index: usize,
        offset: u64,
    },
    /// The bitmap curve database doesn't exist.
    #[error("bitmap index not found: {path}")]
    MissingBitmapIndexFile { path: String },
    /// No curve is recorded for this bitmap.
    #[error("no curve recorded for {path}")]
    CurveLookupMiss { path: String },
    /// binrw failed for a reason other than running out of data.
    #[error("malformed record at {offset:#x}: {message}")]
    Malformed { offset: u64, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error ends decoding of the current document.
    ///
    /// Missing index files and curve misses have documented fallbacks, everything else doesn't.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::MissingBitmapIndexFile { .. } | Error::CurveLookupMiss { .. }
        )
    }
}
