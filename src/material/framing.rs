// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::{debug, trace};

use crate::cursor::TagCursor;
use crate::Error;

use super::DecodeOptions;

/// Marker sitting 8 bytes into the shader header, "tsgt".
pub const SHADER_HEADER_SIGNATURE: [u8; 4] = *b"tsgt";

/// How far to step back from the end of the marker to land on the start of the header.
pub const SIGNATURE_REWIND: i64 = 12;

/// Bytes of opaque header in front of each chunk's size.
const CHUNK_HEADER_SIZE: i64 = 8;

/// Skips over the prologue and the leading chunks. Nothing in them is interpreted.
pub(crate) fn walk_chunks(cursor: &mut TagCursor, options: &DecodeOptions) -> Result<(), Error> {
    cursor.seek_to(options.prologue_size)?;

    for chunk in 0..options.chunk_count {
        cursor.skip(CHUNK_HEADER_SIZE)?;
        let size = cursor.read_u32()?;
        trace!(chunk, offset = cursor.tell(), size, "Skipping chunk");
        cursor.skip(i64::from(size))?;
    }

    Ok(())
}

/// Scans forward four bytes at a time for [`SHADER_HEADER_SIGNATURE`], and leaves the cursor at the start of the shader header.
///
/// Returns the offset of the header. Running out of probes (or out of data) means the marker isn't there.
pub(crate) fn find_signature(cursor: &mut TagCursor, max_probes: u32) -> Result<u64, Error> {
    let start = cursor.tell();

    for probe in 0..max_probes {
        let bytes = match cursor.read_bytes(SHADER_HEADER_SIGNATURE.len() as u64) {
            Ok(bytes) => bytes,
            Err(Error::TruncatedInput { .. }) => break,
            Err(err) => return Err(err),
        };

        if bytes == SHADER_HEADER_SIGNATURE {
            cursor.skip(-SIGNATURE_REWIND)?;
            debug!(
                probe,
                signature = cursor.tell() + 8,
                header = cursor.tell(),
                "Found shader header signature"
            );
            return Ok(cursor.tell());
        }
    }

    Err(Error::SignatureNotFound {
        start,
        probes: max_probes,
    })
}
