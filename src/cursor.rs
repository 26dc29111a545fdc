// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::{Cursor, ErrorKind};

use binrw::{BinRead, BinReaderExt, Endian};

use crate::common_file_operations::read_sized_string;
use crate::{ByteSpan, Error};

fn is_end_of_stream(err: &binrw::Error) -> bool {
    match err {
        binrw::Error::Io(io) => io.kind() == ErrorKind::UnexpectedEof,
        binrw::Error::Backtrace(backtrace) => is_end_of_stream(&backtrace.error),
        _ => false,
    }
}

/// Sequential little-endian reader over an in-memory tag.
///
/// Every read or skip that would leave the buffer fails with [`Error::TruncatedInput`], nothing is zero-filled.
pub struct TagCursor<'a> {
    inner: Cursor<ByteSpan<'a>>,
}

impl<'a> TagCursor<'a> {
    pub fn new(buffer: ByteSpan<'a>) -> Self {
        Self {
            inner: Cursor::new(buffer),
        }
    }

    /// Length of the whole buffer.
    pub fn len(&self) -> u64 {
        self.inner.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left between the current position and the end.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.tell())
    }

    /// The current offset.
    pub fn tell(&self) -> u64 {
        self.inner.position()
    }

    fn truncated(&self, offset: u64) -> Error {
        Error::TruncatedInput {
            offset,
            len: self.len(),
        }
    }

    /// Moves to an absolute offset. Seeking exactly to the end is allowed.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), Error> {
        if offset > self.len() {
            return Err(self.truncated(offset));
        }

        self.inner.set_position(offset);
        Ok(())
    }

    /// Relative seek, `count` may be negative to rewind.
    pub fn skip(&mut self, count: i64) -> Result<(), Error> {
        let target = self
            .tell()
            .checked_add_signed(count)
            .ok_or_else(|| self.truncated(self.tell()))?;

        self.seek_to(target)
    }

    /// Reads any binrw record that doesn't take arguments.
    pub fn read_record<T>(&mut self) -> Result<T, Error>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        let start = self.tell();
        let record = self.inner.read_le::<T>().map_err(|err| {
            // binrw leaves the position wherever it failed, so put it back
            self.inner.set_position(start);
            if is_end_of_stream(&err) {
                self.truncated(start)
            } else {
                Error::Malformed {
                    offset: start,
                    message: err.to_string(),
                }
            }
        })?;

        // trailing padding is a seek, which Cursor happily takes past the end
        if self.tell() > self.len() {
            self.inner.set_position(start);
            return Err(self.truncated(start));
        }

        Ok(record)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.read_record()
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.read_record()
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.read_record()
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.read_record()
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.read_record()
    }

    /// Borrows the next `count` bytes straight out of the buffer.
    pub fn read_bytes(&mut self, count: u64) -> Result<ByteSpan<'a>, Error> {
        let start = self.tell();
        if count > self.remaining() {
            return Err(self.truncated(start));
        }

        let buffer: ByteSpan<'a> = *self.inner.get_ref();
        let bytes = &buffer[start as usize..(start + count) as usize];
        self.inner.set_position(start + count);

        Ok(bytes)
    }

    /// Reads a u32 length followed by that many bytes of ASCII.
    pub fn read_sized_string(&mut self) -> Result<String, Error> {
        let start = self.tell();
        read_sized_string(&mut self.inner, Endian::Little, ()).map_err(|err| {
            self.inner.set_position(start);
            if is_end_of_stream(&err) {
                self.truncated(start)
            } else {
                Error::Malformed {
                    offset: start,
                    message: err.to_string(),
                }
            }
        })
    }
}
