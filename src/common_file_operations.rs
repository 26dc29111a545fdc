// SPDX-FileCopyrightText: 2024 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::{ErrorKind, Read};

use binrw::{BinRead, BinReaderExt, BinResult};

/// Separators the engine (and our own tools) use in tag paths.
pub(crate) const PATH_SEPARATORS: [char; 2] = ['\\', '/'];

pub(crate) fn read_bool_from<T: std::convert::From<u8> + std::cmp::PartialEq>(x: T) -> bool {
    x != T::from(0u8)
}

/// Decodes ASCII text, replacing anything outside of it instead of failing.
pub(crate) fn decode_ascii_lossy(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| {
            if byte.is_ascii() {
                byte as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect::<String>()
        .trim_end_matches(char::from(0)) // trim \0 from the end of strings
        .to_string()
}

/// Returns everything after the last path separator, e.g. `shaders\material_shaders\srf` becomes `srf`.
pub(crate) fn last_path_segment(path: &str) -> &str {
    path.rsplit(PATH_SEPARATORS).next().unwrap_or(path)
}

/// Drops the first four characters of a bitmap reference. Short strings are left alone.
pub(crate) fn strip_path_prefix(path: &str) -> String {
    if path.chars().count() > 4 {
        path.chars().skip(4).collect()
    } else {
        path.to_string()
    }
}

/// Reads a string prefixed by its length as a u32.
#[binrw::parser(reader, endian)]
pub(crate) fn read_sized_string() -> BinResult<String> {
    let length = u32::read_options(reader, endian, ())?;

    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(u64::from(length))
        .read_to_end(&mut bytes)?;

    if bytes.len() != length as usize {
        return Err(binrw::Error::Io(ErrorKind::UnexpectedEof.into()));
    }

    Ok(decode_ascii_lossy(&bytes))
}

#[binrw::parser(reader)]
pub(crate) fn read_string_until_null() -> BinResult<String> {
    let mut bytes = Vec::new();

    let mut next_char = reader.read_le::<u8>()?;
    while next_char != 0 {
        bytes.push(next_char);
        next_char = reader.read_le::<u8>()?;
    }

    Ok(decode_ascii_lossy(&bytes))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use binrw::Endian;

    use super::*;

    #[test]
    fn read_bool_u32() {
        assert!(!read_bool_from::<u32>(0));
        assert!(read_bool_from::<u32>(1));
        // anything nonzero counts
        assert!(read_bool_from::<u32>(0x100));
    }

    #[test]
    fn lossy_ascii() {
        assert_eq!(decode_ascii_lossy(b"FOO"), "FOO");
        assert_eq!(decode_ascii_lossy(b"FOO\0\0"), "FOO");
        assert_eq!(decode_ascii_lossy(b"F\xffO"), "F\u{FFFD}O");
    }

    #[test]
    fn path_segments() {
        assert_eq!(
            last_path_segment("shaders\\material_shaders\\srf_forerunner"),
            "srf_forerunner"
        );
        assert_eq!(last_path_segment("a/b\\c"), "c");
        assert_eq!(last_path_segment("plain"), "plain");
        assert_eq!(last_path_segment(""), "");
    }

    #[test]
    fn prefix_stripping() {
        assert_eq!(strip_path_prefix("0000levels\\foo"), "levels\\foo");
        assert_eq!(strip_path_prefix("abcd"), "abcd");
        assert_eq!(strip_path_prefix("abc"), "abc");
        assert_eq!(strip_path_prefix(""), "");
    }

    #[test]
    fn sized_string() {
        let data = [3u8, 0, 0, 0, b'F', b'O', b'O', 0xAA];
        let mut cursor = Cursor::new(&data[..]);
        let string = read_sized_string(&mut cursor, Endian::Little, ()).unwrap();
        assert_eq!(string, "FOO");
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn sized_string_truncated() {
        let data = [16u8, 0, 0, 0, b'F', b'O'];
        let mut cursor = Cursor::new(&data[..]);
        assert!(read_sized_string(&mut cursor, Endian::Little, ()).is_err());
    }

    #[test]
    fn string_until_null() {
        let data = b"foo/bar.bitmap\0\x02";
        let mut cursor = Cursor::new(&data[..]);
        let string = read_string_until_null(&mut cursor, Endian::Little, ()).unwrap();
        assert_eq!(string, "foo/bar.bitmap");
        assert_eq!(cursor.position(), 15);
    }
}
