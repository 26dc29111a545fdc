// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use binrw::binread;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::codes::{BitmapCurve, DEFAULT_CURVE_GAMMA};
use crate::common_file_operations::read_string_until_null;
use crate::cursor::TagCursor;
use crate::{ByteBuffer, ByteSpan, Error, ReadableFile};

/// Extension every key in the database carries.
pub const BITMAP_EXTENSION: &str = ".bitmap";

/// A bitmap tag's curve id lives this many bytes before the end of the file.
pub const CURVE_OFFSET_FROM_END: u64 = 123;

#[binread]
#[derive(Debug)]
struct BitmapRecord {
    #[br(parse_with = read_string_until_null)]
    path: String,
    curve: BitmapCurve,
}

/// One bitmap and the curve it was authored with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitmapIndexEntry {
    /// Tag path of the bitmap, including the `.bitmap` extension.
    pub path: String,
    pub curve: BitmapCurve,
    /// Gamma for `curve`.
    pub curve_value: f32,
}

impl BitmapIndexEntry {
    pub fn new(path: String, curve: BitmapCurve) -> Self {
        Self {
            path,
            curve,
            curve_value: curve.gamma(),
        }
    }
}

/// The bitmap database, usually called `bitmap.db`.
///
/// Maps bitmap tag paths to the gamma curve they were authored with. There's no header or count, just `{path}\0{curve id}` records until the end of the file.
#[derive(Debug, Default, Clone)]
pub struct BitmapIndex {
    entries: Vec<BitmapIndexEntry>,
    by_path: HashMap<String, usize>,
}

impl BitmapIndex {
    /// Builds an index out of existing entries. Later entries win if a path shows up twice.
    pub fn from_entries(entries: impl IntoIterator<Item = BitmapIndexEntry>) -> Self {
        let mut index = BitmapIndex::default();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    fn insert(&mut self, entry: BitmapIndexEntry) {
        self.by_path.insert(entry.path.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Reads the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<BitmapIndex, Error> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(buffer) => BitmapIndex::from_existing(&buffer),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::MissingBitmapIndexFile {
                path: path.display().to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Reads the database at `path`, or returns an empty index if it can't be read.
    pub fn from_file(path: impl AsRef<Path>) -> BitmapIndex {
        BitmapIndex::open(path).unwrap_or_else(|err| {
            warn!(%err, "Using an empty bitmap index");
            BitmapIndex::default()
        })
    }

    /// Builds an index by visiting every bitmap tag under `tags_directory`.
    ///
    /// Keys are relative to `tags_directory` and use `\` as the separator, the same way material tags refer to bitmaps.
    pub fn from_install(tags_directory: impl AsRef<Path>) -> Result<BitmapIndex, Error> {
        let tags_directory = tags_directory.as_ref();
        if !tags_directory.is_dir() {
            return Err(Error::FileNotFound {
                path: tags_directory.display().to_string(),
            });
        }

        let mut index = BitmapIndex::default();

        for entry in WalkDir::new(tags_directory).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "Skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file()
                || !entry.file_name().to_string_lossy().ends_with(BITMAP_EXTENSION)
            {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(tags_directory) else {
                continue;
            };
            let components: Vec<String> = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect();
            let path = components.join("\\");
            if !path.is_ascii() {
                warn!(path = %entry.path().display(), "Skipping bitmap with a non-ASCII path");
                continue;
            }

            match read_curve_id(entry.path()) {
                Ok(Some(curve)) => index.insert(BitmapIndexEntry::new(path, curve)),
                Ok(None) => {
                    warn!(path = %entry.path().display(), "Skipping bitmap, file too small");
                }
                Err(err) => {
                    warn!(path = %entry.path().display(), %err, "Failed to read bitmap");
                }
            }
        }

        debug!(
            directory = %tags_directory.display(),
            entries = index.len(),
            "Built bitmap index"
        );

        Ok(index)
    }

    /// Writes the index back out in the database format.
    pub fn write_to_buffer(&self) -> Option<ByteBuffer> {
        let mut buffer = ByteBuffer::new();

        for entry in &self.entries {
            // a nul inside the path would split the record in two
            if entry.path.is_empty() || entry.path.contains('\0') || !entry.path.is_ascii() {
                return None;
            }

            buffer.extend_from_slice(entry.path.as_bytes());
            buffer.push(0);
            buffer.push(entry.curve.0);
        }

        Some(buffer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, in file order.
    pub fn entries(&self) -> &[BitmapIndexEntry] {
        &self.entries
    }

    /// Every bitmap path, in file order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }

    /// Looks up an entry by its full key, extension included.
    pub fn get(&self, key: &str) -> Option<&BitmapIndexEntry> {
        self.by_path.get(key).map(|&index| &self.entries[index])
    }

    /// Returns the gamma for a bitmap referenced without its extension, like a material's `file_path`.
    pub fn curve(&self, path: &str) -> Option<f32> {
        self.get(&format!("{path}{BITMAP_EXTENSION}"))
            .map(|entry| entry.curve_value)
    }

    /// Same as [`BitmapIndex::curve`], but reports a miss as [`Error::CurveLookupMiss`].
    pub fn try_lookup(&self, path: &str) -> Result<f32, Error> {
        self.curve(path).ok_or_else(|| Error::CurveLookupMiss {
            path: path.to_string(),
        })
    }

    /// Returns the gamma for a bitmap, falling back to 1.0 if it isn't in the index.
    pub fn lookup(&self, path: &str) -> f32 {
        self.try_lookup(path).unwrap_or_else(|err| {
            info!(%err, "Falling back to default curve");
            DEFAULT_CURVE_GAMMA
        })
    }
}

impl ReadableFile for BitmapIndex {
    fn from_existing(buffer: ByteSpan) -> Result<Self, Error> {
        let mut cursor = TagCursor::new(buffer);
        let mut index = BitmapIndex::default();

        while cursor.remaining() > 0 {
            let record: BitmapRecord = match cursor.read_record() {
                Ok(record) => record,
                Err(Error::TruncatedInput { offset, .. }) => {
                    warn!(offset, "Bitmap index ends in the middle of a record");
                    break;
                }
                Err(err) => return Err(err),
            };

            // an empty path marks the end of the data
            if record.path.is_empty() {
                break;
            }

            index.insert(BitmapIndexEntry::new(record.path, record.curve));
        }

        Ok(index)
    }
}

/// Reads the curve id out of a bitmap tag on disk, or `None` if the file is too small to have one.
fn read_curve_id(path: &Path) -> Result<Option<BitmapCurve>, Error> {
    let mut file = File::open(path)?;
    let size = file.seek(SeekFrom::End(0))?;
    if size < CURVE_OFFSET_FROM_END {
        return Ok(None);
    }

    file.seek(SeekFrom::Start(size - CURVE_OFFSET_FROM_END))?;
    let mut curve = [0u8; 1];
    file.read_exact(&mut curve)?;

    Ok(Some(BitmapCurve(curve[0])))
}
