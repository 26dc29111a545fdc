// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::common_file_operations::last_path_segment;
use crate::material::{DecodeOptions, MaterialTag};
use crate::resource::Resource;
use crate::Error;

/// Extension of material tags on disk.
pub const MATERIAL_EXTENSION: &str = ".material";

/// The result of decoding one tag in a batch.
#[derive(Debug)]
pub struct TagOutcome {
    /// The tag name as requested, without extension.
    pub name: String,
    pub result: Result<MaterialTag, Error>,
}

/// Decodes every named material tag from `resource`.
///
/// A tag that fails to read or decode doesn't stop the rest, its error is kept in its outcome. Names that show up more than once are only decoded the first time.
pub fn decode_tags<R, I, S>(resource: &mut R, tag_names: I, options: &DecodeOptions) -> Vec<TagOutcome>
where
    R: Resource,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut outcomes = Vec::new();

    for name in tag_names {
        let name = name.as_ref();
        if !seen.insert(name.to_string()) {
            continue;
        }

        let path = format!("{name}{MATERIAL_EXTENSION}");
        let result = resource
            .read(&path)
            .ok_or_else(|| Error::FileNotFound { path: path.clone() })
            .and_then(|buffer| MaterialTag::from_existing_with(&buffer, options));

        match &result {
            Ok(tag) => info!(tag = name, shader = %tag.shader_name, "Decoded material"),
            Err(err) => warn!(tag = name, %err, "Failed to decode material"),
        }

        outcomes.push(TagOutcome {
            name: name.to_string(),
            result,
        });
    }

    outcomes
}

/// Counts which shaders are used by the materials in a tags directory.
///
/// Shaders the caller has already handled can be excluded, so what's left is a to-do list ordered by how often each shader is used.
#[derive(Debug, Default)]
pub struct ShaderCensus {
    counts: HashMap<String, usize>,
    excluded: usize,
    failures: Vec<(PathBuf, Error)>,
}

impl ShaderCensus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one use of `shader_path`, unless its name is in `finished`. Returns whether it was counted.
    pub fn record(&mut self, shader_path: &str, finished: &HashSet<String>) -> bool {
        let name = last_path_segment(shader_path);
        if finished.contains(name) {
            self.excluded += 1;
            debug!(shader = name, "Skipping finished shader");
            return false;
        }

        *self.counts.entry(name.to_string()).or_default() += 1;
        true
    }

    /// Remembers a material that couldn't be read.
    pub fn record_failure(&mut self, path: PathBuf, err: Error) {
        warn!(path = %path.display(), %err, "Failed to read shader from material");
        self.failures.push((path, err));
    }

    /// Visits every material under `tags_directory` and adds its shader to the census.
    pub fn scan(
        mut self,
        tags_directory: impl AsRef<Path>,
        finished: &HashSet<String>,
        options: &DecodeOptions,
    ) -> Result<ShaderCensus, Error> {
        let tags_directory = tags_directory.as_ref();
        if !tags_directory.is_dir() {
            return Err(Error::FileNotFound {
                path: tags_directory.display().to_string(),
            });
        }

        for entry in WalkDir::new(tags_directory).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let is_material = entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .ends_with(MATERIAL_EXTENSION);
            if !entry.file_type().is_file() || !is_material {
                continue;
            }

            let result = std::fs::read(entry.path())
                .map_err(Error::from)
                .and_then(|buffer| MaterialTag::peek_shader_path(&buffer, options));

            match result {
                Ok(shader_path) => {
                    self.record(&shader_path, finished);
                }
                Err(err) => self.record_failure(entry.path().to_path_buf(), err),
            }
        }

        info!(
            shaders = self.counts.len(),
            excluded = self.excluded,
            failures = self.failures.len(),
            "Finished shader census"
        );

        Ok(self)
    }

    /// How many materials use the shader called `name`.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or_default()
    }

    /// How many materials were skipped because their shader was already finished.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn failures(&self) -> &[(PathBuf, Error)] {
        &self.failures
    }

    /// Shader names with their counts, most used first. Ties are ordered by name.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// Renders the census as one `name count` line per shader.
    pub fn report(&self) -> String {
        let mut report = String::new();
        for (name, count) in self.sorted() {
            // writing into a String can't fail
            let _ = writeln!(report, "{name:50} {count}");
        }
        report
    }
}
