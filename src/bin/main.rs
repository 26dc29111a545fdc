// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use halomat::batch::ShaderCensus;
use halomat::bitmapdb::BitmapIndex;
use halomat::material::{DecodeOptions, MaterialTag, ParameterValue};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "halomat", about = "Inspect material tags and the bitmap curve database.")]
struct Args {
    /// Bytes to skip before the first chunk
    #[arg(long, global = true, default_value_t = DecodeOptions::default().prologue_size)]
    prologue_size: u64,

    /// Chunks to skip before scanning for the shader header
    #[arg(long, global = true, default_value_t = DecodeOptions::default().chunk_count)]
    chunk_count: u32,

    /// How many 4 byte probes the shader header scan gets
    #[arg(long, global = true, default_value_t = DecodeOptions::default().max_probes)]
    max_probes: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a single material and print its header and parameters
    Inspect {
        material: PathBuf,

        /// Bitmap database used to show each bitmap's curve
        #[arg(long, value_name = "PATH")]
        bitmap_db: Option<PathBuf>,
    },
    /// Count the shaders used by every material under a tags directory
    Census {
        tags_directory: PathBuf,

        /// File with one already finished shader name per line
        #[arg(long, value_name = "PATH")]
        finished: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Build a bitmap database from the bitmap tags under a tags directory
    Index {
        tags_directory: PathBuf,

        #[arg(long, value_name = "PATH", default_value = "bitmap.db")]
        output: PathBuf,
    },
    /// Look up the curve of one bitmap, referenced without its extension
    Curve { bitmap_db: PathBuf, path: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("halomat=info".parse()?))
        .init();

    let args = Args::parse();
    let options = DecodeOptions {
        prologue_size: args.prologue_size,
        chunk_count: args.chunk_count,
        max_probes: args.max_probes,
    };

    match args.command {
        Command::Inspect {
            material,
            bitmap_db,
        } => inspect(&material, bitmap_db.as_deref(), &options),
        Command::Census {
            tags_directory,
            finished,
            output,
        } => census(&tags_directory, finished.as_deref(), output.as_deref(), &options),
        Command::Index {
            tags_directory,
            output,
        } => index(&tags_directory, &output),
        Command::Curve { bitmap_db, path } => {
            let index = BitmapIndex::open(&bitmap_db)?;
            println!("{}", index.lookup(&path));
            Ok(())
        }
    }
}

fn inspect(material: &Path, bitmap_db: Option<&Path>, options: &DecodeOptions) -> Result<()> {
    let buffer =
        std::fs::read(material).with_context(|| format!("reading {}", material.display()))?;
    let tag = MaterialTag::from_existing_with(&buffer, options)
        .with_context(|| format!("decoding {}", material.display()))?;
    let curves = bitmap_db.map(BitmapIndex::from_file);

    println!("shader:        {} ({})", tag.shader_name, tag.shader_path);
    println!("header offset: {:#x}", tag.header_offset);
    println!(
        "blend mode:    {} ({}), intent {}",
        tag.blend_mode, tag.blend_mode.0, tag.derived.blend_intent
    );
    println!(
        "shadows:       {} ({}), intent {}",
        tag.shadow_policy, tag.shadow_policy.0, tag.derived.shadow_intent
    );
    println!("parameters:    {}", tag.parameters.len());

    for parameter in &tag.parameters {
        let mut line = format!("  [{}] {:32} ", parameter.index, parameter.name);
        match &parameter.value {
            ParameterValue::Bitmap(bitmap) => {
                let _ = write!(
                    line,
                    "bitmap {} scale {:?} offset {:?} filter {} wrap {}/{}/{} sharpen {} extern {}",
                    bitmap.file_path,
                    bitmap.scale,
                    bitmap.offset,
                    bitmap.filter_mode,
                    bitmap.wrap_mode,
                    bitmap.wrap_mode_u,
                    bitmap.wrap_mode_v,
                    bitmap.sharpen_mode,
                    bitmap.extern_mode,
                );
                if let Some(curves) = &curves {
                    let _ = write!(line, " curve {}", curves.lookup(&bitmap.file_path));
                }
            }
            ParameterValue::Real(value) => {
                let _ = write!(line, "real {value}");
            }
            ParameterValue::Int(value) => {
                let _ = write!(line, "int {value}");
            }
            ParameterValue::Boolean(value) => {
                let _ = write!(line, "bool {value}");
            }
            ParameterValue::Color(argb) => {
                let _ = write!(line, "color rgba {:?}", argb.to_rgba());
            }
        }
        println!("{line}");
    }

    Ok(())
}

fn census(
    tags_directory: &Path,
    finished: Option<&Path>,
    output: Option<&Path>,
    options: &DecodeOptions,
) -> Result<()> {
    let finished: HashSet<String> = match finished {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        None => HashSet::new(),
    };

    let census = ShaderCensus::new().scan(tags_directory, &finished, options)?;
    let report = census.report();

    match output {
        Some(path) => {
            std::fs::write(path, report).with_context(|| format!("writing {}", path.display()))?
        }
        None => print!("{report}"),
    }

    if !census.failures().is_empty() {
        tracing::warn!(
            failures = census.failures().len(),
            "Some materials could not be read"
        );
    }

    Ok(())
}

fn index(tags_directory: &Path, output: &Path) -> Result<()> {
    let index = BitmapIndex::from_install(tags_directory)?;
    let buffer = index
        .write_to_buffer()
        .context("bitmap paths can't be written to the database")?;
    std::fs::write(output, buffer).with_context(|| format!("writing {}", output.display()))?;

    tracing::info!(entries = index.len(), output = %output.display(), "Wrote bitmap index");

    Ok(())
}
