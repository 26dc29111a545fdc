// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use halomat::batch::{decode_tags, ShaderCensus};
use halomat::bitmapdb::{BitmapIndex, CURVE_OFFSET_FROM_END};
use halomat::codes::{BitmapCurve, BlendMode};
use halomat::material::{DecodeOptions, MaterialTag};
use halomat::resource::{Resource, UnpackedResource};
use halomat::{Error, ReadableFile};

/// A material with no parameters, laid out like the editing kit writes them.
fn simple_material(blend_mode: u8, shader_path: &str) -> Vec<u8> {
    let mut buffer = vec![0u8; 176];
    for chunk in 0..12u32 {
        buffer.extend_from_slice(b"chnk");
        buffer.extend_from_slice(&chunk.to_le_bytes());
        buffer.extend_from_slice(&0u32.to_le_bytes());
    }

    buffer.push(blend_mode);
    buffer.extend_from_slice(&[0; 3]);
    buffer.extend_from_slice(&2i32.to_le_bytes());
    buffer.extend_from_slice(b"tsgt");
    buffer.extend_from_slice(&[0; 16]);
    buffer.extend_from_slice(&(shader_path.len() as u32).to_le_bytes());
    buffer.extend_from_slice(shader_path.as_bytes());
    buffer.extend_from_slice(&[0; 12]);
    buffer.extend_from_slice(&0u32.to_le_bytes());
    buffer.extend_from_slice(&[0; 4]);
    buffer
}

fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A bitmap tag big enough to carry a curve id at the usual place.
fn bitmap_tag(curve: u8) -> Vec<u8> {
    let mut buffer = vec![0xAAu8; 200];
    let position = buffer.len() - CURVE_OFFSET_FROM_END as usize;
    buffer[position] = curve;
    buffer
}

#[test]
fn test_simple_material() {
    let tag = MaterialTag::from_existing(&simple_material(2, "shaders\\srf_ca_port")).unwrap();

    assert_eq!(tag.header_offset, 176 + 12 * 12);
    assert_eq!(tag.blend_mode, BlendMode::MULTIPLY);
    assert_eq!(tag.shader_name, "srf_ca_port");
    assert!(tag.parameters.is_empty());
}

#[test]
fn test_bitmap_index_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bitmap.db");

    assert!(matches!(
        BitmapIndex::open(&path),
        Err(Error::MissingBitmapIndexFile { .. })
    ));
    assert!(BitmapIndex::from_file(&path).is_empty());

    fs::write(&path, b"foo/bar.bitmap\x00\x02baz.bitmap\x00\x05").unwrap();
    let index = BitmapIndex::open(&path).unwrap();
    assert_eq!(index.lookup("foo/bar"), 2.0);
    assert_eq!(index.lookup("baz"), 2.2);
    assert_eq!(index.lookup("missing"), 1.0);
}

#[test]
fn test_bitmap_index_from_install() {
    let dir = tempfile::tempdir().unwrap();
    let tags = dir.path();

    write_file(&tags.join("levels/ca_port/bitmaps/wall.bitmap"), &bitmap_tag(5));
    write_file(&tags.join("levels/ca_port/bitmaps/floor.bitmap"), &bitmap_tag(2));
    write_file(&tags.join("shaders/tiny.bitmap"), &[0; 16]);
    write_file(&tags.join("shaders/not_a_bitmap.material"), &bitmap_tag(5));

    let index = BitmapIndex::from_install(tags).unwrap();

    assert_eq!(
        index.paths().collect::<Vec<_>>(),
        vec![
            "levels\\ca_port\\bitmaps\\floor.bitmap",
            "levels\\ca_port\\bitmaps\\wall.bitmap"
        ]
    );
    assert_eq!(
        index.get("levels\\ca_port\\bitmaps\\wall.bitmap").unwrap().curve,
        BitmapCurve::S_RGB
    );
    assert_eq!(index.lookup("levels\\ca_port\\bitmaps\\floor"), 2.0);

    // and it survives being written out and read back in
    let database = dir.path().join("bitmap.db");
    fs::write(&database, index.write_to_buffer().unwrap()).unwrap();
    let reread = BitmapIndex::open(&database).unwrap();
    assert_eq!(reread.entries(), index.entries());

    assert!(matches!(
        BitmapIndex::from_install(tags.join("missing")),
        Err(Error::FileNotFound { .. })
    ));
}

#[test]
fn test_shader_census() {
    let dir = tempfile::tempdir().unwrap();
    let tags = dir.path();

    write_file(
        &tags.join("levels/a.material"),
        &simple_material(0, "shaders\\material_shaders\\srf_forerunner"),
    );
    write_file(
        &tags.join("levels/b.MATERIAL"),
        &simple_material(0, "shaders\\material_shaders\\srf_forerunner"),
    );
    write_file(
        &tags.join("levels/c.material"),
        &simple_material(1, "shaders\\material_shaders\\srf_glass"),
    );
    write_file(
        &tags.join("levels/d.material"),
        &simple_material(1, "shaders\\material_shaders\\srf_done"),
    );
    write_file(&tags.join("levels/garbage.material"), b"not a material");
    write_file(&tags.join("levels/ignored.bitmap"), b"not a material either");

    let finished: HashSet<String> = ["srf_done".to_string()].into_iter().collect();
    let census = ShaderCensus::new()
        .scan(tags, &finished, &DecodeOptions::default())
        .unwrap();

    assert_eq!(
        census.sorted(),
        vec![("srf_forerunner", 2), ("srf_glass", 1)]
    );
    assert_eq!(census.excluded(), 1);
    assert_eq!(census.failures().len(), 1);
    assert!(census.failures()[0].0.ends_with("garbage.material"));
    assert!(census.report().starts_with("srf_forerunner "));
}

#[test]
fn test_batch_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        &dir.path().join("levels/good.material"),
        &simple_material(3, "shaders\\srf_forerunner"),
    );
    write_file(&dir.path().join("levels/bad.material"), &[0xFF; 64]);

    let mut resource = UnpackedResource::from_existing(dir.path());
    assert!(resource.exists("levels\\good.material"));

    let outcomes = decode_tags(
        &mut resource,
        ["levels\\good", "levels\\bad", "levels\\missing"],
        &DecodeOptions::default(),
    );

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0].result.as_ref().unwrap().blend_mode,
        BlendMode::ALPHA_BLEND
    );
    assert!(outcomes[1].result.is_err());
    assert!(matches!(outcomes[2].result, Err(Error::FileNotFound { .. })));
}

/// Test that a shipped material decodes, and every parameter got a name.
#[test]
#[cfg_attr(not(feature = "retail_game_testing"), ignore)]
fn test_retail_material() {
    let tags_dir = env::var("H4EK_TAGS_DIR").unwrap();

    let mut tags = UnpackedResource::from_existing(tags_dir);
    let tag: MaterialTag = tags
        .parsed("levels\\dlc\\materials\\ca_port\\ca_port_emissive_lights.material")
        .unwrap();

    assert!(!tag.shader_name.is_empty());
    assert!(!tag.parameters.is_empty());
    for parameter in &tag.parameters {
        assert!(!parameter.name.is_empty());
    }
}

/// Test that every shipped material at least has a readable shader header.
#[test]
#[cfg_attr(not(feature = "retail_game_testing"), ignore)]
fn test_retail_census() {
    let tags_dir = env::var("H4EK_TAGS_DIR").unwrap();

    let census = ShaderCensus::new()
        .scan(&tags_dir, &HashSet::new(), &DecodeOptions::default())
        .unwrap();

    assert!(!census.sorted().is_empty());
    assert!(census.failures().is_empty());
}
