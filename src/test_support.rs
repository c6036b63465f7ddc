//! Fixture builders shared by the unit tests
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Encode a solid-color PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Write a zip archive with the given raw entries. Names ending in '/'
/// become directory entries.
pub fn write_archive(path: &Path, entries: &[(&str, Vec<u8>)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    let mut writer = ZipWriter::new(File::create(path).unwrap());

    for (name, data) in entries {
        let options = SimpleFileOptions::default();
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }

    writer.finish().unwrap();
}

/// Write a comic archive where every page is a tiny PNG
pub fn write_comic(path: &Path, pages: &[&str]) {
    let entries: Vec<(&str, Vec<u8>)> = pages.iter().map(|name| (*name, png_bytes(2, 3))).collect();
    write_archive(path, &entries);
}
