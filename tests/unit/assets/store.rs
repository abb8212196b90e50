use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

struct StaticSource(Vec<u8>);

impl SpriteSource for StaticSource {
    fn fetch(&self, _source: &str) -> EngineResult<Vec<u8>> {
        Ok(self.0.clone())
    }
}

struct FlakySource {
    bytes: Vec<u8>,
    fail: AtomicBool,
}

impl SpriteSource for FlakySource {
    fn fetch(&self, source: &str) -> EngineResult<Vec<u8>> {
        if self.fail.load(Ordering::SeqCst) {
            Err(EngineError::asset_load(format!("transient failure for '{source}'")))
        } else {
            Ok(self.bytes.clone())
        }
    }
}

#[test]
fn normalize_rejects_traversal_and_absolute_paths() {
    assert!(normalize_rel_path("hat/army.png").is_ok());
    assert!(normalize_rel_path("./hat/army.png").is_ok());
    assert!(normalize_rel_path("../secrets.png").is_err());
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("hat/../../x.png").is_err());
    assert!(normalize_rel_path("").is_err());
}

#[test]
fn fs_source_reads_relative_to_root() {
    let dir = tempfile::tempdir().unwrap();
    let body_dir = dir.path().join("body");
    std::fs::create_dir_all(&body_dir).unwrap();
    std::fs::write(body_dir.join("basic.png"), png_bytes(2, 2, [255, 0, 0, 255])).unwrap();

    let source = FsSpriteSource::new(dir.path());
    assert!(source.fetch("body/basic.png").is_ok());
    assert!(source.fetch("body/missing.png").is_err());
    assert!(source.fetch("../basic.png").is_err());
}

#[test]
fn decode_premultiplies_pixels() {
    let bytes = png_bytes(1, 1, [200, 100, 0, 128]);
    let mut cache = SpriteCache::new(Box::new(StaticSource(bytes)));
    let sprite = cache.get("item", "x.png").unwrap();
    assert_eq!((sprite.width, sprite.height), (1, 1));
    // 200 * 128/255 ~= 100, 100 * 128/255 ~= 50.
    assert!((i16::from(sprite.data[0]) - 100).abs() <= 1);
    assert!((i16::from(sprite.data[1]) - 50).abs() <= 1);
    assert_eq!(sprite.data[3], 128);
}

#[test]
fn cache_falls_back_to_last_good_copy() {
    let source = FlakySource {
        bytes: png_bytes(2, 2, [0, 255, 0, 255]),
        fail: AtomicBool::new(false),
    };
    // SpriteCache owns the source, so flip the failure flag through a leak-free
    // shared handle.
    let source = std::sync::Arc::new(source);

    struct Shared(std::sync::Arc<FlakySource>);
    impl SpriteSource for Shared {
        fn fetch(&self, source: &str) -> EngineResult<Vec<u8>> {
            self.0.fetch(source)
        }
    }

    let mut cache = SpriteCache::new(Box::new(Shared(std::sync::Arc::clone(&source))));
    assert!(cache.get("item", "x.png").is_some());

    source.fail.store(true, Ordering::SeqCst);
    let stale = cache.get("item", "x.png");
    assert!(stale.is_some(), "expected last-good fallback");

    // A different item id has no fallback tier yet.
    assert!(cache.get("other", "y.png").is_none());
}

#[test]
fn undecodable_bytes_are_a_miss() {
    let mut cache = SpriteCache::new(Box::new(StaticSource(vec![1, 2, 3, 4])));
    assert!(cache.get("item", "x.png").is_none());
}
