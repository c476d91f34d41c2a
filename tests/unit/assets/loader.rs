use super::*;
use crate::assets::decode::{DecodedImage, MemoryImageSource};

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> DecodedImage {
    DecodedImage {
        width: w,
        height: h,
        rgba8: rgba.repeat((w * h) as usize),
    }
}

fn small_config() -> BlendConfig {
    BlendConfig {
        screen_width: 16,
        screen_height: 8,
        front_offset: 16 * 2 + 4,
        ..BlendConfig::default()
    }
}

#[test]
fn load_places_front_and_copies_back() {
    let source = MemoryImageSource::new()
        .with("front", solid(4, 3, [255, 0, 0, 255]))
        .with("back", solid(16, 8, [0, 0, 255, 255]));
    let loader = ImageLoader::with_source(small_config(), source).unwrap();

    let (front, back) = loader.load(Path::new("front"), Path::new("back")).unwrap();

    assert_eq!(front.canvas(), Canvas::new(16, 8));
    assert_eq!(back.canvas(), Canvas::new(16, 8));
    assert!(front.is_aligned_to(32));
    assert!(back.is_aligned_to(32));
    assert_ne!(front.as_bytes().as_ptr(), back.as_bytes().as_ptr());

    for y in 2..5 {
        for x in 4..8 {
            assert_eq!(front.pixel(x, y), Some([255, 0, 0, 255]), "x={x} y={y}");
        }
    }
    assert!(back.pixels().all(|px| px == [0, 0, 255, 255]));
}

#[test]
fn missing_front_is_file_not_found() {
    let source = MemoryImageSource::new().with("back", solid(16, 8, [0, 0, 0, 255]));
    let loader = ImageLoader::with_source(small_config(), source).unwrap();
    let err = loader
        .load(Path::new("front"), Path::new("back"))
        .unwrap_err();
    assert!(matches!(err, BlendError::FileNotFound { ref path, .. } if path == Path::new("front")));
}

#[test]
fn missing_back_is_file_not_found() {
    let source = MemoryImageSource::new().with("front", solid(2, 2, [1, 1, 1, 1]));
    let loader = ImageLoader::with_source(small_config(), source).unwrap();
    let err = loader
        .load(Path::new("front"), Path::new("back"))
        .unwrap_err();
    assert!(matches!(err, BlendError::FileNotFound { ref path, .. } if path == Path::new("back")));
}

#[test]
fn front_that_does_not_fit_is_out_of_bounds() {
    let source = MemoryImageSource::new()
        .with("front", solid(16, 8, [1, 1, 1, 1]))
        .with("back", solid(16, 8, [0, 0, 0, 255]));
    let loader = ImageLoader::with_source(small_config(), source).unwrap();
    let err = loader
        .load(Path::new("front"), Path::new("back"))
        .unwrap_err();
    assert!(matches!(err, BlendError::OutOfBounds(_)), "{err}");
}

#[test]
fn back_with_wrong_size_is_a_copy_error() {
    let source = MemoryImageSource::new()
        .with("front", solid(2, 2, [1, 1, 1, 1]))
        .with("back", solid(8, 8, [0, 0, 0, 255]));
    let loader = ImageLoader::with_source(small_config(), source).unwrap();
    let err = loader
        .load(Path::new("front"), Path::new("back"))
        .unwrap_err();
    assert!(matches!(err, BlendError::Copy(_)), "{err}");
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let cfg = BlendConfig {
        alignment: 12,
        ..small_config()
    };
    let err = ImageLoader::with_source(cfg, MemoryImageSource::new()).unwrap_err();
    assert!(matches!(err, BlendError::Validation(_)), "{err}");
}
