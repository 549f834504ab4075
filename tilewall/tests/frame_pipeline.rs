//! End-to-end frame: content metadata -> source -> plan -> decoded tiles.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use tilewall::cache::TileImageCache;
use tilewall::config::ConfigFile;
use tilewall::geometry::{Rect, Size};
use tilewall::source::{
    ContentInfo, DataSource, DataSourceFactory, PyramidSource, Rasterizer, SourceError,
    StereoView,
};
use tilewall::tile::{FramePlanner, TileLoader};
use tilewall::visibility::Window;

const WALL: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

/// Write a 512x256 pyramid with 256px tiles: one tile at lod 0, two at lod 1.
fn write_pyramid(root: &Path) {
    let tiles = [
        (0, 0, 0, 256, 128, [10, 10, 10, 255]),
        (1, 0, 0, 256, 256, [255, 0, 0, 255]),
        (1, 0, 1, 256, 256, [0, 255, 0, 255]),
    ];
    for (lod, row, col, width, height, color) in tiles {
        let dir = root.join(lod.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        RgbaImage::from_pixel(width, height, Rgba(color))
            .save(dir.join(format!("{}_{}.png", row, col)))
            .unwrap();
    }
}

#[test]
fn test_pyramid_window_decodes_visible_tiles() {
    let dir = TempDir::new().unwrap();
    write_pyramid(dir.path());

    let factory = DataSourceFactory::new(256);
    let info = ContentInfo::new(512, 256, "pyramid", dir.path().to_string_lossy());
    let source = factory.create(&info).unwrap();
    assert!(source.is_valid());
    assert_eq!(source.max_lod(), 1);

    let windows = [Window::new(1, Rect::new(100.0, 100.0, 512.0, 256.0))];
    let planner = FramePlanner::new(&windows, WALL);
    let plan = planner.plan(&windows[0], source.as_ref());
    assert_eq!(plan.lod, 1);
    assert_eq!(plan.tile_ids(0), vec![1, 2]);

    let loader = TileLoader::new(2).unwrap();
    let report = loader.load_plan(source.as_ref(), &plan);
    assert!(report.is_complete());
    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.loaded[0].image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    assert_eq!(report.loaded[1].image.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
    assert_eq!(
        report.loaded[1].request.normalized_rect(),
        Rect::new(0.5, 0.0, 0.5, 1.0)
    );
}

#[test]
fn test_occluded_pyramid_tiles_are_not_loaded() {
    let dir = TempDir::new().unwrap();
    write_pyramid(dir.path());

    let info = ContentInfo::new(512, 256, "pyramid", dir.path().to_string_lossy());
    let source = PyramidSource::open(&info, 256, "png").unwrap();

    // Right half of the window is covered by a full-height window above it.
    let windows = [
        Window::new(1, Rect::new(0.0, 0.0, 512.0, 256.0)),
        Window::new(2, Rect::new(256.0, 0.0, 400.0, 400.0)),
    ];
    let planner = FramePlanner::new(&windows, WALL);
    let plan = planner.plan(&windows[0], &source);
    assert_eq!(plan.tile_ids(0), vec![1]);

    let report = TileLoader::new(1).unwrap().load_plan(&source, &plan);
    assert_eq!(report.loaded.len(), 1);
    assert!(source.cache().contains(1));
    assert!(!source.cache().contains(2));
}

#[test]
fn test_repeated_frames_hit_the_cache() {
    let dir = TempDir::new().unwrap();
    write_pyramid(dir.path());

    let info = ContentInfo::new(512, 256, "pyramid", dir.path().to_string_lossy());
    let source = PyramidSource::open(&info, 256, "png").unwrap();
    let windows = [Window::new(1, Rect::new(0.0, 0.0, 512.0, 256.0))];
    let plan = FramePlanner::new(&windows, WALL).plan(&windows[0], &source);
    let loader = TileLoader::new(2).unwrap();

    let first = loader.load_plan(&source, &plan);
    let second = loader.load_plan(&source, &plan);

    let stats = source.cache().stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 2);
    for (a, b) in first.loaded.iter().zip(&second.loaded) {
        assert!(Arc::ptr_eq(&a.image, &b.image));
    }
}

#[test]
fn test_cache_decodes_once_per_tile() {
    let cache = TileImageCache::new();
    let decodes = AtomicUsize::new(0);
    let decode = |id: u64| {
        decodes.fetch_add(1, Ordering::SeqCst);
        Some(RgbaImage::from_pixel(4, 4, Rgba([id as u8, 0, 0, 255])))
    };

    let first = cache.get(3, decode).unwrap();
    let second = cache.get(3, decode).unwrap();

    assert_eq!(first.as_raw(), second.as_raw());
    assert_eq!(decodes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stereo_file_is_split_into_views() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.jps");
    RgbaImage::from_fn(40, 10, |x, _| {
        if x < 20 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
    .save_with_format(&path, ImageFormat::Png)
    .unwrap();

    let factory = DataSourceFactory::default();
    let info = ContentInfo::new(40, 10, "image", path.to_string_lossy());
    let source = factory.create(&info).unwrap();
    assert!(source.is_valid());
    assert!(source.is_stereo());
    assert_eq!(source.tiles_area(0, 0), Size::new(20, 10));

    let windows = [Window::new(1, Rect::new(0.0, 0.0, 400.0, 100.0))];
    let plan = FramePlanner::new(&windows, WALL).plan(&windows[0], source.as_ref());
    assert_eq!(plan.requests.len(), 2);

    let report = TileLoader::new(2).unwrap().load_plan(source.as_ref(), &plan);
    let left = &report.loaded[0];
    let right = &report.loaded[1];
    assert_eq!(left.request.view(), StereoView::Left);
    assert_eq!(right.request.view(), StereoView::Right);
    assert_eq!(left.image.dimensions(), (20, 10));
    assert_eq!(left.image.get_pixel(19, 0), &Rgba([255, 0, 0, 255]));
    assert_eq!(right.image.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
}

#[test]
fn test_image_frames_share_decoded_pixels() {
    let source = tilewall::source::ImageSource::from_image(
        "poster.png",
        RgbaImage::new(256, 256),
        false,
    );
    let windows = [Window::new(1, Rect::new(0.0, 0.0, 256.0, 256.0))];
    let plan = FramePlanner::new(&windows, WALL).plan(&windows[0], &source);
    let loader = TileLoader::new(2).unwrap();

    let first = loader.load_plan(&source, &plan);
    let second = loader.load_plan(&source, &plan);

    assert_eq!(first.loaded.len(), 1);
    assert!(Arc::ptr_eq(&first.loaded[0].image, &second.loaded[0].image));
}

#[test]
fn test_missing_image_yields_empty_plan() {
    let factory = DataSourceFactory::default();
    let info = ContentInfo::new(100, 100, "image", "/nonexistent/tilewall/photo.png");
    let source = factory.create(&info).unwrap();
    assert!(!source.is_valid());
    assert!(source
        .compute_visible_set(&Rect::new(0.0, 0.0, 100.0, 100.0), 0, 0)
        .is_empty());

    let windows = [Window::new(1, Rect::new(0.0, 0.0, 100.0, 100.0))];
    assert!(FramePlanner::new(&windows, WALL)
        .plan(&windows[0], source.as_ref())
        .is_empty());
}

#[test]
fn test_unsupported_content_is_rejected() {
    let factory = DataSourceFactory::default();
    for tag in ["movie", "webbrowser", "svg", "hologram"] {
        let info = ContentInfo::new(100, 100, tag, "/tmp/content");
        assert!(matches!(
            factory.create(&info),
            Err(SourceError::UnsupportedContentType(_))
        ));
    }
}

struct Checkerboard;

impl Rasterizer for Checkerboard {
    fn name(&self) -> &str {
        "checkerboard"
    }

    fn rasterize(&self, _uri: &str, region: &Rect, size: Size) -> Option<RgbaImage> {
        let shade = if region.x < 0.5 { 0 } else { 255 };
        Some(RgbaImage::from_pixel(size.width, size.height, Rgba([shade, shade, shade, 255])))
    }
}

#[test]
fn test_vector_content_is_rasterized_per_tile() {
    let config = ConfigFile::parse("[tiles]\ntile_size = 256\n").unwrap();
    let factory = DataSourceFactory::from_config(&config.tiles)
        .with_rasterizer(tilewall::source::ContentType::Svg, Arc::new(Checkerboard));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("diagram.svg");
    std::fs::write(&path, "<svg/>").unwrap();
    let info = ContentInfo::new(512, 256, "svg", path.to_string_lossy());
    let source = factory.create(&info).unwrap();
    assert!(source.is_valid());

    let windows = [Window::new(1, Rect::new(0.0, 0.0, 512.0, 256.0))];
    let plan = FramePlanner::new(&windows, WALL).plan(&windows[0], source.as_ref());
    let report = TileLoader::new(2).unwrap().load_plan(source.as_ref(), &plan);

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.loaded[0].image.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    assert_eq!(report.loaded[1].image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
}
