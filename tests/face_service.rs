//! End-to-end tests for the face pipeline: resolve, fetch, probe, composite.

mod common;

use common::{decode, map, service, texture, FakeSource, Stub};
use image::Rgba;
use pixelface::compose::ComposeMode;
use pixelface::overrides::OverrideSet;
use pixelface::service::FaceError;
use serde_json::json;

#[tokio::test]
async fn test_plain_face_default_region() {
    let source = FakeSource::new().with("cow/cow", Stub::Png(texture(64, 64)));
    let calls = source.calls();
    let faces = service(source, OverrideSet::default());

    let face = faces.render("cow", None).await.unwrap();
    assert_eq!((face.width, face.height), (64, 64));
    assert_eq!(face.mode, ComposeMode::Plain);
    assert_eq!(face.actual_width(), None);

    // Default 64x64 face is [8, 8, 8, 8], scaled 8x with nearest neighbor.
    let image = decode(&face.png);
    assert_eq!(*image.get_pixel(0, 0), Rgba([8, 8, 0, 255]));
    assert_eq!(*image.get_pixel(63, 63), Rgba([15, 15, 0, 255]));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_plain_face_is_not_snapped() {
    let source = FakeSource::new().with("cow/cow", Stub::Png(texture(64, 64)));
    let faces = service(source, OverrideSet::default());

    let face = faces.render("cow", Some(100)).await.unwrap();
    assert_eq!(face.width, 100);
    assert_eq!(face.actual_width(), None);
}

#[tokio::test]
async fn test_snout_snaps_width() {
    let source = FakeSource::new().with("pig/pig", Stub::Png(texture(64, 32)));
    let set = OverrideSet {
        face_regions: map(&[("pig", json!([8, 8, 6, 6]))]),
        snout_regions: map(&[("pig", json!([17, 17, 4, 3]))]),
        ..Default::default()
    };
    let faces = service(source, set);

    let face = faces.render("pig", Some(100)).await.unwrap();
    assert_eq!(face.mode, ComposeMode::Snout);
    assert_eq!((face.width, face.height), (102, 102));
    assert_eq!(face.actual_width(), Some(102));

    // Snout scaled by 17 and centered on the bottom edge.
    let image = decode(&face.png);
    assert_eq!(*image.get_pixel(51, 101), Rgba([19, 19, 0, 255]));
}

#[tokio::test]
async fn test_null_mapping_is_not_found_without_fetching() {
    let source = FakeSource::new();
    let calls = source.calls();
    let set = OverrideSet { asset_mappings: map(&[("giant", json!(null))]), ..Default::default() };
    let faces = service(source, set);

    let err = faces.render("giant", None).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_falls_back_to_bare_name() {
    let source = FakeSource::new()
        .with("cat/black", Stub::Missing)
        .with("black_cat", Stub::Png(texture(64, 32)));
    let calls = source.calls();
    let set = OverrideSet { asset_mappings: map(&[("black_cat", json!("cat/black"))]), ..Default::default() };
    let faces = service(source, set);

    let face = faces.render("black_cat", None).await.unwrap();
    assert_eq!(face.width, 64);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![common::url("cat/black"), common::url("black_cat")]
    );
}

#[tokio::test]
async fn test_upstream_error_skips_fallback() {
    let source = FakeSource::new()
        .with("cow/cow", Stub::Fail(503))
        .with("cow", Stub::Png(texture(64, 64)));
    let calls = source.calls();
    let faces = service(source, OverrideSet::default());

    let err = faces.render("cow", None).await.unwrap_err();
    assert!(matches!(err, FaceError::Upstream(_)));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_everywhere_is_not_found() {
    let source = FakeSource::new();
    let calls = source.calls();
    let faces = service(source, OverrideSet::default());

    let err = faces.render("herobrine", None).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_region_outside_texture_is_processing_error() {
    let source = FakeSource::new().with("cow/cow", Stub::Png(texture(64, 32)));
    let set = OverrideSet { face_regions: map(&[("cow", json!([60, 28, 8, 8]))]), ..Default::default() };
    let faces = service(source, set);

    let err = faces.render("cow", None).await.unwrap_err();
    assert!(matches!(err, FaceError::Processing(_)));
}

#[tokio::test]
async fn test_undecodable_texture_is_metadata_error() {
    let source = FakeSource::new().with("cow/cow", Stub::Png(b"not a png".to_vec()));
    let faces = service(source, OverrideSet::default());

    let err = faces.render("cow", None).await.unwrap_err();
    assert!(matches!(err, FaceError::Metadata(_)));
}

#[tokio::test]
async fn test_malformed_entry_is_config_error() {
    let source = FakeSource::new().with("cow/cow", Stub::Png(texture(64, 64)));
    let set = OverrideSet { face_regions: map(&[("cow", json!("oops"))]), ..Default::default() };
    let faces = service(source, set);

    let err = faces.render("cow", None).await.unwrap_err();
    assert!(matches!(err, FaceError::Config(_)));
}

#[tokio::test]
async fn test_background_takes_precedence_over_snout() {
    let source = FakeSource::new().with("bee/bee", Stub::Png(texture(64, 64)));
    let set = OverrideSet {
        face_regions: map(&[("bee", json!([8, 8, 8, 8]))]),
        snout_regions: map(&[("bee", json!([2, 2, 2, 2]))]),
        background_regions: map(&[("bee", json!([[4, 4, 16, 16]]))]),
        ..Default::default()
    };
    let faces = service(source, set);

    let face = faces.render("bee", Some(70)).await.unwrap();
    assert_eq!(face.mode, ComposeMode::Background);
    assert_eq!((face.width, face.height), (72, 72));
    assert_eq!(face.actual_width(), Some(72));
}

#[tokio::test]
async fn test_broken_snout_does_not_affect_background_face() {
    let source = FakeSource::new().with("bee/bee", Stub::Png(texture(64, 64)));
    let set = OverrideSet {
        face_regions: map(&[("bee", json!([8, 8, 8, 8]))]),
        snout_regions: map(&[("*", json!("broken"))]),
        background_regions: map(&[("bee", json!([[4, 4, 16, 16]]))]),
        ..Default::default()
    };
    let faces = service(source, set);

    let face = faces.render("bee", Some(64)).await.unwrap();
    assert_eq!(face.mode, ComposeMode::Background);
    assert_eq!((face.width, face.height), (64, 64));
}

#[tokio::test]
async fn test_reload_applies_to_next_request() {
    let source = FakeSource::new().with("cow/cow", Stub::Png(texture(64, 64)));
    let faces = service(source, OverrideSet::default());
    assert_eq!(faces.render("cow", Some(16)).await.unwrap().height, 16);

    faces.overrides().replace(OverrideSet {
        face_regions: map(&[("cow", json!({ "x": 0, "y": 0, "width": 8, "height": 4 }))]),
        ..Default::default()
    });
    assert_eq!(faces.render("cow", Some(16)).await.unwrap().height, 8);
}

#[tokio::test]
async fn test_resolve_reports_urls_and_mode() {
    let set = OverrideSet {
        asset_mappings: map(&[("*_cat", json!("cat/{name}"))]),
        snout_regions: map(&[("^cat/*", json!({ "region": [2, 26, 3, 2], "offset": { "y": -1 } }))]),
        ..Default::default()
    };
    let faces = service(FakeSource::new(), set);

    let resolution = faces.resolve("red_cat", (64, 32)).unwrap();
    assert_eq!(resolution.asset_path, "cat/red_cat");
    assert_eq!(resolution.urls, vec![common::url("cat/red_cat"), common::url("red_cat")]);
    assert_eq!(resolution.mode, ComposeMode::Snout);
    assert_eq!(resolution.regions.snout.map(|s| s.y), Some(25));
}
