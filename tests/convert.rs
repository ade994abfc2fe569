//! Conversion Integration Tests
//!
//! Properties of STAC tree -> Intake catalog conversion on in-memory trees.

use stac_intake::core::{ConvertError, Converter, DriverResolution, DriverTable, KeyStrategy};
use stac_intake::domain::{Asset, CatalogNode, IntakeCatalog, Item, SourceArgs, SourceDescriptor};

fn landsat_tree() -> CatalogNode {
    let scene_1 = Item::new("LC08_001")
        .with_asset(
            "B4",
            Asset::new("https://x/LC08_001_B4.TIF", "image/tiff; application=geotiff")
                .with_title("Band 4 (red)"),
        )
        .with_asset("thumbnail", Asset::new("https://x/LC08_001.png", "image/png"))
        .with_asset("MTL", Asset::new("https://x/LC08_001_MTL.txt", "text/plain"));
    let scene_2 = Item::new("LC08_002")
        .with_asset("B5", Asset::new("https://x/LC08_002_B5.TIF", "image/tiff"));
    let loose = Item::new("loose")
        .with_asset("data", Asset::new("https://x/loose.bin", "application/x-custom"));

    CatalogNode::new("root")
        .with_catalog(
            CatalogNode::collection("landsat-8")
                .with_item(scene_1)
                .with_catalog(CatalogNode::new("2020").with_item(scene_2)),
        )
        .with_item(loose)
}

fn colliding_tree() -> CatalogNode {
    CatalogNode::new("root")
        .with_item(Item::new("a").with_asset("b", Asset::new("https://x/first.png", "image/png")))
        .with_item(Item::new("ab").with_asset("", Asset::new("https://x/second.png", "image/png")))
}

#[test]
fn test_one_descriptor_per_asset() {
    let tree = landsat_tree();
    let expected: usize = tree.items().map(|item| item.assets.len()).sum();

    let catalog = Converter::default().convert(&tree).unwrap();

    assert_eq!(expected, 5);
    assert_eq!(catalog.len(), expected);
    let names = [
        "LC08_001B4",
        "LC08_001thumbnail",
        "LC08_001MTL",
        "LC08_002B5",
        "loosedata",
    ];
    for name in names {
        assert!(catalog.source(name).is_some(), "missing source {}", name);
    }
}

#[test]
fn test_convert_is_idempotent() {
    let tree = landsat_tree();
    let converter = Converter::default();

    let first = converter.convert(&tree).unwrap();
    let second = converter.convert(&tree).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_driver_resolution() {
    let table = DriverTable::builtin();

    assert_eq!(
        table.resolve("image/vnd.stac.geotiff; cloud-optimized=true"),
        DriverResolution::Resolved("rasterio")
    );
    assert_eq!(
        table.resolve("application/x-custom").driver_name(),
        "application/x-custom"
    );

    let catalog = Converter::default().convert(&landsat_tree()).unwrap();
    assert_eq!(catalog.source("LC08_001B4").unwrap().driver, "rasterio");
    assert_eq!(catalog.source("LC08_001MTL").unwrap().driver, "textfiles");
    assert_eq!(catalog.source("loosedata").unwrap().driver, "application/x-custom");
}

/// Known limitation: plain concatenation is not injective.
///
/// Item "a" with asset "b" and item "ab" with asset "" both become "ab".
/// Only the asset converted last survives.
#[test]
fn test_concatenated_names_collide() {
    let tree = colliding_tree();

    let catalog = Converter::default().convert(&tree).unwrap();

    assert_eq!(catalog.len(), 1);
    let survivor = catalog.source("ab").unwrap();
    assert_eq!(survivor.args.urlpath, "https://x/second.png");
    // Untitled asset with an empty key gets an empty description
    assert_eq!(survivor.description, "");

    // Reproducible on every run
    assert_eq!(Converter::default().convert(&tree).unwrap(), catalog);
}

#[test]
fn test_separator_avoids_the_collision() {
    let tree = colliding_tree();

    let catalog = Converter::default()
        .with_key_strategy(KeyStrategy::Separator(":".to_string()))
        .convert(&tree)
        .unwrap();

    assert_eq!(catalog.len(), 2);
    assert!(catalog.source("a:b").is_some());
    assert!(catalog.source("ab:").is_some());
}

#[test]
fn test_end_to_end_thumbnail() {
    let tree = CatalogNode::new("root").with_catalog(
        CatalogNode::collection("collection").with_item(Item::new("scene").with_asset(
            "thumbnail",
            Asset::new("http://x/y.png", "image/png").with_title("Thumb"),
        )),
    );

    let catalog = Converter::default().convert(&tree).unwrap();

    assert_eq!(
        catalog.source("scenethumbnail"),
        Some(&SourceDescriptor {
            description: "Thumb".to_string(),
            driver: "xarray_image".to_string(),
            args: SourceArgs {
                urlpath: "http://x/y.png".to_string(),
                chunks: Default::default(),
            },
        })
    );
}

#[test]
fn test_envelope_on_empty_catalog() {
    let tree = CatalogNode::new("empty").with_catalog(CatalogNode::new("also-empty"));

    let catalog = Converter::default().convert(&tree).unwrap();

    assert!(catalog.sources.is_empty());
    assert_eq!(catalog.metadata.version, 1);
    assert_eq!(catalog.plugins.source.len(), 1);
    assert_eq!(catalog.plugins.source[0].module, "intake_xarray");
}

#[test]
fn test_envelope_on_large_catalog() {
    let mut root = CatalogNode::new("root");
    for i in 0..50 {
        let mut item = Item::new(format!("item-{:02}", i));
        for band in ["B1", "B2", "B3"] {
            let href = format!("https://x/{}/{}.tif", i, band);
            item = item.with_asset(band, Asset::new(href, "image/tiff"));
        }
        root = root.with_item(item);
    }

    let catalog = Converter::default().convert(&root).unwrap();

    assert_eq!(catalog.len(), 150);
    assert_eq!(catalog.metadata.version, 1);
    assert_eq!(catalog.plugins.source.len(), 1);
}

#[test]
fn test_missing_type_aborts() {
    let tree = landsat_tree().with_item(Item::new("broken").with_asset(
        "nothing",
        Asset {
            href: Some("https://x/nothing".to_string()),
            ..Default::default()
        },
    ));

    match Converter::default().convert(&tree) {
        Err(ConvertError::MissingField { item_id, field, .. }) => {
            assert_eq!(item_id, "broken");
            assert_eq!(field, "type");
        }
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn test_yaml_round_trip_keeps_content() {
    let catalog = Converter::default().convert(&landsat_tree()).unwrap();

    let parsed = IntakeCatalog::from_yaml(&catalog.to_yaml().unwrap()).unwrap();

    // Content equality only; key order is not part of the contract
    assert_eq!(parsed, catalog);
}
