//! Save/load round trips through a container file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use polars::prelude::*;
use tabstore_core::{
    Basic, Container, ContainerError, EntryPath, PropertyValue, SaveOptions, StoreError,
    StoreKind, TabularStore, TableValue,
};
use tempfile::tempdir;

struct Photometry;

impl StoreKind for Photometry {
    const TYPE_TAG: &'static str = "Photometry";
    const SECONDARY_TABLES: &'static [&'static str] = &["bands", "zeropoints"];
}

struct Spectra;

impl StoreKind for Spectra {
    const TYPE_TAG: &'static str = "Spectra";
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn observations() -> DataFrame {
    df!(
        "star" => ["a", "b", "c"],
        "mag" => [Some(17.25f64), None, Some(18.5)],
        "epoch" => [1i64, 2, 3],
    )
    .unwrap()
}

fn photometry() -> TabularStore<Photometry> {
    TabularStore::builder(observations())
        .table("bands", Series::new("band".into(), &["g", "r", "i"]))
        .table("zeropoints", df!("band" => ["g", "r"], "zp" => [25.1f64, 24.9]).unwrap())
        .property("instrument", "LSST")
        .property("exposure", 30.0)
        .property("visits", 12)
        .property("calibrated", true)
        .property("filters", vec!["g", "r", "i"])
        .property("note", None::<String>)
        .build()
        .unwrap()
}

fn assert_same_tables<K: StoreKind>(a: &TabularStore<K>, b: &TabularStore<K>) {
    let primary = a.primary_table_name();
    assert!(
        a.table(primary)
            .unwrap()
            .equals_missing(b.table(primary).unwrap())
    );
    for name in a.secondary_table_names() {
        assert!(
            a.table(name).unwrap().equals_missing(b.table(name).unwrap()),
            "table {name} differs"
        );
    }
}

#[test]
fn round_trip_restores_tables_and_properties() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");

    let store = photometry();
    store.save(&path, &SaveOptions::default()).unwrap();

    let restored = TabularStore::<Photometry>::open(&path, "").unwrap();
    assert_same_tables(&store, &restored);
    assert_eq!(restored.properties(), store.properties());
    assert_eq!(restored.property("visits"), Some(&PropertyValue::Int(12)));
    assert_eq!(restored.property("exposure"), Some(&PropertyValue::Float(30.0)));
    assert!(restored.table("bands").unwrap().as_series().is_some());
}

#[test]
fn load_chains_from_empty_shell() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");
    photometry().save(&path, &SaveOptions::default()).unwrap();

    let mut shell = TabularStore::<Photometry>::empty();
    let rows = shell.load(&path, "").unwrap().primary_table().map(TableValue::len);
    assert_eq!(rows, Some(3));
}

#[test]
fn existing_destination_is_left_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");
    fs::write(&path, b"precious").unwrap();

    let err = photometry().save(&path, &SaveOptions::default()).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { .. }));
    assert_eq!(fs::read(&path).unwrap(), b"precious");
}

#[test]
fn overwrite_replaces_previous_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");

    photometry()
        .save(&path, &SaveOptions::new().with_namespace("old"))
        .unwrap();

    let basic = TabularStore::<Basic>::builder(Series::new("v".into(), &[1i32, 2]))
        .build()
        .unwrap();
    basic.save(&path, &SaveOptions::new().overwrite()).unwrap();

    let container = Container::open(&path).unwrap();
    assert_eq!(container.keys().collect::<Vec<_>>(), vec!["data"]);

    let err = TabularStore::<Photometry>::open(&path, "old").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn overwrite_replaces_non_container_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");
    fs::write(&path, b"not a container").unwrap();

    photometry()
        .save(&path, &SaveOptions::new().overwrite().append())
        .unwrap();
    assert!(TabularStore::<Photometry>::open(&path, "").is_ok());
}

#[test]
fn namespaces_coexist_in_one_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.tbs");

    let x = photometry();
    let y = TabularStore::<Spectra>::builder(df!("flux" => [1.0f64, 2.0]).unwrap())
        .property("resolution", 2000)
        .build()
        .unwrap();

    x.save(&path, &SaveOptions::new().with_namespace("x")).unwrap();
    y.save(&path, &SaveOptions::new().with_namespace("y").append())
        .unwrap();

    let restored_x = TabularStore::<Photometry>::open(&path, "x").unwrap();
    let restored_y = TabularStore::<Spectra>::open(&path, "/y/").unwrap();
    assert_same_tables(&x, &restored_x);
    assert_same_tables(&y, &restored_y);
    assert_eq!(restored_x.properties(), x.properties());
    assert_eq!(restored_y.properties(), y.properties());

    let container = Container::open(&path).unwrap();
    assert_eq!(container.len(), 4);
}

#[test]
fn append_refuses_existing_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");

    photometry()
        .save(&path, &SaveOptions::new().with_namespace("x"))
        .unwrap();
    let before = fs::read(&path).unwrap();

    let err = photometry()
        .save(&path, &SaveOptions::new().with_namespace("x").append())
        .unwrap_err();
    match err {
        StoreError::EntryExists { entry, .. } => assert_eq!(entry, "x/data"),
        other => panic!("expected EntryExists, got {other:?}"),
    }
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn append_creates_missing_destination() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fresh.tbs");

    photometry()
        .save(&path, &SaveOptions::new().append())
        .unwrap();
    assert!(TabularStore::<Photometry>::open(&path, "").is_ok());
}

#[test]
fn type_mismatch_restores_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");
    photometry().save(&path, &SaveOptions::default()).unwrap();

    let mut spectra = TabularStore::<Spectra>::empty();
    let err = spectra.load(&path, "").unwrap_err();
    match err {
        StoreError::TypeMismatch { stored, expected } => {
            assert_eq!(stored, "Photometry");
            assert_eq!(expected, "Spectra");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
    assert!(!spectra.is_populated());
    assert!(spectra.properties().is_empty());
}

#[test]
fn explicit_properties_override_tracked_ones() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");

    let store = photometry();
    let options = SaveOptions::new()
        .with_property("visits", 99)
        .with_properties(BTreeMap::from([(
            "pipeline".to_string(),
            PropertyValue::from("v2"),
        )]));
    store.save(&path, &options).unwrap();

    // In-memory state is unchanged by save.
    assert_eq!(store.property("visits"), Some(&PropertyValue::Int(12)));

    let restored = TabularStore::<Photometry>::open(&path, "").unwrap();
    assert_eq!(restored.property("visits"), Some(&PropertyValue::Int(99)));
    assert_eq!(restored.property("pipeline"), Some(&PropertyValue::from("v2")));
    assert_eq!(restored.property("instrument"), Some(&PropertyValue::from("LSST")));
}

#[test]
fn loaded_properties_survive_resave() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.tbs");
    let second = dir.path().join("second.tbs");

    photometry().save(&first, &SaveOptions::default()).unwrap();
    let restored = TabularStore::<Photometry>::open(&first, "").unwrap();
    restored.save(&second, &SaveOptions::default()).unwrap();

    let again = TabularStore::<Photometry>::open(&second, "").unwrap();
    assert_eq!(again.properties(), photometry().properties());
}

#[test]
fn missing_secondary_entry_is_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.tbs");

    // Write a primary entry with a valid record but no secondary tables.
    let key = EntryPath::parse("data").unwrap();
    let mut container = Container::create(&path);
    container.put_table(&key, &observations().into()).unwrap();
    container
        .set_attr(&key, "properties", &BTreeMap::<String, PropertyValue>::new())
        .unwrap();
    container.set_attr(&key, "type", "Photometry").unwrap();
    container.commit().unwrap();

    let mut store = TabularStore::<Photometry>::empty();
    match store.load(&path, "").unwrap_err() {
        StoreError::NotFound { entry, .. } => assert_eq!(entry, "bands"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    // Partially populated: the primary table was read before the failure.
    assert!(store.is_populated());
}

#[test]
fn missing_file_and_namespace_are_not_found() {
    let dir = tempdir().unwrap();
    let absent = dir.path().join("absent.tbs");
    assert!(
        TabularStore::<Basic>::open(&absent, "")
            .unwrap_err()
            .is_not_found()
    );

    let path = dir.path().join("stars.tbs");
    photometry().save(&path, &SaveOptions::default()).unwrap();
    assert!(
        TabularStore::<Photometry>::open(&path, "elsewhere")
            .unwrap_err()
            .is_not_found()
    );
}

#[test]
fn empty_shell_cannot_be_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.tbs");
    let err = TabularStore::<Basic>::empty()
        .save(&path, &SaveOptions::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::Unpopulated));
    assert!(!Path::new(&path).exists());
}

#[test]
fn columnless_primary_keeps_row_count() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("blank.tbs");

    let store = TabularStore::<Basic>::builder(DataFrame::empty_with_height(5))
        .property("rows", 5)
        .build()
        .unwrap();
    store.save(&path, &SaveOptions::default()).unwrap();

    let loaded = TabularStore::<Basic>::open(&path, "").unwrap();
    let frame = loaded.primary_table().unwrap().as_frame().unwrap();
    assert_eq!(frame.width(), 0);
    assert_eq!(frame.height(), 5);
}

#[test]
fn padded_namespace_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stars.tbs");

    let err = photometry()
        .save(&path, &SaveOptions::new().with_namespace(" x "))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Container(ContainerError::InvalidPath { .. })
    ));
    assert!(!path.exists());

    photometry()
        .save(&path, &SaveOptions::new().with_namespace("x"))
        .unwrap();
    assert!(TabularStore::<Photometry>::open(&path, "x ").is_err());
}
