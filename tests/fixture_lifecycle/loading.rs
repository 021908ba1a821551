//! Fixture discovery, cleaning and caching across setups

use crate::common::*;
use std::sync::Arc;

#[tokio::test]
async fn requested_fixture_is_loaded_exactly() {
    let dir = FixtureDir::new();
    dir.write("widgets.json", WIDGETS_JSON);
    dir.write("gadgets.yaml", "- _id: 1\n");

    let db = dir
        .fixture()
        .setup(&Markers::new().collections(["widgets"]))
        .await
        .unwrap();
    assert_eq!(count(&db, "widgets").await, 3);
    assert_eq!(db.list_collection_names(), vec!["widgets".to_string()]);
}

#[tokio::test]
async fn existing_collection_is_dropped_before_loading() {
    let dir = FixtureDir::new();
    dir.write("widgets.json", WIDGETS_JSON);
    let db = fresh_db();
    db.collection("widgets")
        .insert_one(doc! { "_id" => 99, "name" => "stale" })
        .await
        .unwrap();

    dir.fixture()
        .setup_on(&db, &Markers::new().collections(["widgets"]))
        .await
        .unwrap();
    assert_eq!(count(&db, "widgets").await, 3);
    assert!(db.collection("widgets").find_one(99).await.unwrap().is_none());
}

#[tokio::test]
async fn not_drop_exists_keeps_preseeded_collection() {
    let dir = FixtureDir::new();
    dir.write("widgets.json", WIDGETS_JSON);
    let db = fresh_db();
    db.collection("widgets")
        .insert_one(doc! { "_id" => 99 })
        .await
        .unwrap();

    let markers = Markers::new().collections(["widgets"]).not_drop_exists();
    dir.fixture().setup_on(&db, &markers).await.unwrap();
    assert_eq!(count(&db, "widgets").await, 1);
}

#[tokio::test]
async fn same_file_is_parsed_once_per_cache() {
    let dir = FixtureDir::new();
    dir.write("widgets.json", WIDGETS_JSON);
    let cache = Arc::new(FixtureCache::new());
    let fixture = dir.fixture_with_cache(Arc::clone(&cache));
    let markers = Markers::new().collections(["widgets"]);

    let first = fixture.setup(&markers).await.unwrap();
    // later edits are not seen through the same cache
    dir.write("widgets.json", "[]");
    let second = fixture.setup(&markers).await.unwrap();

    assert_eq!(cache.misses(), 1);
    assert_eq!(count(&first, "widgets").await, 3);
    assert_eq!(count(&second, "widgets").await, 3);
}

#[tokio::test]
async fn no_collections_marker_reads_nothing() {
    let dir = FixtureDir::new();
    dir.write("widgets.json", WIDGETS_JSON);
    let cache = Arc::new(FixtureCache::new());

    let db = dir
        .fixture_with_cache(Arc::clone(&cache))
        .setup(&Markers::new())
        .await
        .unwrap();
    assert!(db.list_collection_names().is_empty());
    assert!(cache.is_empty());
    assert_eq!(cache.misses(), 0);
}

#[tokio::test]
async fn no_collections_marker_tolerates_missing_directory() {
    let fixture = MongoFixture::new(
        FixtureConfig::default().with_fixture_dir("/no/such/fixture/dir"),
        RuntimeOptions::new(),
    )
    .with_cache(Arc::new(FixtureCache::new()));
    let db = fixture.setup(&Markers::new()).await.unwrap();
    assert!(db.list_collection_names().is_empty());

    let err = fixture
        .setup(&Markers::new().collection("widgets"))
        .await
        .unwrap_err();
    assert!(matches!(err, FixtureError::Io { .. }));
}

#[tokio::test]
async fn unsupported_extensions_are_ignored() {
    let dir = FixtureDir::new();
    dir.write("widgets.yml", "- _id: 1\n");
    dir.write("widgets.JSON", "[{\"_id\": 1}]");
    std::fs::create_dir(dir.path().join("widgets.json")).unwrap();

    let db = dir
        .fixture()
        .setup(&Markers::new().collection("widgets"))
        .await
        .unwrap();
    assert!(db.list_collection_names().is_empty());
}

#[tokio::test]
async fn setups_are_isolated_from_each_other() {
    let dir = FixtureDir::new();
    dir.write("widgets.json", WIDGETS_JSON);
    let fixture = dir.fixture();
    let markers = Markers::new().collection("widgets");

    let first = fixture.setup(&markers).await.unwrap();
    first
        .collection("widgets")
        .delete_many((), ())
        .await
        .unwrap();
    let second = fixture.setup(&markers).await.unwrap();
    assert_eq!(count(&first, "widgets").await, 0);
    assert_eq!(count(&second, "widgets").await, 3);
}

#[tokio::test]
async fn environment_overrides_fixture_dir() {
    let dir = FixtureDir::new();
    dir.write("gadgets.yaml", "- _id: g1\n- _id: g2\n");
    std::env::set_var(mockmongo_fixture::FIXTURE_DIR_ENV, dir.path());
    let options = RuntimeOptions::from_env();
    std::env::remove_var(mockmongo_fixture::FIXTURE_DIR_ENV);

    let config = FixtureConfig::default().with_fixture_dir("/no/such/fixture/dir");
    let db = mockmongo::async_mongodb(&config, &options, &Markers::new().collection("gadgets"))
        .await
        .unwrap();
    assert_eq!(count(&db, "gadgets").await, 2);
}
