//! Collection and database facade behaviour as seen by a test

use crate::common::*;
use std::sync::Arc;

#[tokio::test]
async fn find_one_on_empty_collection_is_none() {
    let db = fresh_db();
    let widgets = db.collection("widgets");
    assert!(widgets.find_one(doc! { "name" => "bolt" }).await.unwrap().is_none());
    assert!(widgets.find_one(()).await.unwrap().is_none());
    assert!(widgets.find_one(1).await.unwrap().is_none());
}

#[tokio::test]
async fn find_one_with_bare_value_matches_id() {
    let dir = FixtureDir::new();
    dir.write("widgets.json", WIDGETS_JSON);
    let db = dir
        .fixture()
        .setup(&Markers::new().collection("widgets"))
        .await
        .unwrap();
    let widgets = db.collection("widgets");

    for id in 1..=3 {
        let by_value = widgets.find_one(id).await.unwrap();
        let by_filter = widgets.find_one(doc! { "_id" => id }).await.unwrap();
        assert!(by_value.is_some());
        assert_eq!(by_value, by_filter);
    }
}

#[tokio::test]
async fn collection_and_database_handles_are_cached() {
    let client = AsyncClient::new();
    let db = client.database(DATABASE_NAME);
    assert!(Arc::ptr_eq(&db, &client.database(DATABASE_NAME)));
    assert!(Arc::ptr_eq(&db.collection("w"), &db.collection("w")));
}

#[tokio::test]
async fn delete_one_removes_a_single_match() {
    let db = fresh_db();
    let widgets = db.collection("widgets");
    for i in 0..5 {
        widgets
            .insert_one(doc! { "_id" => i, "kind" => "bolt" })
            .await
            .unwrap();
    }

    let result = widgets.delete_one(doc! { "kind" => "bolt" }, ()).await.unwrap();
    let raw = result.raw_result();
    assert_eq!(raw.n, 1);
    assert_eq!(raw.ok, 1.0);
    assert_eq!(raw.err, None);
    assert_eq!(result.deleted_count(), 1);
    assert_eq!(count(&db, "widgets").await, 4);
}

#[tokio::test]
async fn delete_result_serialises_with_wire_names() {
    let db = fresh_db();
    let widgets = db.collection("widgets");
    widgets.insert_one(doc! { "_id" => 1 }).await.unwrap();
    let result = widgets.delete_one(1, ()).await.unwrap();

    let json = serde_json::to_value(result.raw_result()).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["connectionId", "n", "ok", "err"]);
}

#[tokio::test]
async fn unsupported_delete_options_leave_data_untouched() {
    let db = fresh_db();
    let widgets = db.collection("widgets");
    widgets.insert_one(doc! { "_id" => 1 }).await.unwrap();

    let options = [
        DeleteOptions::new().with_hint(doc! { "_id" => 1 }),
        DeleteOptions::new().with_collation(doc! { "locale" => "en", "strength" => 2 }),
        DeleteOptions::new().with_session(mockmongo::ClientSession::new()),
    ];
    for option in options {
        let err = widgets.delete_one(1, option.clone()).await.unwrap_err();
        assert!(err.is_not_implemented(), "{:?} gave {:?}", option, err);
        let err = widgets.delete_many((), option).await.unwrap_err();
        assert!(err.is_not_implemented());
    }
    assert_eq!(count(&db, "widgets").await, 1);
}

#[tokio::test]
async fn delete_many_empties_the_match_set() {
    let db = fresh_db();
    let widgets = db.collection("widgets");
    for i in 0..4 {
        widgets.insert_one(doc! { "_id" => i, "qty" => i * 10 }).await.unwrap();
    }
    let result = widgets
        .delete_many(doc! { "qty" => doc! { "$gte" => 20 } }, ())
        .await
        .unwrap();
    assert_eq!(result.deleted_count(), 2);
    assert_eq!(count(&db, "widgets").await, 2);
}
