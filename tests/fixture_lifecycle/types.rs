//! Extended types through the fixture path

use crate::common::*;
use chrono::{TimeZone, Utc};
use mockmongo::ObjectId;

#[tokio::test]
async fn datetime_round_trips_through_json_fixture() {
    let at = Utc.timestamp_millis_opt(1_600_000_000_123).unwrap();
    let dir = FixtureDir::new();
    dir.write_json(
        "events.json",
        &[doc! { "_id" => 1, "at" => at }, doc! { "_id" => 2, "at" => Value::Null }],
    );

    let db = dir
        .fixture()
        .setup(&Markers::new().collection("events"))
        .await
        .unwrap();
    let found = db
        .collection("events")
        .find_one(doc! { "at" => at })
        .await
        .unwrap()
        .expect("event by date");
    assert_eq!(found.id(), Some(&Value::Int(1)));
    assert_eq!(found.get("at"), Some(&Value::DateTime(at)));
}

#[tokio::test]
async fn object_ids_from_json_fixture_are_queryable() {
    let id = ObjectId::new();
    let dir = FixtureDir::new();
    dir.write(
        "users.json",
        &format!(r#"[{{"_id": {{"$oid": "{}"}}, "name": "ada"}}]"#, id.to_hex()),
    );

    let db = dir
        .fixture()
        .setup(&Markers::new().collection("users"))
        .await
        .unwrap();
    let user = db.collection("users").find_one(id).await.unwrap().expect("user");
    assert_eq!(user.get("name"), Some(&Value::from("ada")));
}

#[tokio::test]
async fn yaml_fixture_keeps_wrapper_documents_plain() {
    let dir = FixtureDir::new();
    dir.write("events.yaml", "- _id: 1\n  at:\n    $date: 1600000000123\n");

    let db = dir
        .fixture()
        .setup(&Markers::new().collection("events"))
        .await
        .unwrap();
    let event = db.collection("events").find_one(1).await.unwrap().unwrap();
    assert_eq!(
        event.get("at"),
        Some(&Value::from(doc! { "$date" => 1_600_000_000_123i64 }))
    );
}

#[tokio::test]
async fn documents_without_id_get_object_ids() {
    let dir = FixtureDir::new();
    dir.write("notes.yaml", "- text: a\n- text: b\n");

    let db = dir
        .fixture()
        .setup(&Markers::new().collection("notes"))
        .await
        .unwrap();
    let mut cursor = db.collection("notes").find(()).await.unwrap();
    let first = cursor.next().unwrap();
    assert!(matches!(first.id(), Some(Value::ObjectId(_))));
    assert_eq!(first.get("text"), Some(&Value::from("a")));
    assert_eq!(cursor.count(), 1);
}
