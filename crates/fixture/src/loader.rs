//! Fixture discovery and loading
//!
//! A fixture directory holds files named `<collection>.<format>`. For a
//! requested set of collections, every file in the directory (not
//! recursive, in file name order) whose stem is requested and whose
//! extension is a supported format is loaded into the collection of that
//! name, unless the collection already exists. Existing collections are
//! never re-seeded.

use std::path::{Path, PathBuf};

use mockmongo_api::AsyncDatabase;
use tracing::{debug, info, warn};

use crate::cache::FixtureCache;
use crate::error::{FixtureError, FixtureResult};
use crate::format::FixtureFormat;
use crate::markers::CollectionSelection;

/// Drop every collection in `db`; returns how many were dropped
pub async fn clean_database(db: &AsyncDatabase) -> usize {
    let names = db.list_collection_names();
    for name in &names {
        db.drop_collection(name);
    }
    if !names.is_empty() {
        debug!(target: "mockmongo::fixture", database = db.name(), count = names.len(), "Database cleaned");
    }
    names.len()
}

/// Load the fixtures in `dir` for the selected collections
///
/// Returns the number of collections seeded. Without a selection, or with
/// an empty one, nothing is read at all.
///
/// # Errors
/// - `FixtureError::Io` if the directory or a fixture file can't be read
/// - `FixtureError::Parse` / `Invalid` for a malformed fixture file
/// - `FixtureError::Database` if inserting a document fails
pub async fn load_fixtures(
    db: &AsyncDatabase,
    dir: &Path,
    selection: Option<&CollectionSelection>,
    cache: &FixtureCache,
) -> FixtureResult<usize> {
    let selection = match selection {
        Some(selection) if !selection.is_empty() => selection,
        _ => return Ok(0),
    };

    let mut loaded = 0;
    for path in list_files(dir)? {
        let (collection, format) = match fixture_name(&path) {
            Some(parts) => parts,
            None => continue,
        };
        if !selection.contains(collection) {
            continue;
        }
        if db.list_collection_names().iter().any(|name| name == collection) {
            debug!(target: "mockmongo::fixture", collection, path = ?path, "Collection exists, fixture skipped");
            continue;
        }
        load_fixture(db, collection, &path, format, cache).await?;
        loaded += 1;
    }
    Ok(loaded)
}

/// Insert the documents of one fixture file into `collection`
///
/// The file is parsed through `cache`, so a path is read at most once per
/// cache, whichever collection it is loaded into. Documents are inserted
/// in file order; returns how many were inserted.
pub async fn load_fixture(
    db: &AsyncDatabase,
    collection: &str,
    path: &Path,
    format: FixtureFormat,
    cache: &FixtureCache,
) -> FixtureResult<usize> {
    let documents = cache.get_or_load(path, |canonical| format.read(canonical))?;
    let target = db.collection(collection);
    for document in documents.iter() {
        target.insert_one(document.clone()).await?;
    }
    info!(
        target: "mockmongo::fixture",
        collection,
        path = ?path,
        %format,
        count = documents.len(),
        "Fixture loaded"
    );
    Ok(documents.len())
}

/// Regular files in `dir`, sorted by name
fn list_files(dir: &Path) -> FixtureResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| FixtureError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FixtureError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Collection name and format of a fixture file, if it is one
fn fixture_name(path: &Path) -> Option<(&str, FixtureFormat)> {
    let format = FixtureFormat::from_extension(path.extension()?.to_str()?)?;
    match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => Some((stem, format)),
        None => {
            warn!(target: "mockmongo::fixture", path = ?path, "Fixture file name is not valid UTF-8, skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockmongo_api::AsyncClient;
    use mockmongo_core::{doc, Value};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn database() -> Arc<AsyncDatabase> {
        AsyncClient::new().database("pytest")
    }

    fn fixture_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn only(name: &str) -> CollectionSelection {
        CollectionSelection::Single(name.to_string())
    }

    #[test]
    fn test_fixture_name() {
        assert_eq!(
            fixture_name(Path::new("/f/widgets.json")),
            Some(("widgets", FixtureFormat::Json))
        );
        assert_eq!(
            fixture_name(Path::new("/f/a.b.yaml")),
            Some(("a.b", FixtureFormat::Yaml))
        );
        assert_eq!(fixture_name(Path::new("/f/widgets.yml")), None);
        assert_eq!(fixture_name(Path::new("/f/widgets.JSON")), None);
        assert_eq!(fixture_name(Path::new("/f/.json")), None);
        assert_eq!(fixture_name(Path::new("/f/widgets")), None);
    }

    #[tokio::test]
    async fn test_loads_selected_collections_only() {
        let dir = fixture_dir(&[
            ("widgets.json", r#"[{"_id": 1}, {"_id": 2}]"#),
            ("gadgets.yaml", "- _id: 1\n"),
            ("notes.txt", "ignored"),
        ]);
        let db = database();
        let cache = FixtureCache::new();

        let loaded = load_fixtures(&db, dir.path(), Some(&only("widgets")), &cache)
            .await
            .unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(db.list_collection_names(), vec!["widgets".to_string()]);
        assert_eq!(db.collection("widgets").count_documents(()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_first_format_wins_for_a_collection() {
        let dir = fixture_dir(&[
            ("widgets.json", r#"[{"_id": 1}]"#),
            ("widgets.yaml", "- _id: 2\n"),
        ]);
        let db = database();
        let selection = CollectionSelection::Set(["widgets".to_string()].into_iter().collect());

        // json sorts first; the yaml file then finds the collection present
        load_fixtures(&db, dir.path(), Some(&selection), &FixtureCache::new())
            .await
            .unwrap();
        let widgets = db.collection("widgets");
        assert_eq!(widgets.count_documents(()).await.unwrap(), 1);
        assert!(widgets.find_one(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_existing_collection_is_not_reseeded() {
        let dir = fixture_dir(&[("widgets.json", r#"[{"_id": 1}, {"_id": 2}]"#)]);
        let db = database();
        db.collection("widgets").insert_one(doc! { "_id" => "seed" }).await.unwrap();

        let loaded = load_fixtures(&db, dir.path(), Some(&only("widgets")), &FixtureCache::new())
            .await
            .unwrap();
        assert_eq!(loaded, 0);
        assert_eq!(db.collection("widgets").count_documents(()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_selection_reads_nothing() {
        let db = database();
        let missing = Path::new("/definitely/not/a/fixture/dir");
        let cache = FixtureCache::new();

        assert_eq!(load_fixtures(&db, missing, None, &cache).await.unwrap(), 0);
        let empty = CollectionSelection::Set(Default::default());
        assert_eq!(load_fixtures(&db, missing, Some(&empty), &cache).await.unwrap(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let db = database();
        let err = load_fixtures(
            &db,
            Path::new("/definitely/not/a/fixture/dir"),
            Some(&only("widgets")),
            &FixtureCache::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }

    #[tokio::test]
    async fn test_malformed_fixture_names_the_file() {
        let dir = fixture_dir(&[("widgets.json", "[{")]);
        let err = load_fixtures(&database(), dir.path(), Some(&only("widgets")), &FixtureCache::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
        assert!(err.to_string().contains("widgets.json"));
    }

    #[tokio::test]
    async fn test_duplicate_id_in_file_is_database_error() {
        let dir = fixture_dir(&[("widgets.json", r#"[{"_id": 1}, {"_id": 1}]"#)]);
        let err = load_fixtures(&database(), dir.path(), Some(&only("widgets")), &FixtureCache::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FixtureError::Database(_)));
    }

    #[tokio::test]
    async fn test_same_path_under_two_names_shares_the_parse() {
        let dir = fixture_dir(&[("widgets.json", r#"[{"_id": 1, "kind": "bolt"}]"#)]);
        let path = dir.path().join("widgets.json");
        let db = database();
        let cache = FixtureCache::new();

        load_fixture(&db, "widgets", &path, FixtureFormat::Json, &cache).await.unwrap();
        // a different format argument does not matter once the path is cached
        load_fixture(&db, "copies", &path, FixtureFormat::Yaml, &cache).await.unwrap();
        assert_eq!(cache.misses(), 1);
        let copy = db.collection("copies").find_one(1).await.unwrap().unwrap();
        assert_eq!(copy.get("kind"), Some(&Value::from("bolt")));
    }

    #[tokio::test]
    async fn test_clean_database_drops_everything() {
        let db = database();
        db.collection("a").insert_one(doc! { "_id" => 1 }).await.unwrap();
        db.collection("b").insert_one(doc! { "_id" => 1 }).await.unwrap();
        assert_eq!(clean_database(&db).await, 2);
        assert!(db.list_collection_names().is_empty());
        assert_eq!(clean_database(&db).await, 0);
    }
}
