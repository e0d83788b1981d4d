use anyhow::{Context, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SourceNotFound;
use crate::record::BookmarkRecord;

/// Parent walks stop after this many hops. Malformed places databases
/// can contain folder cycles; the path is truncated instead of hanging.
const MAX_FOLDER_DEPTH: usize = 64;

struct Folder {
    parent: i64,
    title: String,
}

/// Reads all bookmarks from the default Firefox profile's places
/// database, or fails with a not-found error when the profile or the
/// database is missing.
pub fn extract_firefox_bookmarks() -> Result<Vec<BookmarkRecord>> {
    let profile = find_default_profile()?;
    let db_path = profile.join("places.sqlite");
    if !db_path.exists() {
        return Err(SourceNotFound::new("Firefox", "places.sqlite not found in profile").into());
    }
    debug!("reading Firefox bookmarks from {}", db_path.display());
    read_places_db(&db_path)
}

pub fn read_places_db(db_path: &Path) -> Result<Vec<BookmarkRecord>> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open places database {}", db_path.display()))?;

    // Folder rows first, so every bookmark's path can be resolved by
    // walking parent links up to the root (parent id 0).
    let mut folders: HashMap<i64, Folder> = HashMap::new();
    {
        let mut stmt =
            conn.prepare("SELECT id, parent, title FROM moz_bookmarks WHERE type = 2")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            ))
        })?;
        for row in rows {
            let (id, parent, title) = row?;
            folders.insert(id, Folder { parent, title });
        }
    }

    let mut stmt = conn.prepare(
        "SELECT b.parent, p.url, COALESCE(b.title, p.title), b.dateAdded
         FROM moz_bookmarks b
         JOIN moz_places p ON b.fk = p.id
         WHERE b.type = 1",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<i64>>(3)?,
        ))
    })?;

    let mut bookmarks = Vec::new();
    for row in rows {
        let (parent, url, title, date_added) = row?;
        let folder = folder_path(&folders, parent);
        // dateAdded is a microsecond epoch; the canonical record carries
        // epoch seconds as a decimal string.
        let add_date = date_added
            .filter(|&v| v != 0)
            .map(|v| (v / 1_000_000).to_string())
            .unwrap_or_default();
        bookmarks.push(BookmarkRecord::new(
            title.unwrap_or_default(),
            url,
            folder,
            add_date,
        ));
    }

    debug!("read {} bookmarks from Firefox database", bookmarks.len());
    Ok(bookmarks)
}

fn folder_path(folders: &HashMap<i64, Folder>, start: i64) -> Vec<String> {
    let mut path = Vec::new();
    let mut id = start;
    for _ in 0..MAX_FOLDER_DEPTH {
        let Some(folder) = folders.get(&id) else { break };
        if folder.parent == 0 {
            break;
        }
        path.push(folder.title.clone());
        id = folder.parent;
    }
    path.reverse();
    path
}

fn profiles_ini_path() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let base = dirs::config_dir()
        .ok_or_else(|| SourceNotFound::new("Firefox", "no config directory"))?
        .join("Mozilla")
        .join("Firefox");

    #[cfg(target_os = "macos")]
    let base = dirs::home_dir()
        .ok_or_else(|| SourceNotFound::new("Firefox", "no home directory"))?
        .join("Library/Application Support/Firefox");

    #[cfg(all(unix, not(target_os = "macos")))]
    let base = dirs::home_dir()
        .ok_or_else(|| SourceNotFound::new("Firefox", "no home directory"))?
        .join(".mozilla/firefox");

    Ok(base.join("profiles.ini"))
}

fn find_default_profile() -> Result<PathBuf> {
    let ini_path = profiles_ini_path()?;
    if !ini_path.exists() {
        return Err(SourceNotFound::new("Firefox", "profiles.ini not found").into());
    }
    let content = std::fs::read_to_string(&ini_path)
        .with_context(|| format!("failed to read {}", ini_path.display()))?;

    let Some(profile) = default_profile_from_ini(&content) else {
        return Err(SourceNotFound::new("Firefox", "no default profile in profiles.ini").into());
    };

    if let Some(rest) = profile.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| SourceNotFound::new("Firefox", "no home directory"))?;
        return Ok(home.join(rest));
    }
    match ini_path.parent() {
        Some(base) => Ok(base.join(profile)),
        None => Ok(PathBuf::from(profile)),
    }
}

/// Scans profiles.ini for the section marked `Default=1` and returns
/// its `Path` value.
fn default_profile_from_ini(content: &str) -> Option<String> {
    let mut profile = None;
    let mut current: HashMap<&str, &str> = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('[') {
            if current.get("Default").copied() == Some("1") {
                if let Some(path) = current.get("Path") {
                    profile = Some(path.to_string());
                }
            }
            current.clear();
        } else if let Some((key, value)) = line.split_once('=') {
            current.insert(key.trim(), value.trim());
        }
    }
    // Trailing section has no closing header.
    if current.get("Default").copied() == Some("1") {
        if let Some(path) = current.get("Path") {
            profile = Some(path.to_string());
        }
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_from_ini() {
        let ini = "[Install0000]\n\
Default=abc.default-release\n\
\n\
[Profile1]\n\
Name=old\n\
Path=Profiles/old.default\n\
Default=0\n\
\n\
[Profile0]\n\
Name=default-release\n\
IsRelative=1\n\
Path=Profiles/abc.default-release\n\
Default=1\n";
        assert_eq!(
            default_profile_from_ini(ini).as_deref(),
            Some("Profiles/abc.default-release")
        );
    }

    #[test]
    fn test_ini_without_default_profile() {
        let ini = "[Profile0]\nName=only\nPath=Profiles/only\n";
        assert_eq!(default_profile_from_ini(ini), None);
    }

    #[test]
    fn test_folder_path_walks_to_root() {
        let mut folders = HashMap::new();
        folders.insert(1, Folder { parent: 0, title: String::new() });
        folders.insert(2, Folder { parent: 1, title: "menu".to_string() });
        folders.insert(3, Folder { parent: 2, title: "Work".to_string() });

        assert_eq!(folder_path(&folders, 3), vec!["menu", "Work"]);
        assert!(folder_path(&folders, 1).is_empty());
        assert!(folder_path(&folders, 99).is_empty());
    }

    #[test]
    fn test_folder_path_terminates_on_cycle() {
        let mut folders = HashMap::new();
        folders.insert(5, Folder { parent: 6, title: "a".to_string() });
        folders.insert(6, Folder { parent: 5, title: "b".to_string() });

        let path = folder_path(&folders, 5);
        assert!(path.len() <= MAX_FOLDER_DEPTH);
    }

    #[test]
    fn test_read_places_db() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("places.sqlite");

        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_bookmarks (
                 id INTEGER PRIMARY KEY, type INTEGER, fk INTEGER,
                 parent INTEGER, title TEXT, dateAdded INTEGER
             );
             CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT, title TEXT);

             INSERT INTO moz_bookmarks VALUES (1, 2, NULL, 0, '', NULL);
             INSERT INTO moz_bookmarks VALUES (2, 2, NULL, 1, 'menu', NULL);
             INSERT INTO moz_bookmarks VALUES (3, 2, NULL, 2, 'Work', NULL);

             INSERT INTO moz_places VALUES (10, 'http://a', 'Place A');
             INSERT INTO moz_places VALUES (11, 'http://b', NULL);

             INSERT INTO moz_bookmarks VALUES (20, 1, 10, 3, 'A', 1700000000000000);
             INSERT INTO moz_bookmarks VALUES (21, 1, 11, 2, NULL, NULL);",
        )
        .unwrap();
        drop(conn);

        let mut records = read_places_db(&db_path).unwrap();
        records.sort_by(|a, b| a.url.cmp(&b.url));
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].url.as_deref(), Some("http://a"));
        assert_eq!(records[0].folder, vec!["menu", "Work"]);
        assert_eq!(records[0].add_date, "1700000000");

        // No title anywhere falls back to the URL; no dateAdded stays empty.
        assert_eq!(records[1].title, "http://b");
        assert_eq!(records[1].folder, vec!["menu"]);
        assert_eq!(records[1].add_date, "");
    }

    #[test]
    fn test_missing_database_is_an_error() {
        assert!(read_places_db(Path::new("/nonexistent/places.sqlite")).is_err());
    }
}
