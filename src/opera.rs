use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SourceNotFound;
use crate::record::BookmarkRecord;

/// Named root collections of the Chromium-style Bookmarks document.
const ROOT_KEYS: [&str; 3] = ["bookmark_bar", "other", "synced"];

/// Reads all bookmarks from Opera's JSON Bookmarks file, or fails with
/// a not-found error when the profile or the file is missing.
pub fn extract_opera_bookmarks() -> Result<Vec<BookmarkRecord>> {
    let profile = opera_profile_dir()?;
    let bookmarks_file = profile.join("Bookmarks");
    if !bookmarks_file.exists() {
        return Err(SourceNotFound::new("Opera", "Bookmarks file not found").into());
    }
    debug!("reading Opera bookmarks from {}", bookmarks_file.display());
    read_bookmarks_json(&bookmarks_file)
}

pub fn read_bookmarks_json(path: &Path) -> Result<Vec<BookmarkRecord>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let json: Value = serde_json::from_str(&data)
        .with_context(|| format!("malformed Bookmarks file {}", path.display()))?;

    let mut records = Vec::new();
    if let Some(roots) = json.get("roots") {
        for key in ROOT_KEYS {
            if let Some(root) = roots.get(key) {
                // The root's display name opens the folder path.
                let name = root.get("name").and_then(Value::as_str).unwrap_or(key);
                collect_children(root, &[name.to_string()], &mut records);
            }
        }
    }

    debug!("read {} bookmarks from Opera file", records.len());
    Ok(records)
}

/// Recursive descent over the bookmark tree: "url" children are leaf
/// records, "folder" children extend the path.
fn collect_children(node: &Value, path: &[String], records: &mut Vec<BookmarkRecord>) {
    let Some(children) = node.get("children").and_then(Value::as_array) else {
        return;
    };
    for child in children {
        match child.get("type").and_then(Value::as_str) {
            Some("url") => {
                let title = child.get("name").and_then(Value::as_str).unwrap_or_default();
                let url = child.get("url").and_then(Value::as_str).map(str::to_string);
                let add_date = child
                    .get("date_added")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                records.push(BookmarkRecord::new(title, url, path.to_vec(), add_date));
            }
            Some("folder") => {
                let mut next = path.to_vec();
                next.push(
                    child
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                );
                collect_children(child, &next, records);
            }
            _ => {}
        }
    }
}

fn opera_profile_dir() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir()
            .ok_or_else(|| SourceNotFound::new("Opera", "no config directory"))?;
        Ok(base.join("Opera Software").join("Opera GX Stable"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = dirs::home_dir()
            .ok_or_else(|| SourceNotFound::new("Opera", "no home directory"))?;
        Ok(home.join("Library/Application Support/com.operasoftware.OperaGX"))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        let home = dirs::home_dir()
            .ok_or_else(|| SourceNotFound::new("Opera", "no home directory"))?;
        let base = home.join(".config/opera");
        if base.join("Bookmarks").exists() {
            Ok(base)
        } else {
            Ok(home.join(".config/opera-gx"))
        }
    }
}
