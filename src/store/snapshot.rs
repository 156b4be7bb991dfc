use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

use super::document::MemoryStore;
use super::profiles::ProfileDirectory;

pub fn load_snapshot(path: &Path) -> Result<(MemoryStore, ProfileDirectory)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read store snapshot {}", path.display()))?;
    parse_snapshot(&raw).with_context(|| format!("failed to parse store snapshot {}", path.display()))
}

/// Parses `{"users": {"<id>": {"name", "icon", "friends": {...}}}}`.
///
/// `friends` may be an object keyed by friend id (the sub-collection shape)
/// or a plain array of ids. Entries that don't fit are skipped.
pub fn parse_snapshot(raw: &str) -> Result<(MemoryStore, ProfileDirectory)> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in store snapshot")?;
    let users = parsed
        .get("users")
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow!("store snapshot has no `users` object"))?;

    let mut store = MemoryStore::new();
    let mut profiles = ProfileDirectory::new();

    for (user_id, document) in users {
        if user_id.is_empty() {
            log::warn!("skipping user document with empty id");
            continue;
        }
        let Some(document) = document.as_object() else {
            log::warn!("skipping user document {user_id}: not an object");
            continue;
        };

        store.insert_user(user_id.as_str());
        profiles.insert(
            user_id.as_str(),
            string_field(document, "name"),
            string_field(document, "icon"),
        );

        for friend_id in friend_ids(user_id, document.get("friends")) {
            store.insert_friend(user_id.as_str(), friend_id);
        }
    }

    if store.user_count() == 0 {
        log::warn!("store snapshot contains no users");
    }

    Ok((store, profiles))
}

fn string_field(document: &Map<String, Value>, key: &str) -> Option<String> {
    document.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn friend_ids(user_id: &str, friends: Option<&Value>) -> Vec<String> {
    let ids = match friends {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Object(entries)) => entries.keys().cloned().collect::<Vec<_>>(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| {
                let id = entry.as_str();
                if id.is_none() {
                    log::warn!("skipping non-string friend entry of {user_id}: {entry}");
                }
                id.map(str::to_owned)
            })
            .collect(),
        Some(other) => {
            log::warn!("ignoring friends of {user_id}: unexpected value {other}");
            return Vec::new();
        }
    };

    ids.into_iter().filter(|id| !id.is_empty()).collect()
}
