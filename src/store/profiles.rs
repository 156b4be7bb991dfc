use std::collections::HashMap;

use crate::util::id_suffix;

pub const DEFAULT_ICON: &str = "person.crop.circle";
const PLACEHOLDER_SUFFIX_LEN: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub icon: String,
}

impl Profile {
    pub fn placeholder(id: &str) -> Self {
        Self {
            name: format!("User {}", id_suffix(id, PLACEHOLDER_SUFFIX_LEN)),
            icon: DEFAULT_ICON.to_owned(),
        }
    }
}

/// Display metadata keyed by user id. Lookups never fail: unknown ids
/// resolve to a placeholder.
#[derive(Clone, Debug, Default)]
pub struct ProfileDirectory {
    profiles: HashMap<String, Profile>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: Option<String>, icon: Option<String>) {
        let id = id.into();
        let fallback = Profile::placeholder(&id);
        let name = name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(fallback.name);
        let icon = icon
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or(fallback.icon);
        self.profiles.insert(id, Profile { name, icon });
    }

    pub fn resolve(&self, id: &str) -> Profile {
        self.profiles
            .get(id)
            .cloned()
            .unwrap_or_else(|| Profile::placeholder(id))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_fall_back_to_placeholder() {
        let directory = ProfileDirectory::new();
        let profile = directory.resolve("a1b2c3d4e5");
        assert_eq!(profile.name, "User d4e5");
        assert_eq!(profile.icon, DEFAULT_ICON);
    }

    #[test]
    fn blank_fields_are_filled_per_field() {
        let mut directory = ProfileDirectory::new();
        directory.insert("U1", Some("Ada".to_owned()), Some("  ".to_owned()));
        directory.insert("U2", None, Some("https://cdn/u2.png".to_owned()));

        assert_eq!(
            directory.resolve("U1"),
            Profile {
                name: "Ada".to_owned(),
                icon: DEFAULT_ICON.to_owned()
            }
        );
        assert_eq!(directory.resolve("U2").name, "User U2");
        assert_eq!(directory.resolve("U2").icon, "https://cdn/u2.png");
        assert_eq!(directory.len(), 2);
    }
}
