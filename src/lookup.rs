//! Realm and class directories.
//!
//! Read-only lookup tables populated by the surrounding application (the
//! realm list and class table are loaded out-of-band); the importer only
//! resolves against them.

use std::collections::HashMap;

/// Realm slug → display name.
#[derive(Debug, Clone, Default)]
pub struct RealmDirectory {
    realms: HashMap<String, String>,
}

impl RealmDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a realm.
    pub fn insert(&mut self, slug: impl Into<String>, name: impl Into<String>) {
        self.realms.insert(slug.into(), name.into());
    }

    /// Resolves a slug to its display name.
    pub fn resolve(&self, slug: &str) -> Option<&str> {
        self.realms.get(slug).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for RealmDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        RealmDirectory {
            realms: iter.into_iter().collect(),
        }
    }
}

/// Numeric class id → class name.
#[derive(Debug, Clone, Default)]
pub struct ClassDirectory {
    classes: HashMap<u64, String>,
}

impl ClassDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a class.
    pub fn insert(&mut self, id: u64, name: impl Into<String>) {
        self.classes.insert(id, name.into());
    }

    /// Resolves a class id to its name.
    pub fn resolve(&self, id: u64) -> Option<&str> {
        self.classes.get(&id).map(String::as_str)
    }
}

impl FromIterator<(u64, String)> for ClassDirectory {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        ClassDirectory {
            classes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realm_resolution() {
        let mut realms = RealmDirectory::new();
        realms.insert("argent-dawn", "Argent Dawn");
        assert_eq!(realms.resolve("argent-dawn"), Some("Argent Dawn"));
        assert_eq!(realms.resolve("nonexistent"), None);
    }

    #[test]
    fn test_class_resolution() {
        let classes: ClassDirectory = [(8, "Mage".to_string()), (2, "Paladin".to_string())]
            .into_iter()
            .collect();
        assert_eq!(classes.resolve(8), Some("Mage"));
        assert_eq!(classes.resolve(2), Some("Paladin"));
        assert_eq!(classes.resolve(99), None);
    }
}
