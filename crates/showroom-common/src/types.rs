//! Entity kinds and the service category table.
//!
//! Entity kinds fix the storage prefix and the wording used in responses.
//! [`CategoryFolders`] maps a service category onto the folder its images
//! live under.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of catalogue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Homepage banner.
    Banner,
    /// Client logo with a website link.
    Client,
    /// Service offering, grouped by category.
    Service,
}

impl EntityKind {
    /// Top-level storage folder and table name.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Banner => "banners",
            Self::Client => "clients",
            Self::Service => "services",
        }
    }

    /// Capitalized name used in response messages ("Banner deleted successfully").
    pub fn title(&self) -> &'static str {
        match self {
            Self::Banner => "Banner",
            Self::Client => "Client",
            Self::Service => "Service",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Banner => write!(f, "banner"),
            Self::Client => write!(f, "client"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// Folder used for categories missing from the table.
pub const DEFAULT_CATEGORY_FOLDER: &str = "others";

/// The showroom's service categories and their storage folders.
const SHOWROOM_CATEGORIES: &[(&str, &str)] = &[
    ("Knit Showroom", "ks"),
    ("Woven Showroom", "ws"),
    ("Sample Section", "ss"),
    ("Merchandising", "m"),
];

/// Lookup table from service category to storage folder.
///
/// Built once at startup and shared read-only. Lookups are exact and
/// case-sensitive; anything unknown falls back to the default folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFolders {
    entries: Vec<(String, String)>,
    default_folder: String,
}

impl CategoryFolders {
    /// Build a table from explicit entries and a fallback folder.
    pub fn new<I, K, V>(entries: I, default_folder: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            default_folder: default_folder.into(),
        }
    }

    /// Folder for `category`, or the default folder when it is not listed.
    pub fn folder_for(&self, category: &str) -> &str {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, folder)| folder.as_str())
            .unwrap_or(&self.default_folder)
    }

    /// The fallback folder.
    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Known category names in table order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Default for CategoryFolders {
    fn default() -> Self {
        Self::new(
            SHOWROOM_CATEGORIES.iter().copied(),
            DEFAULT_CATEGORY_FOLDER,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_prefix() {
        assert_eq!(EntityKind::Banner.prefix(), "banners");
        assert_eq!(EntityKind::Client.prefix(), "clients");
        assert_eq!(EntityKind::Service.prefix(), "services");
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(EntityKind::Banner.to_string(), "banner");
        assert_eq!(EntityKind::Client.title(), "Client");
    }

    #[test]
    fn test_entity_serde() {
        let json = serde_json::to_string(&EntityKind::Service).unwrap();
        assert_eq!(json, "\"service\"");
        let kind: EntityKind = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(kind, EntityKind::Client);
    }

    #[test]
    fn test_known_categories() {
        let folders = CategoryFolders::default();
        assert_eq!(folders.folder_for("Knit Showroom"), "ks");
        assert_eq!(folders.folder_for("Woven Showroom"), "ws");
        assert_eq!(folders.folder_for("Sample Section"), "ss");
        assert_eq!(folders.folder_for("Merchandising"), "m");
    }

    #[test]
    fn test_unknown_category_goes_to_others() {
        let folders = CategoryFolders::default();
        assert_eq!(folders.folder_for("Printing"), "others");
        assert_eq!(folders.folder_for(""), "others");
        // Lookup is case-sensitive.
        assert_eq!(folders.folder_for("knit showroom"), "others");
        // Deterministic across calls.
        assert_eq!(folders.folder_for("Printing"), folders.folder_for("Printing"));
    }

    #[test]
    fn test_custom_table() {
        let folders = CategoryFolders::new([("Denim", "dn")], "misc");
        assert_eq!(folders.folder_for("Denim"), "dn");
        assert_eq!(folders.folder_for("Knit Showroom"), "misc");
        assert_eq!(folders.default_folder(), "misc");
    }

    #[test]
    fn test_categories_in_order() {
        let folders = CategoryFolders::default();
        let names: Vec<_> = folders.categories().collect();
        assert_eq!(
            names,
            vec!["Knit Showroom", "Woven Showroom", "Sample Section", "Merchandising"]
        );
    }
}
