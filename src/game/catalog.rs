use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::GameError;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Environment variable naming a replacement catalog file.
pub const CATALOG_ENV_VAR: &str = "CONCENTRATION_CATALOG";

/// One image + identity pairing available for placement on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "imgSource")]
    pub image_source: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(image_source: impl Into<String>, name: impl Into<String>) -> Self {
        CatalogEntry {
            image_source: image_source.into(),
            name: name.into(),
        }
    }
}

/// Ordered, read-only list of entries the board builder draws pairs from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, GameError> {
        if entries.is_empty() {
            return Err(GameError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.is_empty() || !seen.insert(entry.name.as_str()) {
                return Err(GameError::DuplicateCatalogName(entry.name.clone()));
            }
        }
        Ok(Catalog { entries })
    }

    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
        Self::new(entries)
    }

    pub fn from_path(path: &Path) -> Result<Self, GameError> {
        let raw = fs::read_to_string(path).map_err(|source| GameError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CATALOG).expect("embedded catalog is valid")
    }

    /// Loads the catalog named by `CONCENTRATION_CATALOG`, or the built-in one when unset.
    pub fn load() -> Result<Self, GameError> {
        Self::load_from(std::env::var_os(CATALOG_ENV_VAR).as_deref())
    }

    pub fn load_from(path: Option<&OsStr>) -> Result<Self, GameError> {
        match path {
            Some(path) => {
                let catalog = Self::from_path(Path::new(path))?;
                tracing::info!(?path, entries = catalog.len(), "loaded catalog override");
                Ok(catalog)
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_six_ordered_entries() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.entries()[0], CatalogEntry::new("assets/1.png", "1"));
        assert_eq!(catalog.entries()[5].name, "6");
    }

    #[test]
    fn parses_source_field_names() {
        let raw = r#"[{"imgSource": "a.png", "name": "a"}, {"imgSource": "b.png", "name": "b"}]"#;
        let catalog = Catalog::from_json(raw).unwrap();
        assert_eq!(catalog.entries()[1].image_source, "b.png");
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Catalog::new(vec![
            CatalogEntry::new("a.png", "x"),
            CatalogEntry::new("b.png", "x"),
        ])
        .unwrap_err();
        assert!(matches!(err, GameError::DuplicateCatalogName(name) if name == "x"));
    }

    #[test]
    fn rejects_empty_and_malformed_input() {
        assert!(matches!(Catalog::from_json("[]"), Err(GameError::EmptyCatalog)));
        assert!(matches!(
            Catalog::from_json(r#"[{"name": "a"}]"#),
            Err(GameError::CatalogParse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::from_path(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, GameError::CatalogIo { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }

    #[test]
    fn override_file_replaces_builtin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[
                {"imgSource": "cards/cat.png", "name": "cat"},
                {"imgSource": "cards/dog.png", "name": "dog"}
            ]"#,
        )
        .unwrap();

        let catalog = Catalog::load_from(Some(path.as_os_str())).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0], CatalogEntry::new("cards/cat.png", "cat"));
        assert_eq!(catalog.entries()[1].name, "dog");
    }

    #[test]
    fn no_override_uses_builtin() {
        assert_eq!(Catalog::load_from(None).unwrap(), Catalog::builtin());
    }

    #[test]
    fn override_with_duplicate_names_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[{"imgSource": "a.png", "name": "same"}, {"imgSource": "b.png", "name": "same"}]"#,
        )
        .unwrap();

        let err = Catalog::load_from(Some(path.as_os_str())).unwrap_err();
        assert!(matches!(err, GameError::DuplicateCatalogName(name) if name == "same"));

        fs::write(&path, "[]").unwrap();
        assert!(matches!(
            Catalog::load_from(Some(path.as_os_str())),
            Err(GameError::EmptyCatalog)
        ));
    }
}
