use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the game core.
///
/// Stale clicks and stale timer callbacks are not errors; they are ignored.
#[derive(Debug, Error)]
pub enum GameError {
    /// Grid selection did not match `RxC` with positive integers.
    #[error("invalid grid size {0:?}, expected ROWSxCOLUMNS")]
    InvalidGridSize(String),
    /// Cards come in pairs, so the grid must hold an even number of cells.
    #[error("a {rows}x{columns} grid holds an odd number of cards")]
    OddCardCount { rows: u32, columns: u32 },
    #[error("insufficient catalog entries: need {needed} pairs, catalog has {available}")]
    InsufficientCatalog { needed: usize, available: usize },
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("catalog entry name {0:?} is empty or duplicated")]
    DuplicateCatalogName(String),
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),
    #[error("failed to read catalog at {path:?}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
