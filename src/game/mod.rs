//! Headless memory-matching game: board building, click rules, timer and
//! end-of-game summary, all driven through the [`surface`] capabilities.

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod headless;
pub mod session;
pub mod state;
pub mod surface;
pub mod timer;

pub use catalog::{Catalog, CatalogEntry};
pub use config::{GridSize, Timings};
pub use error::GameError;
pub use session::{ClickOutcome, Session};
pub use state::{Card, CardStatus, GameState};
pub use surface::{CardHandle, Deferred, Region, Scheduler, Surface, TimerId};
