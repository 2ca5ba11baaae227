pub mod game;
#[cfg(feature = "ui")]
pub mod ui;
