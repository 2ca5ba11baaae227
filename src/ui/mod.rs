pub mod app;
mod board;
mod hud;
mod scheduler;
mod state;

pub use app::run;
