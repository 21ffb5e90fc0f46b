pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lanes;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use lanes::{pack_bars, pack_bars_by_start, Bar, Placement};
pub use state::AppState;
pub use storage::load_data;
