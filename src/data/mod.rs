//! Market data sources for the environment.

pub mod loader;
pub mod sample;

pub use loader::{load_bars_from_csv, load_price_series, parse_bars, parse_date};
pub use sample::generate_sample_bars;
