//! Output formatters for scan results.
//!
//! Both formatters take rows that are already flattened, sorted, and filtered
//! (see [`crate::utils::prepare_rows`]) and contain no business logic.
//!
//! # Available Formatters
//!
//! - **Terminal**: `[count][D|F] size path` lines on stdout
//! - **CSV**: machine-readable rows for further processing

pub mod csv;
pub mod terminal;

/// CSV output renderer function.
///
/// See [`csv::render`] for full documentation.
pub use csv::render as render_csv;

/// Terminal output renderer function.
///
/// See [`terminal::render`] for full documentation.
pub use terminal::render as render_terminal;
