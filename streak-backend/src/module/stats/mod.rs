///! Contribution statistics
///!
///! Pure functions over the contribution calendar and the repository
///! language listing. Nothing here reads the clock or performs I/O.

pub mod languages;
pub mod streak;
pub mod window;

pub use languages::{aggregate_all_languages, aggregate_languages, LanguageTally, DEFAULT_TOP_LANGUAGES};
pub use streak::compute_streaks;
pub use window::{recent_window, DEFAULT_WINDOW_DAYS};
