//! Entries — the encyclopedia's flat-file markdown store
//!
//! Each entry is `<entries_dir>/<title>.md`. Titles are case-preserving on disk
//! and unique under case-insensitive comparison.

pub mod file_ops;
pub mod search;
pub mod store;

pub use search::SearchOutcome;
pub use store::{EntryError, EntryStore, EntrySummary};
