pub mod entries_api;
pub mod health;
pub mod wiki;
