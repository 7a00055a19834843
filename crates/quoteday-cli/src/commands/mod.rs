pub mod add;
pub mod categories;
pub mod common;
pub mod completions;
pub mod config;
pub mod conflicts;
pub mod export;
pub mod filter;
pub mod import;
pub mod show;
pub mod sync;
pub mod watch;
