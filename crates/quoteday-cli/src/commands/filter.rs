use std::path::Path;

use crate::commands::common::open_book;
use crate::error::CliError;

pub fn run_filter(category: &str, state_path: &Path) -> Result<(), CliError> {
    let mut book = open_book(state_path)?;
    let selected = book.select_category(category)?;
    println!("Showing quotes from: {selected}");
    Ok(())
}
