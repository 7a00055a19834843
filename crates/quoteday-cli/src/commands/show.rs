use std::path::Path;

use quoteday_core::Error;

use crate::commands::common::open_book;
use crate::error::CliError;

pub fn run_show(category: Option<&str>, last: bool, state_path: &Path) -> Result<(), CliError> {
    let mut book = open_book(state_path)?;

    if last {
        match book.last_viewed_quote() {
            Some(text) => println!("\"{text}\""),
            None => println!("No quote viewed yet."),
        }
        return Ok(());
    }

    let category = match category {
        Some(category) => category.to_string(),
        None => book.selected_category()?,
    };
    match book.random_quote(&category, &mut rand::thread_rng()) {
        Ok(quote) => {
            println!("\"{}\"", quote.text);
            println!("  - {}", quote.category);
            Ok(())
        }
        Err(Error::EmptySet) => {
            println!("{}", Error::EmptySet);
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
