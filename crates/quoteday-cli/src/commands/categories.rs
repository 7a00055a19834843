use std::path::Path;

use quoteday_core::models::ALL_CATEGORIES;

use crate::commands::common::{format_category_lines, open_book, CategoryItem};
use crate::error::CliError;

pub fn run_categories(as_json: bool, state_path: &Path) -> Result<(), CliError> {
    let book = open_book(state_path)?;
    let selected = book.selected_category()?;
    let store = book.store();

    let mut items = vec![CategoryItem {
        name: ALL_CATEGORIES.to_string(),
        count: store.len(),
        selected: selected == ALL_CATEGORIES,
    }];
    items.extend(store.categories().into_iter().map(|name| CategoryItem {
        count: store.filter_by_category(&name).len(),
        selected: name == selected,
        name,
    }));

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_category_lines(&items) {
            println!("{line}");
        }
    }

    Ok(())
}
