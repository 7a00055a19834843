use std::path::{Path, PathBuf};

use quoteday_core::transfer::EXPORT_FILE_NAME;

use crate::commands::common::open_book;
use crate::error::CliError;

pub fn run_export(output_path: Option<&Path>, state_path: &Path) -> Result<(), CliError> {
    let book = open_book(state_path)?;
    let rendered = book.export_json()?;

    if let Some(path) = output_path {
        let path = export_target(path);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// Directories receive the default export file name
pub fn export_target(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(EXPORT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
