//! Spreadsheet word source for Word Hero.
//!
//! Reads every worksheet of an `.xlsx`/`.xls`/`.ods` workbook and turns each
//! data row into a [`NewWord`]. Pure synchronous; callers on an async runtime
//! should run [`read_workbook`] on a blocking thread.
//!
//! Layout: row 0 of each sheet is a header and is skipped. A data row needs
//! at least [`MIN_COLUMNS`] cells; English text is in column
//! [`ENGLISH_COLUMN`] and Chinese text in column [`CHINESE_COLUMN`]
//! (0-based). Rows where either text is blank after trimming are dropped.

pub mod error;

use std::path::Path;

use calamine::{Data, Range, Reader as _};
use wordhero_core::word::NewWord;

pub use error::{Error, Result};

pub const ENGLISH_COLUMN: usize = 2;
pub const CHINESE_COLUMN: usize = 7;
pub const MIN_COLUMNS: usize = 8;

/// Read all words from the workbook at `path`.
///
/// Fails if the file cannot be opened or yields no valid row.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<Vec<NewWord>> {
  let path = path.as_ref();
  std::fs::metadata(path)?;
  tracing::info!(file = %path.display(), "reading word workbook");

  let mut workbook = calamine::open_workbook_auto(path)?;
  let mut words = Vec::new();
  for (name, range) in workbook.worksheets() {
    let before = words.len();
    words.extend(words_from_rows(sheet_rows(&range)));
    tracing::debug!(sheet = %name, words = words.len() - before, "sheet processed");
  }

  if words.is_empty() {
    return Err(Error::NoValidRows(path.display().to_string()));
  }
  tracing::info!(count = words.len(), "words read from workbook");
  Ok(words)
}

/// Flatten a sheet into rows of cell text indexed from column 0, padding
/// the leading columns a sparse range leaves out. Row 0 of the result is
/// the sheet's first row.
fn sheet_rows(range: &Range<Data>) -> Vec<Vec<String>> {
  let Some((first_row, first_col)) = range.start() else {
    return Vec::new();
  };
  let pad = first_col as usize;

  let mut rows = vec![Vec::new(); first_row as usize];
  rows.extend(range.rows().map(|cells| {
    let mut row = vec![String::new(); pad];
    row.extend(cells.iter().map(|c| c.to_string()));
    row
  }));
  rows
}

/// Convert sheet rows into words. Row 0 is treated as the header.
pub fn words_from_rows(rows: impl IntoIterator<Item = Vec<String>>) -> Vec<NewWord> {
  rows
    .into_iter()
    .skip(1)
    .filter_map(|mut cells| {
      if cells.len() < MIN_COLUMNS {
        return None;
      }
      let chinese = std::mem::take(&mut cells[CHINESE_COLUMN]);
      let english = std::mem::take(&mut cells[ENGLISH_COLUMN]);
      NewWord::new(english, chinese).normalized().ok()
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(english: &str, chinese: &str) -> Vec<String> {
    let mut r = vec![String::new(); MIN_COLUMNS];
    r[ENGLISH_COLUMN] = english.into();
    r[CHINESE_COLUMN] = chinese.into();
    r
  }

  #[test]
  fn skips_header_and_blank_rows() {
    let rows = vec![
      row("English", "Chinese"),
      row(" cat ", "猫"),
      row("", "狗"),
      row("bird", "  "),
      row("dog", "狗"),
    ];
    let words = words_from_rows(rows);
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].english, "cat");
    assert_eq!(words[1].chinese, "狗");
  }

  #[test]
  fn short_rows_are_dropped() {
    let rows = vec![
      row("h", "h"),
      vec!["a".to_string(), "b".to_string(), "cat".to_string()],
    ];
    assert!(words_from_rows(rows).is_empty());
  }

  #[test]
  fn missing_file_is_io_error() {
    let err = read_workbook("/definitely/not/here.xlsx").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
  }
}
