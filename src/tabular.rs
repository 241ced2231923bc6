//! Tabular row source
//!
//! Counter definitions are spreadsheet exports: comma, semicolon or tab
//! separated text with optional double-quoted cells. Tokenization is done by
//! a vanilla logos lexer (see [`tokens`]); [`reader`] sniffs which of the
//! separator tokens is the real delimiter and folds tokens into rows.
//!
//! Absent trailing cells and empty cells are different things to the
//! definition parser, so rows keep their natural length and lookups go
//! through [`cell`].

pub mod reader;
pub mod tokens;

pub use reader::{read_rows, read_rows_with, sniff_delimiter, Delimiter};
pub use tokens::Token;

/// One tokenized row.
pub type Row = Vec<String>;

/// Cell `index` of `row`, or `None` when the row is shorter than that.
pub fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(String::as_str)
}

/// A row with no cells, or only empty cells.
pub fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.is_empty())
}
