//! Counter definitions
//!
//! A definition file is a sequence of blocks. Each block starts with a
//! header row, whose cells are compiled by [`header`] into header nodes,
//! followed by data rows; every data row becomes one [`Counter`]. A blank
//! row ends the block. The first cell of a data row is a directive: a
//! repeat count (`n`, `n+`, `n++`, `n+++`), `ENDROW`, `ENDBOX`, or
//! anything else, in which case the row is a new header row.
//!
//! Parsing is forgiving. The only fatal input is a repeat count too large
//! to represent.

pub mod factory;
pub mod header;
pub mod parser;

pub use factory::CounterFactory;
pub use header::{classify, classify_background, HeaderNode};
pub use parser::{parse_directive, DefinitionParser, Directive, ParserState};

use crate::counter::Counter;
use crate::template::Template;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("row {row}: repeat count {cell:?} is out of range")]
    RepeatCountOutOfRange { row: usize, cell: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDefinition {
    pub counters: Vec<Counter>,
    /// Some block switched a counter to its back
    pub has_back: bool,
}

/// Parse a whole row stream.
pub fn parse_rows<I, R>(rows: I, template: &Template) -> Result<ParsedDefinition, DefinitionError>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    let mut parser = DefinitionParser::new(template);
    parser.parse(rows)?;
    let parsed = parser.finish();
    log::info!(
        "parsed {} counters{}",
        parsed.counters.len(),
        if parsed.has_back { " with backs" } else { "" }
    );
    Ok(parsed)
}
