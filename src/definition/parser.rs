//! Row-stream state machine: header rows open blocks, data rows become
//! counters, blank rows close blocks.
use super::factory::CounterFactory;
use super::{DefinitionError, ParsedDefinition};
use crate::counter::{Counter, RepeatKind, RepeatPolicy};
use crate::tabular;
use crate::template::Template;
use once_cell::sync::Lazy;
use regex::Regex;

pub const END_BOX: &str = "ENDBOX";
pub const END_ROW: &str = "ENDROW";

static REPEAT_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(-?[0-9]+)(\+{0,3})$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    AwaitingHeader,
    InBlock(CounterFactory),
}

/// What the first cell of a row inside a block asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    EndBox,
    EndRow,
    Repeat(RepeatPolicy),
    /// Not a count: the row opens a new block
    Header,
}

/// Interpret the first cell of a row inside a block. An empty cell means
/// one exact copy.
pub fn parse_directive(cell: &str) -> Result<Directive, String> {
    let cell = cell.trim();
    match cell {
        END_BOX => return Ok(Directive::EndBox),
        END_ROW => return Ok(Directive::EndRow),
        "" => return Ok(Directive::Repeat(RepeatPolicy::exact(1))),
        _ => {}
    }
    let Some(caps) = REPEAT_COUNT.captures(cell) else {
        return Ok(Directive::Header);
    };
    let count: i64 = caps[1].parse().map_err(|_| cell.to_string())?;
    let kind = match caps[2].len() {
        0 => RepeatKind::Exact,
        1 => RepeatKind::MinFillRow,
        2 => RepeatKind::MinFillBox,
        _ => RepeatKind::MinFillSheet,
    };
    Ok(Directive::Repeat(RepeatPolicy::new(kind, count)))
}

pub struct DefinitionParser<'t> {
    template: &'t Template,
    state: ParserState,
    counters: Vec<Counter>,
    has_back: bool,
    row_number: usize,
}

impl<'t> DefinitionParser<'t> {
    pub fn new(template: &'t Template) -> Self {
        DefinitionParser {
            template,
            state: ParserState::AwaitingHeader,
            counters: Vec::new(),
            has_back: false,
            row_number: 0,
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn parse_row(&mut self, row: &[String]) -> Result<(), DefinitionError> {
        self.row_number += 1;
        if tabular::is_blank(row) {
            if matches!(self.state, ParserState::InBlock(_)) {
                log::debug!("row {}: blank, block closed", self.row_number);
            }
            self.state = ParserState::AwaitingHeader;
            return Ok(());
        }

        let directive = match &self.state {
            ParserState::AwaitingHeader => Directive::Header,
            ParserState::InBlock(_) => {
                parse_directive(tabular::cell(row, 0).unwrap_or("")).map_err(|cell| {
                    DefinitionError::RepeatCountOutOfRange {
                        row: self.row_number,
                        cell,
                    }
                })?
            }
        };

        match directive {
            Directive::Header => self.open_block(row),
            Directive::EndBox => match self.counters.last_mut() {
                Some(previous) => previous.end_box = true,
                None => log::debug!("row {}: {} before any counter", self.row_number, END_BOX),
            },
            Directive::EndRow => match self.counters.last_mut() {
                Some(previous) => previous.end_row = true,
                None => log::debug!("row {}: {} before any counter", self.row_number, END_ROW),
            },
            Directive::Repeat(policy) => self.add_counter(policy, row),
        }
        Ok(())
    }

    pub fn parse<I, R>(&mut self, rows: I) -> Result<(), DefinitionError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[String]>,
    {
        for row in rows {
            self.parse_row(row.as_ref())?;
        }
        Ok(())
    }

    pub fn finish(self) -> ParsedDefinition {
        ParsedDefinition {
            counters: self.counters,
            has_back: self.has_back,
        }
    }

    fn open_block(&mut self, row: &[String]) {
        let factory = CounterFactory::from_header_row(row);
        log::debug!(
            "row {}: header with {} columns",
            self.row_number,
            factory.headers().len()
        );
        self.state = ParserState::InBlock(factory);
    }

    fn add_counter(&mut self, policy: RepeatPolicy, row: &[String]) {
        let ParserState::InBlock(factory) = &mut self.state else {
            return;
        };
        let mut counter = factory.create_counter(policy, row, self.row_number, self.template);
        self.has_back |= factory.has_back();
        // A back made only by copy-to-back columns is not a real back side
        if counter.has_back {
            if let (Some(id), Some(back)) = (counter.id.clone(), counter.back.as_mut()) {
                if back.id.is_none() {
                    back.id = Some(format!("{}_back", id));
                }
            }
        }
        log::trace!(
            "row {}: counter {:?} x{}",
            self.row_number,
            counter.id,
            counter.repeat.count()
        );
        self.counters.push(counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives() {
        assert_eq!(parse_directive("ENDBOX"), Ok(Directive::EndBox));
        assert_eq!(parse_directive(" ENDROW "), Ok(Directive::EndRow));
        assert_eq!(parse_directive(""), Ok(Directive::Repeat(RepeatPolicy::exact(1))));
        assert_eq!(parse_directive("3"), Ok(Directive::Repeat(RepeatPolicy::exact(3))));
        assert_eq!(
            parse_directive("2+"),
            Ok(Directive::Repeat(RepeatPolicy::new(RepeatKind::MinFillRow, 2)))
        );
        assert_eq!(
            parse_directive("2++"),
            Ok(Directive::Repeat(RepeatPolicy::new(RepeatKind::MinFillBox, 2)))
        );
        assert_eq!(
            parse_directive("0+++"),
            Ok(Directive::Repeat(RepeatPolicy::new(RepeatKind::MinFillSheet, 0)))
        );
        assert_eq!(parse_directive("-1"), Ok(Directive::Repeat(RepeatPolicy::exact(-1))));
    }

    #[test]
    fn test_non_counts_are_headers() {
        for cell in ["name", "1x", "+", "2++++", "1.5", "frame>", "١", "٣+", "１２"] {
            assert_eq!(parse_directive(cell), Ok(Directive::Header), "{}", cell);
        }
    }

    #[test]
    fn test_overflowing_count_is_an_error() {
        assert_eq!(
            parse_directive("99999999999999999999+"),
            Err("99999999999999999999+".to_string())
        );
    }

    #[test]
    fn test_blank_row_resets_state() {
        let template = Template::default();
        let mut parser = DefinitionParser::new(&template);
        parser.parse_row(&["".into(), "a".into()]).unwrap();
        assert!(matches!(parser.state(), ParserState::InBlock(_)));
        parser.parse_row(&[]).unwrap();
        assert_eq!(parser.state(), &ParserState::AwaitingHeader);
    }
}
