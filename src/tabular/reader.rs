//! Row assembly
//!
//! Folds the token stream into rows. The delimiter is sniffed from the first
//! line: whichever of comma, semicolon and tab occurs most often there wins,
//! comma on ties. Separator tokens that are not the delimiter are plain text.
//!
//! A double quote only opens a quoted cell at the very start of a cell, so
//! an inch mark such as `5" gun` stays in its cell.
use super::tokens::{unquote, Token};
use super::Row;
use logos::{Lexer, Logos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    fn matches(self, token: &Token) -> bool {
        matches!(
            (self, token),
            (Delimiter::Comma, Token::Comma)
                | (Delimiter::Semicolon, Token::Semicolon)
                | (Delimiter::Tab, Token::Tab)
        )
    }
}

/// Token stream in which a quoted token only counts at the start of a cell.
/// Anywhere else its opening quote is text and lexing resumes right after it.
struct Scanner<'s> {
    source: &'s str,
    offset: usize,
    lexer: Lexer<'s, Token>,
    cell_start: bool,
    // None while sniffing: every separator token starts a cell
    delimiter: Option<Delimiter>,
}

impl<'s> Scanner<'s> {
    fn new(source: &'s str, delimiter: Option<Delimiter>) -> Self {
        Scanner {
            source,
            offset: 0,
            lexer: Token::lexer(source),
            cell_start: true,
            delimiter,
        }
    }

    fn separates(&self, token: &Token) -> bool {
        match self.delimiter {
            Some(delimiter) => delimiter.matches(token),
            None => token.is_delimiter(),
        }
    }
}

impl<'s> Iterator for Scanner<'s> {
    type Item = (Token, &'s str);

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lexer.next()?;
        let slice = self.lexer.slice();
        // Anything the lexer rejects is cell text
        let token = token.unwrap_or(Token::Bare);
        if token == Token::Quoted && !self.cell_start {
            let resume = self.offset + self.lexer.span().start + 1;
            self.offset = resume;
            self.lexer = Token::lexer(&self.source[resume..]);
            return Some((Token::Quote, &slice[..1]));
        }
        self.cell_start = token == Token::Newline || self.separates(&token);
        Some((token, slice))
    }
}

/// Guess the delimiter from the first line of `source`.
pub fn sniff_delimiter(source: &str) -> Delimiter {
    let (mut commas, mut semicolons, mut tabs) = (0usize, 0usize, 0usize);
    for (token, _) in Scanner::new(source, None) {
        match token {
            Token::Newline => break,
            Token::Comma => commas += 1,
            Token::Semicolon => semicolons += 1,
            Token::Tab => tabs += 1,
            _ => {}
        }
    }
    if semicolons > commas && semicolons >= tabs {
        Delimiter::Semicolon
    } else if tabs > commas && tabs > semicolons {
        Delimiter::Tab
    } else {
        Delimiter::Comma
    }
}

/// Read all rows of `source`, sniffing the delimiter first.
pub fn read_rows(source: &str) -> Vec<Row> {
    let delimiter = sniff_delimiter(source);
    log::debug!("tabular: sniffed delimiter {:?}", delimiter);
    read_rows_with(source, delimiter)
}

/// Read all rows of `source` using a known delimiter.
pub fn read_rows_with(source: &str, delimiter: Delimiter) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row: Row = Vec::new();
    let mut cell = String::new();
    // Whether anything (text or a delimiter) was seen on the current line
    let mut line_started = false;

    for (token, slice) in Scanner::new(source, Some(delimiter)) {
        match token {
            Token::Newline => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
                line_started = false;
                continue;
            }
            ref t if delimiter.matches(t) => {
                row.push(std::mem::take(&mut cell));
            }
            Token::Quoted => cell.push_str(&unquote(slice)),
            // Bare text, foreign delimiters and stray quotes are cell text
            _ => cell.push_str(slice),
        }
        line_started = true;
    }
    if line_started {
        row.push(cell);
        rows.push(row);
    }
    rows
}
