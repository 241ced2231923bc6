//! Token definitions for delimited text
//!
//! All three candidate delimiters are lexed as their own tokens. Which one
//! actually separates cells is decided afterwards by the reader; the other
//! two are folded back into cell text.
use logos::Logos;

/// All possible tokens in a delimited text file
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("\t")]
    Tab,

    // Line breaks (unix, dos and old mac)
    #[regex(r"\r\n|\n|\r")]
    Newline,

    // Double-quoted cell, "" escapes a quote, may span lines. Only opens a
    // cell at the start of one; the reader decides.
    #[regex(r#""([^"]|"")*""#)]
    Quoted,

    // A quote with no closing partner
    #[token("\"")]
    Quote,

    // Text content (catch-all for non-special characters)
    #[regex(r#"[^,;\t\r\n"]+"#)]
    Bare,
}

impl Token {
    /// Check if this token could act as a cell delimiter
    pub fn is_delimiter(&self) -> bool {
        matches!(self, Token::Comma | Token::Semicolon | Token::Tab)
    }
}

/// Strip the surrounding quotes of a quoted cell and collapse `""` escapes.
pub fn unquote(slice: &str) -> String {
    let inner = slice
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(slice);
    inner.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Result<Token, ()>> {
        Token::lexer(source).collect()
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            lex("a,b;c\td"),
            vec![
                Ok(Token::Bare),
                Ok(Token::Comma),
                Ok(Token::Bare),
                Ok(Token::Semicolon),
                Ok(Token::Bare),
                Ok(Token::Tab),
                Ok(Token::Bare),
            ]
        );
    }

    #[test]
    fn test_quoted_spans_lines() {
        let mut lexer = Token::lexer("\"b\n1\",c");
        assert_eq!(lexer.next(), Some(Ok(Token::Quoted)));
        assert_eq!(lexer.slice(), "\"b\n1\"");
        assert_eq!(lexer.next(), Some(Ok(Token::Comma)));
        assert_eq!(lexer.next(), Some(Ok(Token::Bare)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(
            lex("a\r\nb\nc\rd"),
            vec![
                Ok(Token::Bare),
                Ok(Token::Newline),
                Ok(Token::Bare),
                Ok(Token::Newline),
                Ok(Token::Bare),
                Ok(Token::Newline),
                Ok(Token::Bare),
            ]
        );
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a\"\"1\""), "a\"1");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn test_unterminated_quote_is_a_lone_quote() {
        assert_eq!(lex("\"abc"), vec![Ok(Token::Quote), Ok(Token::Bare)]);
    }

    #[test]
    fn test_is_delimiter() {
        assert!(Token::Tab.is_delimiter());
        assert!(!Token::Newline.is_delimiter());
        assert!(!Token::Quote.is_delimiter());
    }
}
