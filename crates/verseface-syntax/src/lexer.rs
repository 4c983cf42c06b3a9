//! # Lexer - Tokenizing USFM Source
//!
//! This module breaks USFM text into tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so concatenating the token texts gives back the original:
//!
//! ```
//! use verseface_syntax::lexer::lex;
//!
//! let input = "\\c 1\n\\v 1 In the beginning\\f + note\\f*";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer only knows the *shape* of a backslash
//! tag (`\name` or `\name*`); what a tag means is decided by [`Marker`], and
//! what to do with it is the reducer's job in the engine crate.
//!
//! - `\c`, `\v`, `\p`, `\q1`, ... → [`TokenKind::Marker`]
//! - `\f*`, `\x*`, `\add*`, ... → [`TokenKind::ClosingMarker`]
//! - spaces and tabs → [`TokenKind::Whitespace`]
//! - `\n`, `\r\n`, `\r` → [`TokenKind::Newline`]
//! - everything else → [`TokenKind::Text`]
//!
//! A backslash not followed by a lowercase letter or digit is not a tag and
//! lexes as text.

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (anything `char::is_whitespace` except line endings)
    #[regex(r"[^\S\r\n]+")]
    Whitespace,

    /// Line ending (LF, CRLF or a lone CR)
    #[regex(r"\r\n|\n|\r")]
    Newline,

    /// Opening or standalone tag: `\c`, `\v`, `\f`, `\q2`, `\nb`
    #[regex(r"\\[a-z0-9]+")]
    Marker,

    /// Closing tag of a span: `\f*`, `\w*`, `\add*`
    #[regex(r"\\[a-z0-9]+\*")]
    ClosingMarker,

    /// Plain text - anything that is not whitespace or a backslash
    #[regex(r"[^\s\\]+")]
    Text,
}

/// Spans whose content is discarded together with their tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// `\f ... \f*`
    Footnote,
    /// `\x ... \x*`
    CrossReference,
    /// `\w ... \w*`
    WordAlignment,
}

impl SpanKind {
    /// The tag name that opens and closes this span.
    pub fn tag(self) -> &'static str {
        match self {
            SpanKind::Footnote => "f",
            SpanKind::CrossReference => "x",
            SpanKind::WordAlignment => "w",
        }
    }

    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "f" => Some(SpanKind::Footnote),
            "x" => Some(SpanKind::CrossReference),
            "w" => Some(SpanKind::WordAlignment),
            _ => None,
        }
    }
}

/// What a backslash tag means to the verse extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `\c N`
    Chapter,
    /// `\v N`
    Verse,
    /// `\id BOOK`
    BookId,
    /// Opening tag of a discarded span.
    SpanOpen(SpanKind),
    /// Closing tag of a discarded span.
    SpanClose(SpanKind),
    /// Paragraph, poetry, heading and break markers that are removed outright:
    /// `\r`, `\s1`..`\s9`, `\p`, `\q`, `\q1`..`\q9`, `\b`, `\m`, `\nb`.
    Line,
    /// Any other tag. Residual tags are replaced by a space.
    Other,
}

impl Marker {
    /// Classify a tag by name (without the backslash or closing `*`).
    pub fn classify(name: &str, closing: bool) -> Marker {
        if closing {
            return SpanKind::from_tag(name).map_or(Marker::Other, Marker::SpanClose);
        }
        if let Some(span) = SpanKind::from_tag(name) {
            return Marker::SpanOpen(span);
        }
        match name {
            "c" => Marker::Chapter,
            "v" => Marker::Verse,
            "id" => Marker::BookId,
            "r" | "p" | "q" | "b" | "m" | "nb" => Marker::Line,
            _ if is_numbered(name, 's') || is_numbered(name, 'q') => Marker::Line,
            _ => Marker::Other,
        }
    }
}

/// `s1`, `q2`: the letter followed by exactly one digit.
fn is_numbered(name: &str, letter: char) -> bool {
    let mut chars = name.chars();
    chars.next() == Some(letter)
        && chars.next().is_some_and(|c| c.is_ascii_digit())
        && chars.next().is_none()
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Tag name of a marker token, `"f"` for both `\f` and `\f*`.
    pub fn marker_name(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::Marker => Some(&self.text[1..]),
            TokenKind::ClosingMarker => Some(&self.text[1..self.text.len() - 1]),
            _ => None,
        }
    }

    /// Classified meaning of a marker token.
    pub fn marker(&self) -> Option<Marker> {
        let name = self.marker_name()?;
        Some(Marker::classify(
            name,
            self.kind == TokenKind::ClosingMarker,
        ))
    }

    /// Whitespace or a line ending.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Newline)
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // Logos error means a lone backslash - treat as TEXT
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token { kind, text });
    }

    tokens
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
