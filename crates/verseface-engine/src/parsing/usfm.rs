//! USFM → chapter/verse text.
//!
//! A single left-to-right pass over the lexer's tokens. The reducer keeps the
//! chapter and verse currently being filled and decides per token:
//!
//! - `\f`, `\x`, `\w` spans are dropped up to and including the first matching
//!   closing tag. An opening tag without a closer is an ordinary residual tag.
//! - `\r`, `\s1`..`\s9`, `\p`, `\q`, `\q1`..`\q9`, `\b`, `\m`, `\nb` vanish.
//! - `\c N` / `\v N` (whitespace, then ASCII digits) start a new chapter or
//!   verse. Dropped spans and vanishing markers between the tag and its number
//!   are skipped first. Without digits the tag is residual.
//! - every other tag becomes a single space. The `*` of a closing tag such as
//!   `\add*` is not part of the tag and stays in the text.
//!
//! Text before the first chapter, and chapter text before its first verse, is
//! discarded. Verse text has its whitespace collapsed and trimmed, and empty
//! verses are never stored.

use verseface_syntax::{Marker, SpanKind, Token, TokenKind, lex};

use crate::models::{Chapter, ParsedBook};

/// Parse USFM text into a [`ParsedBook`].
///
/// Never fails: input without chapter and verse markers yields an empty book.
pub fn parse(text: &str) -> ParsedBook {
    let tokens = lex(text);
    let stream = TokenStream::new(&tokens);
    let mut reducer = Reducer::default();

    let mut pos = 0;
    while pos < tokens.len() {
        pos = reducer.step(&stream, pos);
    }

    let book = reducer.finish();
    log::debug!(
        "Parsed USFM book {:?}: {} chapters, {} verses",
        book.book_id(),
        book.len(),
        book.verse_count()
    );
    book
}

/// Clean a raw verse fragment: every backslash tag becomes a space, whitespace
/// runs collapse to one space, and the ends are trimmed.
///
/// Spans are not removed here; this is only the final cleanup step.
pub fn clean_verse_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    for token in lex(raw) {
        match token.kind {
            TokenKind::Marker => text.push(' '),
            TokenKind::ClosingMarker => text.push_str(" *"),
            _ => text.push_str(token.text),
        }
    }
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What a tag left in the text becomes.
fn residual(token: Token<'_>) -> &'static str {
    match token.kind {
        TokenKind::ClosingMarker
            if token.marker_name().map(|name| Marker::classify(name, false))
                == Some(Marker::Line) =>
        {
            "*"
        }
        TokenKind::ClosingMarker => " *",
        _ => " ",
    }
}

fn slot(kind: SpanKind) -> usize {
    match kind {
        SpanKind::Footnote => 0,
        SpanKind::CrossReference => 1,
        SpanKind::WordAlignment => 2,
    }
}

/// The token slice plus, for every position, where the next closing tag of
/// each span kind sits. Built in one backwards sweep so unclosed openers cost
/// a lookup rather than a scan.
struct TokenStream<'t, 'a> {
    tokens: &'t [Token<'a>],
    next_closer: Vec<[Option<usize>; 3]>,
}

impl<'t, 'a> TokenStream<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        let mut next_closer = vec![[None; 3]; tokens.len() + 1];
        for (pos, token) in tokens.iter().enumerate().rev() {
            next_closer[pos] = next_closer[pos + 1];
            if let Some(Marker::SpanClose(kind)) = token.marker() {
                next_closer[pos][slot(kind)] = Some(pos);
            }
        }
        Self {
            tokens,
            next_closer,
        }
    }

    /// Position just past the closer of the span opened at `pos`, or `None`
    /// when it is never closed.
    fn span_end(&self, pos: usize, kind: SpanKind) -> Option<usize> {
        self.next_closer
            .get(pos + 1)
            .and_then(|closers| closers[slot(kind)])
            .map(|closer| closer + 1)
    }

    /// Read the numeric argument of a `\c` / `\v` marker starting at `start`.
    ///
    /// Closed spans and vanishing markers are skipped; at least one
    /// whitespace token must remain, followed by a text token beginning with
    /// ASCII digits. Returns the number, the rest of that text token after
    /// the digits, and the position after it.
    fn number_argument(&self, start: usize) -> Option<(u32, &'a str, usize)> {
        let mut pos = start;
        let mut separated = false;
        while let Some(token) = self.tokens.get(pos) {
            match token.marker() {
                None if token.is_trivia() => {
                    separated = true;
                    pos += 1;
                }
                Some(Marker::Line) => pos += 1,
                Some(Marker::SpanOpen(kind)) => match self.span_end(pos, kind) {
                    Some(end) => pos = end,
                    None => break,
                },
                _ => break,
            }
        }
        if !separated {
            return None;
        }

        let token = self.tokens.get(pos).filter(|t| t.kind == TokenKind::Text)?;
        let digits = token.text.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let number = token.text[..digits].parse().ok()?;
        Some((number, &token.text[digits..], pos + 1))
    }
}

#[derive(Default)]
struct Reducer {
    book: ParsedBook,
    book_id: Option<String>,
    chapter: Option<(u32, Chapter)>,
    verse: Option<(u32, String)>,
}

impl Reducer {
    /// Consume the token at `pos` (and any tokens it owns), returning the
    /// position of the next unconsumed token.
    fn step(&mut self, stream: &TokenStream<'_, '_>, pos: usize) -> usize {
        let token = stream.tokens[pos];
        let Some(marker) = token.marker() else {
            self.push(token.text);
            return pos + 1;
        };

        match marker {
            Marker::SpanOpen(kind) => match stream.span_end(pos, kind) {
                Some(end) => end,
                None => {
                    log::trace!("Unclosed \\{} span at token {pos}", kind.tag());
                    self.push(residual(token));
                    pos + 1
                }
            },
            Marker::Line => pos + 1,
            Marker::Chapter | Marker::Verse => match stream.number_argument(pos + 1) {
                Some((number, rest, next)) => {
                    if marker == Marker::Chapter {
                        self.start_chapter(number);
                    } else {
                        self.start_verse(number);
                    }
                    self.push(rest);
                    next
                }
                None => {
                    log::trace!("{} without a number at token {pos}", token.text);
                    self.push(residual(token));
                    pos + 1
                }
            },
            Marker::BookId => {
                if self.chapter.is_none()
                    && self.book_id.is_none()
                    && let Some(code) = stream.tokens[pos + 1..]
                        .iter()
                        .find(|t| !t.is_trivia())
                        .filter(|t| t.kind == TokenKind::Text)
                {
                    self.book_id = Some(code.text.to_string());
                }
                self.push(residual(token));
                pos + 1
            }
            Marker::SpanClose(_) | Marker::Other => {
                self.push(residual(token));
                pos + 1
            }
        }
    }

    /// Append to the open verse. Outside a verse the text is preamble and
    /// dropped.
    fn push(&mut self, fragment: &str) {
        if let Some((_, text)) = &mut self.verse {
            text.push_str(fragment);
        }
    }

    fn start_chapter(&mut self, number: u32) {
        self.finish_verse();
        self.finish_chapter();
        self.chapter = Some((number, Chapter::default()));
    }

    fn start_verse(&mut self, number: u32) {
        self.finish_verse();
        if self.chapter.is_some() {
            self.verse = Some((number, String::new()));
        }
    }

    fn finish_verse(&mut self) {
        if let Some((number, raw)) = self.verse.take()
            && let Some((_, chapter)) = &mut self.chapter
        {
            let text = collapse_whitespace(&raw);
            if !text.is_empty() {
                chapter.insert(number, text);
            }
        }
    }

    fn finish_chapter(&mut self) {
        if let Some((number, chapter)) = self.chapter.take() {
            self.book.insert_chapter(number, chapter);
        }
    }

    fn finish(mut self) -> ParsedBook {
        self.finish_verse();
        self.finish_chapter();
        self.book.set_book_id(self.book_id);
        self.book
    }
}
