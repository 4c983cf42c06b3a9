//! # verseface-syntax
//!
//! A lossless tokenizer for USFM (Unified Standard Format Markers) scripture
//! text, built with [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Architecture Overview
//!
//! Verse extraction is split in two stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Reducer → ParsedBook
//!               (Logos)          (verseface-engine)
//! ```
//!
//! This crate owns the first stage. The lexer recognises the *shape* of
//! backslash tags; [`Marker`] classifies a tag into the handful of meanings
//! the reducer cares about (chapter, verse, discarded span, removable line
//! marker, anything else).
//!
//! ```text
//! "\v 1 Grace\f + note\f*" → [Marker(\v), Whitespace, Text(1), Whitespace,
//!                              Text(Grace), Marker(\f), Whitespace, Text(+),
//!                              Whitespace, Text(note), ClosingMarker(\f*)]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use verseface_syntax::{lex, Marker, TokenKind};
//!
//! let tokens = lex("\\c 3");
//! assert_eq!(tokens[0].kind, TokenKind::Marker);
//! assert_eq!(tokens[0].marker(), Some(Marker::Chapter));
//! ```

pub mod lexer;

pub use lexer::{Marker, SpanKind, Token, TokenKind, lex, lex_with_spans};
