//! basic-lex - Lexical helpers for one BASIC program line.
//!
//! Grounded on `faxc-lex`'s `Cursor` (byte-position tracking, `advance`/
//! `slice_from`/snapshot-restore), but scoped down to what CBM BASIC
//! actually lexes: there is no token stream here. The evaluator and
//! statement interpreter drive a [`LineCursor`] directly, character by
//! character, re-entering mid-line at a saved byte offset rather than
//! replaying a list of tokens — that fused design is what the source
//! material's "intra-line cursor" depends on (see the re-architecture
//! notes for why it becomes an index rather than a raw pointer).

mod atof;
mod cursor;

pub use atof::atof_prefix;
pub use cursor::LineCursor;
