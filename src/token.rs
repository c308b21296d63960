//! Token interface consumed by the parser.
//!
//! The lexer is a context-sensitive scanner: the parser switches it between
//! a handful of scanning states (see [`LexerState`]) and reads back a small
//! mutable scratch record on every call to [`Lexer::next`]. The scratch
//! record is owned by the lexer and is only ever read by the parser; fields
//! that are not relevant to the current token kind are left at their
//! previous value and must not be interpreted.

/// Discriminant for a single token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of stream. Carries no scratch data.
    Eos,
    Word,
    Whitespace,
    /// A blank line: paragraph boundary.
    NewPara,
    /// `- item`, `-# item`, and similar auto-list markers.
    ListItem,
    /// End of an auto list, signalled by dedentation below the list's indent.
    EndList,
    Command,
    HtmlTag,
    Symbol,
    Url,
}

/// A name/value pair from an HTML tag's attribute list, e.g. `href="..."`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Option_ {
    pub name: String,
    pub value: String,
}

/// The mutable scratch record populated by the lexer on each call to
/// [`Lexer::next`]. Only fields relevant to the token kind just returned
/// carry meaningful data; the rest hold stale values from a previous token
/// and must be ignored by callers.
#[derive(Debug, Clone, Default)]
pub struct Scratch {
    /// Command name (without the leading `\` or `@`), HTML tag name, or
    /// symbol entity name (without `&`/`;`).
    pub name: String,
    /// Raw characters for whitespace runs.
    pub chars: String,
    /// Captured body for verbatim/code/html-only/latex-only tokens.
    pub verbatim_payload: String,
    /// Numeric id, used by formula and xref-item tokens.
    pub id: i64,
    /// Leading indent (in columns) of a list-item or end-list line.
    pub indent: i32,
    /// Whether a list-item marker was an enumerated marker (`-#`) rather
    /// than a plain bullet (`-`).
    pub is_enum_list: bool,
    /// Whether an HTML tag token is a closing tag (`</foo>`).
    pub end_tag: bool,
    /// Ordered attribute list of an HTML tag, e.g. `[("href", "...")]`.
    pub options: Vec<Option_>,
    /// Scratch slot the parser writes to when deferring a `\section`-style
    /// command name across a return boundary (see `ParserContext::pushback`
    /// for the actual one-deep slot used for that; this field mirrors the
    /// original design's scratch field but is unused by this parser).
    pub section_id: String,
    pub simple_sect_name: String,
}

/// Scanning state the lexer can be switched into. The parser is responsible
/// for restoring [`LexerState::Para`] on every exit path, including error
/// paths (see `ParserContext::with_state` for the scoped-guard helper that
/// does this).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerState {
    Para,
    Title,
    Param,
    XRefItem,
    File,
    Link,
    Ref,
    Pattern,
    Code,
    HtmlOnly,
    LatexOnly,
    Verbatim,
}

/// Abstract view of the lexer, as consumed by the core parser (spec.md §6).
/// Implementations are free to scan however they like; the parser only
/// relies on this contract.
pub trait Lexer {
    /// Advance to the next token, updating the scratch record, and return
    /// its kind.
    fn next(&mut self) -> TokenKind;
    /// Switch the scanning mode for subsequent calls to `next`.
    fn set_state(&mut self, state: LexerState);
    /// The scanning mode currently in effect.
    fn state(&self) -> LexerState;
    /// 1-based line number of the token just returned by `next`.
    fn current_line(&self) -> u32;
    /// Read-only view of the scratch record for the token just returned.
    fn scratch(&self) -> &Scratch;
}
