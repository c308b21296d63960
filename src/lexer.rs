//! Concrete [`Lexer`] implementation.
//!
//! A hand-written, indentation-aware scanner. It recognizes the same token
//! alphabet the parser expects (see `token.rs`) and honors the scanning
//! state switches the parser issues. It is intentionally not a verbatim port
//! of any particular flex grammar; it implements the *contract* the parser
//! needs, grounded on the state-switch and indent/dedent behavior documented
//! in `examples/original_source/src/docparser.cpp`.

use crate::token::{Lexer, LexerState, Option_, Scratch, TokenKind};
use regex::Regex;
use std::sync::OnceLock;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(https?|ftp)://[^\s<>]+").unwrap())
}

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:\s+[a-zA-Z][a-zA-Z0-9-]*(?:\s*=\s*"[^"]*"|\s*=\s*'[^']*')?)*)\s*(/?)>"#).unwrap())
}

fn html_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([a-zA-Z][a-zA-Z0-9-]*)(?:\s*=\s*"([^"]*)"|\s*=\s*'([^']*)')?"#).unwrap()
    })
}

fn symbol_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^&[A-Za-z]+;").unwrap())
}

/// Restriction applied to token recognition under the current [`LexerState`].
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Full inline recognition (words, whitespace, commands, html, symbols,
    /// urls) plus block-structural tokens (newpara/listitem/endlist).
    Block,
    /// Full inline recognition, but scanning stops at end-of-line (`Eos`)
    /// instead of producing `NewPara`/`ListItem`/`EndList`.
    SingleLine,
    /// Only words and whitespace are recognized; stops at end-of-line.
    WordsOnly,
}

fn mode_for(state: LexerState) -> Mode {
    match state {
        LexerState::Para => Mode::Block,
        LexerState::Title
        | LexerState::Ref
        | LexerState::Link
        | LexerState::File
        | LexerState::Pattern => Mode::SingleLine,
        LexerState::Param | LexerState::XRefItem => Mode::WordsOnly,
        // Verbatim-family states are handled specially in `next`, never
        // routed through `scan_one`.
        LexerState::Code | LexerState::HtmlOnly | LexerState::LatexOnly | LexerState::Verbatim => {
            Mode::Block
        }
    }
}

/// End-marker text for each verbatim capture state.
fn end_marker_for(state: LexerState) -> &'static str {
    match state {
        LexerState::Code => "endcode",
        LexerState::HtmlOnly => "endhtmlonly",
        LexerState::LatexOnly => "endlatexonly",
        LexerState::Verbatim => "endverbatim",
        _ => unreachable!("end_marker_for called for a non-capture state"),
    }
}

pub struct DocLexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    state: LexerState,
    scratch: Scratch,
    /// Open auto-list indents, outermost first.
    list_indents: Vec<i32>,
    /// True when the next token must be decided from the start of a fresh
    /// line (blank-line/list-item/dedent checks only apply there).
    at_line_start: bool,
}

impl DocLexer {
    pub fn new(input: &str, start_line: u32) -> Self {
        DocLexer {
            chars: input.chars().collect(),
            pos: 0,
            line: start_line,
            state: LexerState::Para,
            scratch: Scratch::default(),
            list_indents: Vec::new(),
            at_line_start: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, off: usize) -> Option<char> {
        self.chars.get(self.pos + off).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn rest_as_str(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    /// Indentation (column count) of the line starting at `self.pos`,
    /// without consuming anything.
    fn current_indent(&self) -> i32 {
        let mut i = self.pos;
        let mut col = 0i32;
        while let Some(&c) = self.chars.get(i) {
            if c == ' ' {
                col += 1;
                i += 1;
            } else if c == '\t' {
                col += 4;
                i += 1;
            } else {
                break;
            }
        }
        col
    }

    fn is_blank_line_at(&self, mut i: usize) -> bool {
        while let Some(&c) = self.chars.get(i) {
            if c == '\n' {
                return true;
            }
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            return false;
        }
        true
    }

    fn skip_indent(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Attempt to recognize a `- ` / `-# ` auto-list marker at the current
    /// (already indent-skipped) position. Does not consume unless matched.
    fn try_list_marker(&mut self) -> Option<bool> {
        if self.peek() != Some('-') {
            return None;
        }
        let mut off = 1;
        let is_enum = self.peek_at(off) == Some('#');
        if is_enum {
            off += 1;
        }
        match self.peek_at(off) {
            Some(' ') | Some('\t') => {
                for _ in 0..=off {
                    self.advance();
                }
                self.skip_indent();
                Some(is_enum)
            }
            _ => None,
        }
    }

    /// Structural token decision made only at the start of a line, used by
    /// `Mode::Block`.
    fn scan_line_start(&mut self) -> Option<TokenKind> {
        if self.at_eof() {
            return Some(TokenKind::Eos);
        }
        if self.is_blank_line_at(self.pos) {
            // Consume the full run of blank lines as a single NEWPARA.
            while self.is_blank_line_at(self.pos) && !self.at_eof() {
                while self.peek().is_some() && self.peek() != Some('\n') {
                    self.advance();
                }
                if self.peek() == Some('\n') {
                    self.advance();
                }
            }
            self.scratch.chars = "\n\n".to_string();
            return Some(TokenKind::NewPara);
        }
        let indent = self.current_indent();
        if let Some(&top) = self.list_indents.last() {
            if indent < top {
                self.list_indents.pop();
                self.scratch.indent = indent;
                return Some(TokenKind::EndList);
            }
        }
        let save_pos = self.pos;
        let save_line = self.line;
        self.skip_indent();
        if let Some(is_enum) = self.try_list_marker() {
            let top_is_same = self.list_indents.last() == Some(&indent);
            if !top_is_same {
                self.list_indents.push(indent);
            }
            self.scratch.indent = indent;
            self.scratch.is_enum_list = is_enum;
            self.at_line_start = false;
            return Some(TokenKind::ListItem);
        }
        // Not a list marker: rewind the indent skip and fall through to
        // ordinary inline scanning for this line.
        self.pos = save_pos;
        self.line = save_line;
        self.at_line_start = false;
        None
    }

    fn scan_command(&mut self) -> TokenKind {
        self.advance(); // consume `\` or `@`
        let mut name = String::new();
        match self.peek() {
            Some(c) if c == '-' => {
                // `\-`, `\--`, `\---` escape/dash family.
                while self.peek() == Some('-') && name.len() < 3 {
                    name.push('-');
                    self.advance();
                }
            }
            Some(c) if c.is_alphanumeric() => {
                while let Some(c) = self.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            Some(c) => {
                name.push(c);
                self.advance();
            }
            None => {}
        }
        self.scratch.name = name;
        TokenKind::Command
    }

    fn scan_html_tag(&mut self) -> TokenKind {
        let rest = self.rest_as_str();
        if let Some(caps) = html_tag_re().captures(&rest) {
            let whole = caps.get(0).unwrap().as_str();
            let end_tag = &caps[1] == "/";
            let name = caps[2].to_ascii_lowercase();
            let attrs_src = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            let mut options = Vec::new();
            for a in html_attr_re().captures_iter(attrs_src) {
                let aname = a[1].to_ascii_lowercase();
                let aval = a
                    .get(2)
                    .or_else(|| a.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or("")
                    .to_string();
                options.push(Option_ {
                    name: aname,
                    value: aval,
                });
            }
            for _ in 0..whole.chars().count() {
                self.advance();
            }
            self.scratch.name = name;
            self.scratch.end_tag = end_tag;
            self.scratch.options = options;
            TokenKind::HtmlTag
        } else {
            // Malformed tag syntax: treat the `<` as a lone word character.
            self.advance();
            self.scratch.name = "<".to_string();
            TokenKind::Word
        }
    }

    fn scan_symbol(&mut self) -> Option<TokenKind> {
        let rest = self.rest_as_str();
        let m = symbol_re().find(&rest)?;
        let text = m.as_str().to_string();
        for _ in 0..text.chars().count() {
            self.advance();
        }
        self.scratch.name = text;
        Some(TokenKind::Symbol)
    }

    fn scan_url(&mut self) -> Option<TokenKind> {
        let rest = self.rest_as_str();
        let m = url_re().find(&rest)?;
        let text = m.as_str().to_string();
        for _ in 0..text.chars().count() {
            self.advance();
        }
        self.scratch.name = text;
        Some(TokenKind::Url)
    }

    fn scan_whitespace(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                // A blank line ahead: stop without consuming, and arm
                // at_line_start so the next call routes through
                // scan_line_start and observes the paragraph boundary there.
                if self.is_blank_line_at(self.pos + 1) {
                    self.at_line_start = true;
                    break;
                }
                s.push(c);
                self.advance();
                // Re-arm at_line_start on every newline so the new line
                // gets checked for a dedent or list marker. Splitting the
                // whitespace run here can leave two adjacent Whitespace
                // tokens; append_whitespace merges them back into one node.
                self.at_line_start = true;
                break;
            } else if c == ' ' || c == '\t' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.scratch.chars = s;
        TokenKind::Whitespace
    }

    fn scan_word(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '\\' || c == '@' || c == '<' || c == '&' {
                break;
            }
            s.push(c);
            self.advance();
        }
        if s.is_empty() {
            // Stray delimiter with no recognizable structure: consume one
            // char as a degenerate word so the scanner always progresses.
            if let Some(c) = self.advance() {
                s.push(c);
            }
        }
        self.scratch.name = s;
        TokenKind::Word
    }

    fn scan_one(&mut self, words_only: bool) -> TokenKind {
        match self.peek() {
            None => TokenKind::Eos,
            Some(c) if c == ' ' || c == '\t' || c == '\n' => self.scan_whitespace(),
            Some('\\') | Some('@') if !words_only => self.scan_command(),
            Some('<') if !words_only => self.scan_html_tag(),
            Some('&') if !words_only => self.scan_symbol().unwrap_or_else(|| self.scan_word()),
            _ => {
                if !words_only {
                    if let Some(k) = self.scan_url() {
                        return k;
                    }
                }
                self.scan_word()
            }
        }
    }

    fn scan_verbatim(&mut self, state: LexerState) -> TokenKind {
        let marker = end_marker_for(state);
        let mut payload = String::new();
        loop {
            if self.at_eof() {
                self.scratch.verbatim_payload = payload;
                self.scratch.id = -1; // unterminated
                return TokenKind::Word;
            }
            let rest = self.rest_as_str();
            if (rest.starts_with('\\') || rest.starts_with('@')) && rest[1..].starts_with(marker) {
                let skip = 1 + marker.len();
                for _ in 0..skip {
                    self.advance();
                }
                self.scratch.verbatim_payload = payload;
                self.scratch.id = 0;
                return TokenKind::Word;
            }
            if let Some(c) = self.advance() {
                payload.push(c);
            }
        }
    }

    fn scan_single_line_stop_at_eol(&mut self, words_only: bool) -> TokenKind {
        if self.at_eof() || self.peek() == Some('\n') {
            if self.peek() == Some('\n') {
                self.advance();
            }
            self.at_line_start = true;
            return TokenKind::Eos;
        }
        self.scan_one(words_only)
    }
}

impl Lexer for DocLexer {
    fn next(&mut self) -> TokenKind {
        match mode_for(self.state) {
            Mode::Block => {
                if matches!(
                    self.state,
                    LexerState::Code | LexerState::HtmlOnly | LexerState::LatexOnly | LexerState::Verbatim
                ) {
                    return self.scan_verbatim(self.state);
                }
                if self.at_line_start {
                    if let Some(k) = self.scan_line_start() {
                        return k;
                    }
                }
                self.scan_one(false)
            }
            Mode::SingleLine => self.scan_single_line_stop_at_eol(false),
            Mode::WordsOnly => self.scan_single_line_stop_at_eol(true),
        }
    }

    fn set_state(&mut self, state: LexerState) {
        self.state = state;
    }

    fn state(&self) -> LexerState {
        self.state
    }

    fn current_line(&self) -> u32 {
        self.line
    }

    fn scratch(&self) -> &Scratch {
        &self.scratch
    }
}

