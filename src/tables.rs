//! Static lookup tables: command names, HTML tag names, entity symbols, and
//! the section registry. These are the "external collaborators" spec.md §1
//! names; this crate implements them as small self-contained tables so it
//! is runnable standalone (SPEC_FULL.md §2 item 9).

use crate::ast::SymbolKind;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Command identifiers the dispatcher (parser::commands) branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    // character escapes
    BSlash,
    At,
    Less,
    Greater,
    Amp,
    Dollar,
    Hash,
    Percent,
    Minus,
    NDash,
    MDash,
    // inline style
    Emphasis,
    Bold,
    Code,
    // simple sections
    Sa,
    Return,
    Author,
    Version,
    Since,
    Date,
    Note,
    Warning,
    Pre,
    Post,
    Invariant,
    Remark,
    Attention,
    Par,
    // parameter-like sections
    Param,
    RetVal,
    Exception,
    // xref
    Bug,
    Todo,
    Test,
    Deprecated,
    // structural
    Section,
    Subsection,
    Internal,
    Li,
    LineBreak,
    Anchor,
    AddIndex,
    CopyDoc,
    Ref,
    SecRefItem,
    SecRefList,
    EndSecRefList,
    Link,
    JavaLink,
    EndLink,
    Image,
    DotFile,
    Formula,
    LangSwitch,
    // verbatim family
    StartCode,
    HtmlOnly,
    LatexOnly,
    Verbatim,
    EndCode,
    EndHtmlOnly,
    EndLatexOnly,
    EndVerbatim,
    // include family
    Include,
    DontInclude,
    HtmlInclude,
    VerbInclude,
    Skip,
    SkipLine,
    Until,
    Line,
    Unknown,
}

impl CommandId {
    /// True for the commands that open a `SimpleSect` (spec.md §4.3's "this
    /// command starts a simple section" check).
    pub fn is_simple_section_starter(self) -> bool {
        matches!(
            self,
            CommandId::Sa
                | CommandId::Return
                | CommandId::Author
                | CommandId::Version
                | CommandId::Since
                | CommandId::Date
                | CommandId::Note
                | CommandId::Warning
                | CommandId::Pre
                | CommandId::Post
                | CommandId::Invariant
                | CommandId::Remark
                | CommandId::Attention
                | CommandId::Par
                | CommandId::Param
                | CommandId::RetVal
                | CommandId::Exception
        )
    }
}

fn command_map() -> &'static HashMap<&'static str, CommandId> {
    static MAP: OnceLock<HashMap<&'static str, CommandId>> = OnceLock::new();
    MAP.get_or_init(|| {
        use CommandId::*;
        HashMap::from([
            ("\\", BSlash),
            ("@", At),
            ("<", Less),
            (">", Greater),
            ("&", Amp),
            ("$", Dollar),
            ("#", Hash),
            ("%", Percent),
            ("-", Minus),
            ("--", NDash),
            ("---", MDash),
            ("em", Emphasis),
            ("a", Emphasis),
            ("b", Bold),
            ("c", Code),
            ("sa", Sa),
            ("see", Sa),
            ("return", Return),
            ("returns", Return),
            ("author", Author),
            ("authors", Author),
            ("version", Version),
            ("since", Since),
            ("date", Date),
            ("note", Note),
            ("warning", Warning),
            ("pre", Pre),
            ("post", Post),
            ("invariant", Invariant),
            ("remark", Remark),
            ("remarks", Remark),
            ("attention", Attention),
            ("par", Par),
            ("param", Param),
            ("retval", RetVal),
            ("exception", Exception),
            ("throw", Exception),
            ("throws", Exception),
            ("bug", Bug),
            ("todo", Todo),
            ("test", Test),
            ("deprecated", Deprecated),
            ("section", Section),
            ("subsection", Subsection),
            ("internal", Internal),
            ("li", Li),
            ("n", LineBreak),
            ("anchor", Anchor),
            ("addindex", AddIndex),
            ("copydoc", CopyDoc),
            ("copybrief", CopyDoc),
            ("copydetails", CopyDoc),
            ("ref", Ref),
            ("subpage", Ref),
            ("secreflist", SecRefList),
            ("secrefitem", SecRefItem),
            ("endsecreflist", EndSecRefList),
            ("link", Link),
            ("javalink", JavaLink),
            ("endlink", EndLink),
            ("image", Image),
            ("dotfile", DotFile),
            ("f", Formula),
            ("~", LangSwitch),
            ("startcode", StartCode),
            ("code", StartCode),
            ("htmlonly", HtmlOnly),
            ("latexonly", LatexOnly),
            ("verbatim", Verbatim),
            ("endcode", EndCode),
            ("endhtmlonly", EndHtmlOnly),
            ("endlatexonly", EndLatexOnly),
            ("endverbatim", EndVerbatim),
            ("include", Include),
            ("dontinclude", DontInclude),
            ("htmlinclude", HtmlInclude),
            ("verbinclude", VerbInclude),
            ("skip", Skip),
            ("skipline", SkipLine),
            ("until", Until),
            ("line", Line),
        ])
    })
}

pub fn lookup_command(name: &str) -> CommandId {
    command_map().get(name).copied().unwrap_or(CommandId::Unknown)
}

/// HTML tag identifiers the block/inline handlers dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlTagId {
    Ul,
    Ol,
    Li,
    Pre,
    P,
    Dl,
    Dt,
    Dd,
    Table,
    Tr,
    Td,
    Th,
    Caption,
    Br,
    Hr,
    A,
    H1,
    H2,
    H3,
    Img,
    B,
    Em,
    Code,
    Sub,
    Sup,
    Center,
    Small,
    Unknown,
}

pub fn lookup_html_tag(name: &str) -> HtmlTagId {
    use HtmlTagId::*;
    match name {
        "ul" => Ul,
        "ol" => Ol,
        "li" => Li,
        "pre" => Pre,
        "p" => P,
        "dl" => Dl,
        "dt" => Dt,
        "dd" => Dd,
        "table" => Table,
        "tr" => Tr,
        "td" => Td,
        "th" => Th,
        "caption" => Caption,
        "br" => Br,
        "hr" => Hr,
        "a" => A,
        "h1" => H1,
        "h2" => H2,
        "h3" => H3,
        "img" => Img,
        "b" | "strong" => B,
        "em" | "i" => Em,
        "code" | "tt" => Code,
        "sub" => Sub,
        "sup" => Sup,
        "center" => Center,
        "small" => Small,
        _ => Unknown,
    }
}

impl HtmlTagId {
    /// The inline style subset of spec.md §4.2's HTMLTAG branch.
    pub fn as_style(self) -> Option<crate::ast::StyleKind> {
        use crate::ast::StyleKind;
        match self {
            HtmlTagId::B => Some(StyleKind::Bold),
            HtmlTagId::Em => Some(StyleKind::Italic),
            HtmlTagId::Code => Some(StyleKind::Code),
            HtmlTagId::Sub => Some(StyleKind::Subscript),
            HtmlTagId::Sup => Some(StyleKind::Superscript),
            HtmlTagId::Center => Some(StyleKind::Center),
            HtmlTagId::Small => Some(StyleKind::Small),
            _ => None,
        }
    }
}

/// Decodes `&name;` entity text into a symbol kind plus, for the accented
/// letter family, the ASCII letter the diacritic applies to. Mirrors
/// `DocSymbol::decodeSymbol` in `examples/original_source/src/docparser.cpp`
/// exactly (spec.md §6 "Symbol table").
pub fn decode_symbol(sym_name: &str) -> Option<(SymbolKind, Option<char>)> {
    use SymbolKind::*;
    match sym_name {
        "&copy;" => return Some((Copy, None)),
        "&lt;" => return Some((Less, None)),
        "&gt;" => return Some((Greater, None)),
        "&amp;" => return Some((Amp, None)),
        "&apos;" => return Some((Apos, None)),
        "&quot;" => return Some((Quot, None)),
        "&szlig;" => return Some((Szlig, None)),
        "&nbsp;" => return Some((Nbsp, None)),
        _ => {}
    }
    let l = sym_name.len();
    let bytes = sym_name.as_bytes();
    if l < 3 || bytes[0] != b'&' || bytes[l - 1] != b';' {
        return None;
    }
    let letter = sym_name.chars().nth(1)?;
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    let suffix = &sym_name[2..l - 1];
    let kind = match suffix {
        "uml" => Uml,
        "acute" => Acute,
        "grave" => Grave,
        "circ" => Circ,
        "tilde" => Tilde,
        "cedil" => Cedil,
        "ring" => Ring,
        _ => return None,
    };
    Some((kind, Some(letter)))
}

/// The section level a section id is classified as. The full registry
/// (mapping ids to titles, files, etc.) is an external collaborator per
/// spec.md §1; this is the narrow slice the parser actually consumes:
/// whether a given `\section`/`\subsection` command classifies as level 1
/// or level 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Section,
    Subsection,
}

impl SectionType {
    pub fn level(self) -> u8 {
        match self {
            SectionType::Section => 1,
            SectionType::Subsection => 2,
        }
    }
}

/// Minimal in-memory section registry. A real deployment would share one
/// global registry across an entire documentation set (spec.md §1 places
/// this out of the core's scope); a parse only needs to know the type of
/// the section command it just saw, which the command id already encodes.
#[derive(Debug, Default)]
pub struct SectionRegistry {
    entries: HashMap<String, SectionType>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        SectionRegistry::default()
    }

    pub fn register(&mut self, id: impl Into<String>, ty: SectionType) {
        self.entries.insert(id.into(), ty);
    }

    pub fn type_of(&self, id: &str) -> Option<SectionType> {
        self.entries.get(id).copied()
    }
}
