//! The closed set of AST node variants (spec.md §3).
//!
//! Nodes are stored in an [`ego_tree::Tree`]: the arena gives every node a
//! stable [`NodeId`] and a non-owning parent walk for free, so ancestor
//! predicates (§4.1) need no weak references or manual cycle management.
//! Children are owned in insertion order by their parent, exactly as
//! spec.md requires.

use ego_tree::Tree;
use serde::{Deserialize, Serialize};

pub type NodeId = ego_tree::NodeId;
pub type DocTree = Tree<DocNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleKind {
    Bold,
    Italic,
    Code,
    Center,
    Small,
    Subscript,
    Superscript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Copy,
    Less,
    Greater,
    Amp,
    Apos,
    Quot,
    Szlig,
    Nbsp,
    BSlash,
    At,
    Dollar,
    Hash,
    Percent,
    Minus,
    NDash,
    MDash,
    /// Accented-letter entities (`&ouml;`, `&eacute;`, ...); `letter` is the
    /// base ASCII letter the diacritic applies to.
    Uml,
    Acute,
    Grave,
    Circ,
    Tilde,
    Cedil,
    Ring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XRefKind {
    Bug,
    Todo,
    Test,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncludeKind {
    Include,
    DontInclude,
    HtmlInclude,
    VerbInclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncOperatorKind {
    Skip,
    Until,
    SkipLine,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerbatimKind {
    Code,
    HtmlOnly,
    LatexOnly,
    Verbatim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRenderer {
    Html,
    Latex,
    Rtf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtmlListKind {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimpleSectKind {
    See,
    Return,
    Author,
    Version,
    Since,
    Date,
    Note,
    Warning,
    Pre,
    Post,
    Invar,
    Remark,
    Attention,
    User,
    Param,
    RetVal,
    Exception,
}

impl SimpleSectKind {
    /// Param/RetVal/Exception carry a parameter-name list alongside their
    /// body paragraph; every other kind owns only the body.
    pub fn has_parameter_list(self) -> bool {
        matches!(
            self,
            SimpleSectKind::Param | SimpleSectKind::RetVal | SimpleSectKind::Exception
        )
    }
}

/// The closed set of AST node variants from spec.md §3. Every node owns its
/// children in insertion order (held by the surrounding `ego_tree::Tree`,
/// not inline in this enum); leaf/inline-container fields that are
/// themselves data (text, ids, flags) are carried directly here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocNode {
    // --- Leaves -----------------------------------------------------
    Word(String),
    WhiteSpace(String),
    Url(String),
    Symbol(SymbolKind, Option<char>),
    LineBreak,
    HorRuler,
    Anchor(String),
    Formula(i64),
    XRefItem(i64, XRefKind),
    Include {
        file: String,
        kind: IncludeKind,
        is_block: bool,
    },
    IncOperator(IncOperatorKind, String),
    Verbatim(String, VerbatimKind),
    Copy(String),
    StyleChange {
        style: StyleKind,
        depth: u32,
        is_open: bool,
    },

    // --- Inline containers -------------------------------------------
    HRef(String),
    Ref(String),
    Link(String),
    Image(String, ImageRenderer),
    DotFile(String),
    IndexEntry,
    SecRefItem(String),
    HtmlCaption,
    HtmlHeader(u8),
    HtmlDescTitle,
    Title,

    // --- Block containers ---------------------------------------------
    Para,
    AutoListItem,
    AutoList {
        indent: i32,
        is_enumerated: bool,
    },
    SimpleListItem,
    SimpleList,
    HtmlListItem,
    HtmlList(HtmlListKind),
    HtmlDescData,
    HtmlDescList,
    HtmlCell {
        is_heading: bool,
    },
    HtmlRow,
    HtmlTable,
    HtmlPre,
    SecRefList,
    Internal,
    Language(String),
    SimpleSect {
        kind: SimpleSectKind,
        /// Parameter names, populated only when `kind.has_parameter_list()`.
        parameters: Vec<String>,
    },
    /// `level` is 1 for a top-level section, 2 for a subsection (spec.md
    /// §3 "Section nesting"). `title` is the supplemental one-line title
    /// captured after the section id (SPEC_FULL.md §4 addition).
    Section {
        level: u8,
        id: String,
        title: Option<String>,
    },
    Root,
}

impl DocNode {
    pub fn is_html_list_item(&self) -> bool {
        matches!(self, DocNode::HtmlListItem)
    }
    pub fn is_html_cell(&self) -> bool {
        matches!(self, DocNode::HtmlCell { .. })
    }
    pub fn is_section(&self) -> bool {
        matches!(self, DocNode::Section { .. })
    }
}

pub fn new_tree() -> DocTree {
    Tree::new(DocNode::Root)
}
