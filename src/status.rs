//! The closed status-code alphabet every production returns (spec.md §4.8).
//!
//! Modeled as a single enum rather than an untyped integer so a caller's
//! `match` is exhaustiveness-checked at compile time (spec.md §9
//! "Status-code return protocol"). Names follow spec.md's own alphabet;
//! where the original names the lexer-token form and the production-status
//! form the same token family (`LISTITEM` vs `ListItem`, `ENDLIST` vs
//! `EndList`) the two are kept as distinct variants here too, since they are
//! consumed by different callers (auto-list vs. html/simple-list).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// End of stream.
    Eos,
    Ok,
    NewPara,
    /// Raw `LISTITEM` token bubbled up by the paragraph loop: a new
    /// auto-list item line was seen.
    ListItemToken,
    /// Raw `ENDLIST` token bubbled up by the paragraph loop: an auto-list
    /// dedented below its own indent.
    EndListToken,
    /// `<li>`/simple-list-command item boundary.
    ListItem,
    EndList,
    EndPre,
    EndDesc,
    EndTable,
    DescTitle,
    DescData,
    TableRow,
    TableCell,
    TableHCell,
    Section,
    Internal,
    SimpleSec,
    SwitchLang,
}
