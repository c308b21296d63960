//! Table-driven checks for the command-name lookup spec.md §3 calls an
//! "external collaborator": every name a command dispatcher branches on
//! must resolve to the `CommandId` variant the dispatcher expects.

use docblock_parser::tables::{lookup_command, CommandId};
use rstest::rstest;

#[rstest]
#[case("\\", CommandId::BSlash)]
#[case("@", CommandId::At)]
#[case("~", CommandId::LangSwitch)]
#[case("b", CommandId::Bold)]
#[case("em", CommandId::Emphasis)]
#[case("a", CommandId::Emphasis)]
#[case("c", CommandId::Code)]
#[case("section", CommandId::Section)]
#[case("subsection", CommandId::Subsection)]
#[case("param", CommandId::Param)]
#[case("return", CommandId::Return)]
#[case("returns", CommandId::Return)]
#[case("sa", CommandId::Sa)]
#[case("see", CommandId::Sa)]
#[case("ref", CommandId::Ref)]
#[case("subpage", CommandId::Ref)]
#[case("code", CommandId::StartCode)]
#[case("endcode", CommandId::EndCode)]
#[case("htmlonly", CommandId::HtmlOnly)]
#[case("include", CommandId::Include)]
#[case("throw", CommandId::Exception)]
#[case("throws", CommandId::Exception)]
fn lookup_command_resolves_known_names(#[case] name: &str, #[case] expected: CommandId) {
    assert_eq!(lookup_command(name), expected);
}

#[rstest]
#[case("")]
#[case("bogus")]
#[case("SECTION")]
#[case("params")]
fn lookup_command_falls_back_to_unknown(#[case] name: &str) {
    assert_eq!(lookup_command(name), CommandId::Unknown);
}

#[rstest]
#[case("sa", "see")]
#[case("return", "returns")]
#[case("author", "authors")]
#[case("remark", "remarks")]
#[case("throw", "throws")]
#[case("copydoc", "copybrief")]
#[case("ref", "subpage")]
fn aliases_share_the_same_command_id(#[case] primary: &str, #[case] alias: &str) {
    assert_eq!(lookup_command(primary), lookup_command(alias));
}
