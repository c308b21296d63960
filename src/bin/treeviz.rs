//! Documentation comment tree visualization CLI.
//!
//! A command line tool that takes a file containing an inline
//! documentation comment, parses it, and prints the resulting AST.
//!
//! Usage:
//!   docblock-treeviz <input-file> [options]

use clap::Parser;
use docblock_parser::diagnostics::TermSink;
use docblock_parser::{debug, validating_parse_doc_with_sink};
use std::fs;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docblock-treeviz", version, about = "Parses an inline documentation comment and prints its AST")]
struct Cli {
    /// Input file to parse.
    input: String,

    /// 1-based line number the input's first line is attributed to in
    /// diagnostics.
    #[arg(long, default_value_t = 1)]
    start_line: u32,

    /// Print the parsed tree after a successful parse.
    #[arg(long)]
    debug_print_tree: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let input = match fs::read_to_string(&cli.input) {
        Ok(contents) => contents,
        Err(err) => {
            log::error!("failed to read {}: {err}", cli.input);
            return ExitCode::FAILURE;
        }
    };

    if cli.debug_print_tree {
        debug::set(debug::DebugFlag::PrintTree, true);
    }

    let mut sink = TermSink::new();
    let tree = validating_parse_doc_with_sink(&cli.input, cli.start_line, &input, &mut sink);

    log::info!("parsed {} ({} nodes)", cli.input, tree.nodes().count());
    ExitCode::SUCCESS
}
