//! The debug channel (spec.md §6): a process-wide flag set gating optional
//! post-parse tree printing, mirroring Doxygen's `Debug::isFlagSet`.
//!
//! Kept dependency-light on purpose: the library itself never pulls in
//! `log`, so printing here goes straight to stderr. `log`/`env_logger` are
//! reserved for the CLI binary (DESIGN.md).

use crate::ast::DocTree;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugFlag {
    PrintTree,
}

static PRINT_TREE: AtomicBool = AtomicBool::new(false);

pub fn set(flag: DebugFlag, on: bool) {
    match flag {
        DebugFlag::PrintTree => PRINT_TREE.store(on, Ordering::Relaxed),
    }
}

pub fn is_set(flag: DebugFlag) -> bool {
    match flag {
        DebugFlag::PrintTree => PRINT_TREE.load(Ordering::Relaxed),
    }
}

/// Prints an indented ASCII rendering of `tree` to stderr.
pub fn print_tree(tree: &DocTree) {
    print_node(tree.root(), 0);
}

fn print_node(node: ego_tree::NodeRef<'_, crate::ast::DocNode>, depth: usize) {
    eprintln!("{}{:?}", "  ".repeat(depth), node.value());
    for child in node.children() {
        print_node(child, depth + 1);
    }
}
