use crate::loc::Loc;
use crate::stmt::Statement;
use crate::terminator::Terminator;

/// A basic block: straight-line statements followed by exactly one
/// terminator. `label` is the offset-derived name this block was reached
/// under (see `pybc_translate::label::Label`).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub label_loc: Loc,
    pub last_loc: Loc,
    pub stmts: Vec<(Loc, Statement)>,
    pub last: Terminator,
}

impl Node {
    pub fn new(label: impl Into<String>, label_loc: Loc) -> NodeBuilder {
        NodeBuilder {
            label: label.into(),
            label_loc,
            stmts: Vec::new(),
        }
    }
}

/// Accumulates statements for one block before it is closed with a
/// terminator. Mirrors how the interpreter actually builds a block: push
/// statements as they're emitted, then finish once a terminator is reached.
pub struct NodeBuilder {
    label: String,
    label_loc: Loc,
    stmts: Vec<(Loc, Statement)>,
}

impl NodeBuilder {
    pub fn push(&mut self, loc: Loc, stmt: Statement) {
        self.stmts.push((loc, stmt));
    }

    pub fn finish(self, last_loc: Loc, last: Terminator) -> Node {
        Node {
            label: self.label,
            label_loc: self.label_loc,
            last_loc,
            stmts: self.stmts,
            last,
        }
    }
}
