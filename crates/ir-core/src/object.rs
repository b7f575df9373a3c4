use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::identifier::Identifier;
use crate::loc::Loc;
use crate::node::Node;

/// One translated code object: a flat list of basic blocks at this scope's
/// top level, plus the nested scopes (comprehensions, functions, classes)
/// translated from its `co_consts` code constants.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: Identifier,
    pub toplevel: Vec<Node>,
    pub objects: Vec<(Loc, Object)>,
    pub classes: BTreeSet<String>,
    pub functions: IndexMap<String, Identifier>,
}

impl Object {
    pub fn new(name: Identifier) -> Self {
        Self {
            name,
            toplevel: Vec::new(),
            objects: Vec::new(),
            classes: BTreeSet::new(),
            functions: IndexMap::new(),
        }
    }
}
