use std::collections::BTreeSet;

use indexmap::IndexMap;
use pybc_ir_core::{Expression, Identifier, Loc, SsaCounter, SsaName, Statement};

use crate::label::CfgRegistry;
use crate::names::NameTables;
use crate::stack::SymbolicStack;

/// Everything the interpreter threads through one code object's
/// translation. A nested code object (a function body, a class body, a
/// comprehension) gets a fresh `TranslatorState`, built by
/// `TranslatorState::nested`, which inherits only the immutable name
/// tables from its parent — nothing else carries over; each nested code
/// object is translated independently.
pub struct TranslatorState {
    pub module_name: String,
    pub cursor: Loc,
    pub cfg: CfgRegistry,
    pub names: NameTables,
    pub stack: SymbolicStack,
    pub pending: Vec<(Loc, Statement)>,
    pub ssa: SsaCounter,
    pub classes: BTreeSet<String>,
    pub functions: IndexMap<String, Identifier>,
    pub debug: bool,
}

impl TranslatorState {
    pub fn new_module(module_name: impl Into<String>, debug: bool) -> Self {
        Self {
            module_name: module_name.into(),
            cursor: Loc::default(),
            cfg: CfgRegistry::new(),
            names: NameTables::new_module(),
            stack: SymbolicStack::new(),
            pending: Vec::new(),
            ssa: SsaCounter::new(),
            classes: BTreeSet::new(),
            functions: IndexMap::new(),
            debug,
        }
    }

    /// A fresh state for a nested code object reached under `qualified_module`
    /// (the parent module name extended by the inner code object's own
    /// name), inheriting only the parent's name tables.
    pub fn nested(&self, qualified_module: impl Into<String>) -> Self {
        Self {
            module_name: qualified_module.into(),
            cursor: Loc::default(),
            cfg: CfgRegistry::new(),
            names: NameTables::new_nested(&self.names),
            stack: SymbolicStack::new(),
            pending: Vec::new(),
            ssa: SsaCounter::new(),
            classes: BTreeSet::new(),
            functions: IndexMap::new(),
            debug: self.debug,
        }
    }

    pub fn fresh_ssa(&mut self) -> SsaName {
        self.ssa.fresh()
    }

    pub fn emit(&mut self, stmt: Statement) {
        self.pending.push((self.cursor, stmt));
    }

    /// Record a freshly defined function's short name against its full
    /// qualified identifier, as `MAKE_FUNCTION` does.
    pub fn register_function(&mut self, short_name: impl Into<String>, qualname: Identifier) {
        self.functions.insert(short_name.into(), qualname);
    }

    pub fn register_class(&mut self, short_name: impl Into<String>) {
        self.classes.insert(short_name.into());
    }

    /// Drain the pending statement buffer — called when a block closes.
    pub fn take_pending(&mut self) -> Vec<(Loc, Statement)> {
        std::mem::take(&mut self.pending)
    }

    pub fn push(&mut self, value: Expression) {
        self.stack.push(value);
    }
}
