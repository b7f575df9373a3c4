use indexmap::IndexMap;
use pybc_ir_core::Identifier;

/// The builtins pre-seeded into every module's `globals` table. These are
/// the names a translated program can reference without ever having bound
/// them itself.
const GLOBAL_BUILTINS: &[&str] = &[
    "print", "range", "open", "len", "type", "str", "int", "float", "bool", "object", "super",
    "hasattr", "__name__", "__file__",
];

/// The builtins pre-seeded into every code object's `locals` table.
const LOCAL_BUILTINS: &[&str] = &["__name__", "staticmethod"];

/// The two name tables a `TranslatorState` owns: `globals` (module-level
/// bindings) and `locals` (bindings local to the current code object).
/// Both are `IndexMap`s so resolution order — and any diagnostic that
/// walks them — is deterministic and matches registration order.
#[derive(Debug, Clone)]
pub struct NameTables {
    pub globals: IndexMap<String, Identifier>,
    pub locals: IndexMap<String, Identifier>,
    /// True for a module's top-level code object: every read/write goes
    /// through `globals` regardless of the `global?` flag an opcode passes.
    pub is_module_toplevel: bool,
}

impl NameTables {
    /// Fresh tables for a module's top-level code object.
    pub fn new_module() -> Self {
        let mut globals = IndexMap::new();
        for name in GLOBAL_BUILTINS {
            globals.insert((*name).to_string(), Identifier::builtin(*name));
        }
        let mut locals = IndexMap::new();
        for name in LOCAL_BUILTINS {
            locals.insert((*name).to_string(), Identifier::builtin(*name));
        }
        Self {
            globals,
            locals,
            is_module_toplevel: true,
        }
    }

    /// Fresh tables for a nested code object: inherits only the `globals`
    /// table (by value — nested scopes never mutate their parent's), gets
    /// its own `locals` reseeded with the same builtins every state starts
    /// with (see `new_module`) rather than an empty table.
    pub fn new_nested(parent: &NameTables) -> Self {
        let mut locals = IndexMap::new();
        for name in LOCAL_BUILTINS {
            locals.insert((*name).to_string(), Identifier::builtin(*name));
        }
        Self {
            globals: parent.globals.clone(),
            locals,
            is_module_toplevel: false,
        }
    }

    /// Module top level always resolves through `globals`; otherwise
    /// `global` selects `globals`, and a plain local lookup falls back to
    /// `globals` on a miss.
    pub fn resolve(&self, name: &str, global: bool) -> Identifier {
        if self.is_module_toplevel || global {
            self.globals
                .get(name)
                .cloned()
                .unwrap_or_else(|| Identifier::unknown(name))
        } else {
            self.locals
                .get(name)
                .or_else(|| self.globals.get(name))
                .cloned()
                .unwrap_or_else(|| Identifier::unknown(name))
        }
    }

    /// Same top-level-forces-global rule as `resolve`.
    pub fn register(&mut self, name: impl Into<String>, id: Identifier, global: bool) {
        let name = name.into();
        if self.is_module_toplevel || global {
            self.globals.insert(name, id);
        } else {
            self.locals.insert(name, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_toplevel_ignores_global_flag() {
        let tables = NameTables::new_module();
        let a = tables.resolve("x", true);
        let b = tables.resolve("x", false);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_name_is_flagged() {
        let tables = NameTables::new_module();
        let id = tables.resolve("totally_unbound", false);
        assert_eq!(id.to_string(), "$unknown.totally_unbound");
    }

    #[test]
    fn nested_scope_falls_back_to_globals() {
        let mut parent = NameTables::new_module();
        parent.register("g", Identifier::normal("g"), true);
        let nested = NameTables::new_nested(&parent);
        assert_eq!(nested.resolve("g", false), Identifier::normal("g"));
    }
}
