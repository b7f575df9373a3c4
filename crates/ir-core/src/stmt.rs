use crate::expr::{BuiltinCaller, Expression, ImportDescriptor};
use crate::ssa::SsaName;

/// A single call argument: `name` is set only for keyword arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expression,
}

impl Argument {
    pub fn positional(value: Expression) -> Self {
        Self { name: None, value }
    }

    pub fn keyword(name: impl Into<String>, value: Expression) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

/// A side-effecting operation. Every `Statement` binds zero or one SSA
/// temporary and appears in the exact order the interpreter emitted it
/// (imports and stores are ordering-sensitive — see the translator's
/// ordering guarantee).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign {
        lhs: Expression,
        rhs: Expression,
    },
    Call {
        lhs: SsaName,
        callee: Expression,
        args: Vec<Argument>,
    },
    CallMethod {
        lhs: SsaName,
        callee: Expression,
        args: Vec<Argument>,
    },
    /// Side-effect marker emitted alongside the `ImportName` expression
    /// pushed for `IMPORT_NAME`, so the downstream emitter sees the import
    /// happen even if its result is never assigned anywhere.
    ImportName(ImportDescriptor),
    BuiltinCall {
        lhs: SsaName,
        call: BuiltinCaller,
        args: Vec<Argument>,
    },
    SetupAnnotations,
}
