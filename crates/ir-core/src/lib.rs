//! Data model shared by the bytecode translator.
//!
//! This crate holds no interpreter logic: everything here is a plain,
//! cloneable description of the IR the translator (`pybc-translate`)
//! produces, plus the decoded-code-object shape it consumes.

pub mod constant;
pub mod expr;
pub mod identifier;
pub mod input;
pub mod loc;
pub mod node;
pub mod object;
pub mod ssa;
pub mod stmt;
pub mod terminator;

pub use constant::Constant;
pub use expr::{BinOp, BuiltinCaller, CollectionKind, CompareOp, Expression, ImportDescriptor, UnOp};
pub use identifier::{Identifier, IdentifierKind};
pub use input::{CodeObject, RawConstant, RawInstruction};
pub use loc::Loc;
pub use node::Node;
pub use object::Object;
pub use ssa::SsaName;
pub use stmt::{Argument, Statement};
pub use terminator::{NodeCall, Terminator};
