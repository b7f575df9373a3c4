//! Abstract interpreter that lowers one CPython-shaped bytecode stream
//! into the register/SSA control-flow-graph IR defined by `pybc-ir-core`.
//!
//! The entry point is [`translate`]: give it a decoded [`CodeObject`] and
//! get back an [`Object`] tree, or the first [`TranslateError`]
//! encountered (translation short-circuits — nothing partial is ever
//! returned).

pub mod assemble;
pub mod error;
pub mod interpreter;
pub mod label;
pub mod names;
pub mod stack;
pub mod state;

pub use error::{Severity, TranslateError, TranslateErrorKind};
pub use state::TranslatorState;

use pybc_ir_core::{CodeObject, Object};

/// Options that change how translation runs without changing its result
/// shape — currently just whether each instruction is traced via `log`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateOpts {
    pub debug: bool,
}

/// Translate a decoded module-level code object into its `Object` tree.
pub fn translate(code: &CodeObject, opts: TranslateOpts) -> Result<Object, TranslateError> {
    let module_name = assemble::module_name_from_filename(&code.co_filename);
    let mut state = TranslatorState::new_module(module_name, opts.debug);
    assemble::mk_object(&mut state, code, &code.co_filename)
}
