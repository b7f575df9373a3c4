//! Usability wrapper around `pybc-ir-core` and `pybc-translate`: one entry
//! point from a decoded code object to an `Object` tree, the way
//! `rustpython-compiler`'s `compile` function wraps the parser and
//! codegen crates behind a single call.

pub mod printer;

pub use pybc_ir_core as ir;
pub use pybc_translate as translate;

pub use pybc_ir_core::{CodeObject, Object};
pub use pybc_translate::{Severity, TranslateError, TranslateErrorKind, TranslateOpts};
pub use printer::display_object;

/// Translate a decoded code object into its `Object` tree.
pub fn translate_code_object(
    code: &CodeObject,
    opts: TranslateOpts,
) -> Result<Object, TranslateError> {
    pybc_translate::translate(code, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pybc_ir_core::{RawConstant, RawInstruction};

    fn code_object(instructions: Vec<RawInstruction>, consts: Vec<RawConstant>) -> CodeObject {
        CodeObject {
            co_consts: consts,
            co_names: Vec::new(),
            co_varnames: Vec::new(),
            co_cellvars: Vec::new(),
            co_freevars: Vec::new(),
            co_name: "<module>".into(),
            co_filename: "./mod.py".into(),
            instructions,
        }
    }

    #[test]
    fn translates_a_trivial_module() {
        let code = code_object(
            vec![
                RawInstruction {
                    opname: "LOAD_CONST".into(),
                    arg: 0,
                    offset: 0,
                    starts_line: Some(1),
                    is_jump_target: false,
                },
                RawInstruction {
                    opname: "RETURN_VALUE".into(),
                    arg: 0,
                    offset: 2,
                    starts_line: Some(1),
                    is_jump_target: false,
                },
            ],
            vec![RawConstant::Null],
        );
        let object = translate_code_object(&code, TranslateOpts::default()).unwrap();
        assert_eq!(object.toplevel.len(), 1);
        assert_eq!(object.name.to_string(), "mod");
    }
}
