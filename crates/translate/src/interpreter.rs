//! The abstract interpreter: one function per opcode family, each taking
//! the current `TranslatorState` and producing either more pending
//! statements and a stack push (`Flow::Continue`) or the block's
//! terminator (`Flow::Terminal`). `pybc_translate::assemble` drives this
//! instruction-by-instruction to build up `Node`s.

use indexmap::IndexMap;
use log::trace;
use pybc_ir_core::{
    Argument, BinOp, BuiltinCaller, CodeObject, CollectionKind, CompareOp, Constant, Expression,
    NodeCall, RawInstruction, Statement, Terminator, UnOp,
};

use crate::error::{Severity, TranslateError, TranslateErrorKind};
use crate::label::Prelude;
use crate::state::TranslatorState;

pub enum Flow {
    Continue,
    Terminal(Terminator),
}

fn describe(e: &Expression) -> String {
    e.to_string()
}

fn err(
    state: &TranslatorState,
    severity: Severity,
    kind: TranslateErrorKind,
    source_path: &str,
) -> TranslateError {
    TranslateError::new(state.cursor, severity, kind, source_path)
}

fn binop_from_suffix(suffix: &str) -> Option<BinOp> {
    Some(match suffix {
        "ADD" => BinOp::Add,
        "AND" => BinOp::And,
        "FLOOR_DIVIDE" => BinOp::FloorDivide,
        "LSHIFT" => BinOp::LShift,
        "MATRIX_MULTIPLY" => BinOp::MatrixMultiply,
        "MODULO" => BinOp::Modulo,
        "MULTIPLY" => BinOp::Multiply,
        "OR" => BinOp::Or,
        "POWER" => BinOp::Power,
        "RSHIFT" => BinOp::RShift,
        "SUBTRACT" => BinOp::Subtract,
        "TRUE_DIVIDE" => BinOp::TrueDivide,
        "XOR" => BinOp::Xor,
        _ => return None,
    })
}

fn unop_from_suffix(suffix: &str) -> Option<UnOp> {
    Some(match suffix {
        "POSITIVE" => UnOp::Positive,
        "NEGATIVE" => UnOp::Negative,
        "NOT" => UnOp::Not,
        "INVERT" => UnOp::Invert,
        _ => return None,
    })
}

/// Interpret one instruction against `state`. `next_offset` is the offset
/// of the instruction immediately following `instr` in the stream (needed
/// by every opcode whose target is relative, or that falls through).
pub fn exec(
    state: &mut TranslatorState,
    code: &CodeObject,
    instr: &RawInstruction,
    next_offset: u32,
    source_path: &str,
) -> Result<Flow, TranslateError> {
    state.cursor = pybc_ir_core::Loc::new(instr.offset, instr.starts_line);
    if state.debug {
        trace!(
            "{source_path}: {:>6} {:<24} arg={} stack={}",
            instr.offset,
            instr.opname,
            instr.arg,
            state.stack.len()
        );
    }

    let op = instr.opname.as_str();
    let arg = instr.arg;

    macro_rules! pop {
        () => {
            state
                .stack
                .pop(op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?
        };
    }
    macro_rules! bail {
        ($severity:expr, $kind:expr) => {
            return Err(err(state, $severity, $kind, source_path))
        };
    }

    if let Some(suffix) = op.strip_prefix("BINARY_") {
        if let Some(bin) = binop_from_suffix(suffix) {
            let rhs = pop!();
            let lhs = pop!();
            let ssa = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa,
                call: BuiltinCaller::Binary(bin),
                args: vec![Argument::positional(lhs), Argument::positional(rhs)],
            });
            state.push(Expression::Temp(ssa));
            return Ok(Flow::Continue);
        }
    }
    if let Some(suffix) = op.strip_prefix("INPLACE_") {
        if let Some(bin) = binop_from_suffix(suffix) {
            let rhs = pop!();
            let lhs = pop!();
            let ssa = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa,
                call: BuiltinCaller::Inplace(bin),
                args: vec![Argument::positional(lhs), Argument::positional(rhs)],
            });
            state.push(Expression::Temp(ssa));
            return Ok(Flow::Continue);
        }
    }
    if let Some(suffix) = op.strip_prefix("UNARY_") {
        if let Some(un) = unop_from_suffix(suffix) {
            let operand = pop!();
            let ssa = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa,
                call: BuiltinCaller::Unary(un),
                args: vec![Argument::positional(operand)],
            });
            state.push(Expression::Temp(ssa));
            return Ok(Flow::Continue);
        }
    }

    match op {
        "LOAD_CONST" => {
            let raw = &code.co_consts[arg as usize];
            state.push(Expression::Const(raw.normalize()));
            Ok(Flow::Continue)
        }

        "LOAD_NAME" | "LOAD_GLOBAL" => {
            let name = &code.co_names[arg as usize];
            let id = state.names.resolve(name, op == "LOAD_GLOBAL");
            state.push(Expression::Var(id));
            Ok(Flow::Continue)
        }

        "LOAD_FAST" => {
            let name = code.co_varnames[arg as usize].clone();
            state.push(Expression::LocalVar(name));
            Ok(Flow::Continue)
        }

        "LOAD_ATTR" => {
            let name = code.co_names[arg as usize].clone();
            let obj = pop!();
            state.push(obj.get_attr(name));
            Ok(Flow::Continue)
        }

        "STORE_NAME" => {
            let name = code.co_names[arg as usize].clone();
            let rhs = pop!();
            let id = match &rhs {
                Expression::ImportName(desc) => pybc_ir_core::Identifier::imported(desc.id.clone()),
                Expression::ImportFrom { from, name: attr } => match from.as_ref() {
                    Expression::ImportName(desc) => {
                        let mut id = pybc_ir_core::Identifier::imported(desc.id.clone());
                        id.extend(attr.clone());
                        id
                    }
                    _ => pybc_ir_core::Identifier::imported(attr.clone()),
                },
                _ => {
                    let mut id = pybc_ir_core::Identifier::normal(state.module_name.clone());
                    id.extend(name.clone());
                    id
                }
            };
            state.emit(Statement::Assign {
                lhs: Expression::Var(id.clone()),
                rhs,
            });
            state.names.register(name, id, false);
            Ok(Flow::Continue)
        }

        "STORE_GLOBAL" => {
            let name = code.co_names[arg as usize].clone();
            let rhs = pop!();
            let mut id = pybc_ir_core::Identifier::normal(state.module_name.clone());
            id.extend(name.clone());
            state.emit(Statement::Assign {
                lhs: Expression::Var(id.clone()),
                rhs,
            });
            state.names.register(name, id, true);
            Ok(Flow::Continue)
        }

        "STORE_FAST" => {
            let name = code.co_varnames[arg as usize].clone();
            let rhs = pop!();
            state.emit(Statement::Assign {
                lhs: Expression::LocalVar(name),
                rhs,
            });
            Ok(Flow::Continue)
        }

        "STORE_ATTR" => {
            let name = code.co_names[arg as usize].clone();
            let obj = pop!();
            let rhs = pop!();
            state.emit(Statement::Assign {
                lhs: obj.get_attr(name),
                rhs,
            });
            Ok(Flow::Continue)
        }

        "STORE_SUBSCR" => {
            let index = pop!();
            let obj = pop!();
            let rhs = pop!();
            state.emit(Statement::Assign {
                lhs: obj.subscript(index),
                rhs,
            });
            Ok(Flow::Continue)
        }

        "POP_TOP" => {
            let value = pop!();
            match value {
                Expression::ImportName(_) | Expression::Temp(_) => {}
                other => {
                    let ssa = state.fresh_ssa();
                    state.emit(Statement::Assign {
                        lhs: Expression::Temp(ssa),
                        rhs: other,
                    });
                }
            }
            Ok(Flow::Continue)
        }

        "DUP_TOP" => {
            let top = state
                .stack
                .peek(op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?
                .clone();
            state.push(top);
            Ok(Flow::Continue)
        }

        "COMPARE_OP" => {
            let cmp = CompareOp::from_index(arg)
                .ok_or_else(|| err(state, Severity::External, TranslateErrorKind::CompareOp(arg), source_path))?;
            let rhs = pop!();
            let lhs = pop!();
            let ssa = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa,
                call: BuiltinCaller::Compare(cmp),
                args: vec![Argument::positional(lhs), Argument::positional(rhs)],
            });
            state.push(Expression::Temp(ssa));
            Ok(Flow::Continue)
        }

        "BUILD_LIST" | "BUILD_SET" | "BUILD_TUPLE" | "BUILD_SLICE" | "BUILD_STRING" => {
            let kind = match op {
                "BUILD_LIST" => CollectionKind::List,
                "BUILD_SET" => CollectionKind::Set,
                "BUILD_TUPLE" => CollectionKind::Tuple,
                "BUILD_SLICE" => CollectionKind::Slice,
                _ => CollectionKind::String,
            };
            let values = state
                .stack
                .pop_n(arg as usize, op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?;
            state.push(Expression::Collection { kind, values });
            Ok(Flow::Continue)
        }

        "BUILD_MAP" => {
            let pairs = state
                .stack
                .pop_n(2 * arg as usize, op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?;
            state.push(Expression::Collection {
                kind: CollectionKind::Map,
                values: pairs,
            });
            Ok(Flow::Continue)
        }

        "BUILD_CONST_KEY_MAP" => {
            let n = arg as usize;
            let tos = pop!();
            let keys = match &tos {
                Expression::Const(Constant::Tuple(items)) => items.clone(),
                other => bail!(
                    Severity::Internal,
                    TranslateErrorKind::BuildConstKeyMapKeys(describe(other))
                ),
            };
            if keys.len() != n {
                bail!(
                    Severity::Internal,
                    TranslateErrorKind::BuildConstKeyMapLength {
                        keys: keys.len(),
                        values: n,
                    }
                );
            }
            let values = state
                .stack
                .pop_n(n, op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?;
            let map: IndexMap<Constant, Expression> = keys.into_iter().zip(values).collect();
            state.push(Expression::ConstMap(map));
            Ok(Flow::Continue)
        }

        "MAKE_FUNCTION" => {
            let flags = arg;
            let qualname_expr = pop!();
            let raw_qualname = match &qualname_expr {
                Expression::Const(Constant::String(s)) => s.clone(),
                other => bail!(
                    Severity::Internal,
                    TranslateErrorKind::MakeFunction {
                        expected: "a constant qualified name string",
                        got: describe(other),
                    }
                ),
            };
            let code_expr = pop!();
            let code_const = match &code_expr {
                Expression::Const(c @ Constant::Code(_)) => c.clone(),
                other => bail!(
                    Severity::Internal,
                    TranslateErrorKind::MakeFunction {
                        expected: "a constant code object",
                        got: describe(other),
                    }
                ),
            };
            if flags & 0x08 != 0 {
                let _closure = pop!();
            }
            let annotations = if flags & 0x04 != 0 {
                let a = pop!();
                match &a {
                    Expression::ConstMap(_) => Some(Box::new(a)),
                    other => bail!(
                        Severity::Internal,
                        TranslateErrorKind::MakeFunction {
                            expected: "a constant annotation map",
                            got: describe(other),
                        }
                    ),
                }
            } else {
                None
            };
            if flags & 0x02 != 0 {
                let _kwdefaults = pop!();
            }
            if flags & 0x01 != 0 {
                let _defaults = pop!();
            }

            let mut qualname = pybc_ir_core::Identifier::normal(state.module_name.clone());
            for seg in raw_qualname.split('.') {
                qualname.extend(seg);
            }
            if let Some(short_name) = raw_qualname.rsplit('.').next() {
                state.register_function(short_name, qualname.clone());
            }

            state.push(Expression::Function {
                qualname,
                code: code_const,
                annotations,
            });
            Ok(Flow::Continue)
        }

        "LOAD_BUILD_CLASS" => {
            state.push(Expression::BuiltinCaller(BuiltinCaller::BuildClass));
            Ok(Flow::Continue)
        }

        "CALL_FUNCTION" => {
            let args = state
                .stack
                .pop_n(arg as usize, op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?;
            let callee = pop!();
            match callee {
                Expression::BuiltinCaller(BuiltinCaller::BuildClass) => {
                    if args.len() < 2 {
                        bail!(
                            Severity::External,
                            TranslateErrorKind::LoadBuildClass(args.len())
                        );
                    }
                    let short_name = match &args[1] {
                        Expression::Const(Constant::String(s)) => s.clone(),
                        other => bail!(
                            Severity::External,
                            TranslateErrorKind::LoadBuildClassName(describe(other))
                        ),
                    };
                    state.register_class(short_name);
                    state.push(Expression::Class(args));
                }
                Expression::BuiltinCaller(tag) => {
                    let ssa = state.fresh_ssa();
                    state.emit(Statement::BuiltinCall {
                        lhs: ssa,
                        call: tag,
                        args: args.into_iter().map(Argument::positional).collect(),
                    });
                    state.push(Expression::Temp(ssa));
                }
                callee => {
                    let ssa = state.fresh_ssa();
                    state.emit(Statement::Call {
                        lhs: ssa,
                        callee,
                        args: args.into_iter().map(Argument::positional).collect(),
                    });
                    state.push(Expression::Temp(ssa));
                }
            }
            Ok(Flow::Continue)
        }

        "LOAD_METHOD" => {
            let name = code.co_names[arg as usize].clone();
            let obj = pop!();
            state.push(Expression::LoadMethod(Box::new(obj), name));
            Ok(Flow::Continue)
        }

        "CALL_METHOD" => {
            let args = state
                .stack
                .pop_n(arg as usize, op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?;
            let callee = pop!();
            let ssa = state.fresh_ssa();
            state.emit(Statement::CallMethod {
                lhs: ssa,
                callee,
                args: args.into_iter().map(Argument::positional).collect(),
            });
            state.push(Expression::Temp(ssa));
            Ok(Flow::Continue)
        }

        "SETUP_ANNOTATIONS" => {
            let mut id = pybc_ir_core::Identifier::normal(state.module_name.clone());
            id.extend("__annotations__");
            state.names.register("__annotations__", id, false);
            state.emit(Statement::SetupAnnotations);
            Ok(Flow::Continue)
        }

        "IMPORT_NAME" => {
            let name = code.co_names[arg as usize].clone();
            let fromlist_expr = pop!();
            let fromlist = match &fromlist_expr {
                Expression::Const(c) => c
                    .as_fromlist()
                    .ok_or_else(|| err(state, Severity::External, TranslateErrorKind::ImportNameFromList, source_path))?,
                _ => bail!(Severity::External, TranslateErrorKind::ImportNameFromList),
            };
            let level_expr = pop!();
            let level = match &level_expr {
                Expression::Const(Constant::Int(n)) => *n,
                _ => bail!(Severity::External, TranslateErrorKind::ImportNameLevel),
            };
            let id = if level == 0 {
                name.clone()
            } else {
                let mut segs: Vec<&str> = state.module_name.split('.').collect();
                for _ in 0..level {
                    if segs.pop().is_none() {
                        bail!(Severity::External, TranslateErrorKind::ImportNameDepth);
                    }
                }
                let mut path = segs.join(".");
                if !name.is_empty() {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(&name);
                }
                path
            };
            let descriptor = pybc_ir_core::ImportDescriptor { id, fromlist };
            state.emit(Statement::ImportName(descriptor.clone()));
            state.push(Expression::ImportName(descriptor));
            Ok(Flow::Continue)
        }

        "IMPORT_FROM" => {
            let name = code.co_names[arg as usize].clone();
            let tos = state
                .stack
                .peek(op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?
                .clone();
            let desc = match &tos {
                Expression::ImportName(desc) => desc.clone(),
                _ => bail!(Severity::External, TranslateErrorKind::ImportFrom),
            };
            if !desc.fromlist.is_empty() && !desc.fromlist.contains(&name) {
                log::warn!(
                    "{source_path}: IMPORT_FROM `{name}` not present in fromlist of `{}`",
                    desc.id
                );
            }
            state.push(Expression::ImportFrom {
                from: Box::new(tos),
                name,
            });
            Ok(Flow::Continue)
        }

        "LOAD_CLOSURE" => {
            let idx = arg as usize;
            let name = if idx < code.co_cellvars.len() {
                code.co_cellvars[idx].clone()
            } else {
                code.co_freevars[idx - code.co_cellvars.len()].clone()
            };
            state.push(Expression::LoadClosure(name));
            Ok(Flow::Continue)
        }

        "UNPACK_SEQUENCE" => {
            let n = arg as i64;
            if n < 1 {
                bail!(Severity::External, TranslateErrorKind::UnpackSequence(n));
            }
            let tos = pop!();
            for i in (0..n).rev() {
                state.push(tos.clone().subscript(Expression::Const(Constant::Int(i))));
            }
            Ok(Flow::Continue)
        }

        "FORMAT_VALUE" => {
            let conversion = arg & 0x03;
            let has_spec = arg & 0x04 != 0;
            let spec = if has_spec {
                let s = pop!();
                match &s {
                    Expression::Const(Constant::String(_)) => Some(s),
                    other => bail!(
                        Severity::External,
                        TranslateErrorKind::FormatValueSpec(describe(other))
                    ),
                }
            } else {
                None
            };
            let value = pop!();
            let converted = if conversion != 0 {
                let fmt_fn = match conversion {
                    1 => BuiltinCaller::FormatStr,
                    2 => BuiltinCaller::FormatRepr,
                    _ => BuiltinCaller::FormatAscii,
                };
                let ssa = state.fresh_ssa();
                state.emit(Statement::BuiltinCall {
                    lhs: ssa,
                    call: fmt_fn,
                    args: vec![Argument::positional(value)],
                });
                Expression::Temp(ssa)
            } else {
                value
            };
            let ssa = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa,
                call: BuiltinCaller::Format,
                args: vec![
                    Argument::positional(converted),
                    Argument::positional(spec.unwrap_or(Expression::Const(Constant::Null))),
                ],
            });
            state.push(Expression::Temp(ssa));
            Ok(Flow::Continue)
        }

        "GET_ITER" => {
            let exp = pop!();
            let ssa = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa,
                call: BuiltinCaller::GetIter,
                args: vec![Argument::positional(exp)],
            });
            state.push(Expression::Temp(ssa));
            Ok(Flow::Continue)
        }

        "RETURN_VALUE" => {
            let value = pop!();
            Ok(Flow::Terminal(Terminator::Return(value)))
        }

        "POP_JUMP_IF_TRUE" | "POP_JUMP_IF_FALSE" => {
            let target = arg;
            let cond = pop!();
            let ssa_args = state.stack.to_ssa();
            let next_params = crate::stack::SymbolicStack::mk_ssa_parameters(ssa_args.len(), &mut state.ssa);
            let other_params = crate::stack::SymbolicStack::mk_ssa_parameters(ssa_args.len(), &mut state.ssa);
            let next_label = state.cfg.get_label(next_offset, next_params, None).name.clone();
            let other_label = state.cfg.get_label(target, other_params, None).name.clone();
            let if_cond = if op == "POP_JUMP_IF_FALSE" {
                cond
            } else {
                Expression::Not(Box::new(cond))
            };
            Ok(Flow::Terminal(Terminator::If {
                cond: if_cond,
                then: Box::new(Terminator::Jump(vec![NodeCall {
                    label: next_label,
                    ssa_args: ssa_args.clone(),
                }])),
                or_else: Box::new(Terminator::Jump(vec![NodeCall {
                    label: other_label,
                    ssa_args,
                }])),
            }))
        }

        "JUMP_IF_TRUE_OR_POP" | "JUMP_IF_FALSE_OR_POP" => {
            let target = arg;
            let cond = state
                .stack
                .peek(op)
                .map_err(|k| err(state, Severity::Internal, k, source_path))?
                .clone();
            let full_ssa_args = state.stack.to_ssa();
            let next_ssa_args = full_ssa_args[1..].to_vec();
            let other_ssa_args = full_ssa_args;
            let next_params =
                crate::stack::SymbolicStack::mk_ssa_parameters(next_ssa_args.len(), &mut state.ssa);
            let other_params =
                crate::stack::SymbolicStack::mk_ssa_parameters(other_ssa_args.len(), &mut state.ssa);
            let next_label = state.cfg.get_label(next_offset, next_params, None).name.clone();
            let other_label = state.cfg.get_label(target, other_params, None).name.clone();
            let if_cond = if op == "JUMP_IF_FALSE_OR_POP" {
                cond
            } else {
                Expression::Not(Box::new(cond))
            };
            Ok(Flow::Terminal(Terminator::If {
                cond: if_cond,
                then: Box::new(Terminator::Jump(vec![NodeCall {
                    label: next_label,
                    ssa_args: next_ssa_args,
                }])),
                or_else: Box::new(Terminator::Jump(vec![NodeCall {
                    label: other_label,
                    ssa_args: other_ssa_args,
                }])),
            }))
        }

        "JUMP_FORWARD" => {
            let target = next_offset + arg;
            let ssa_args = state.stack.to_ssa();
            let params = crate::stack::SymbolicStack::mk_ssa_parameters(ssa_args.len(), &mut state.ssa);
            let label = state.cfg.get_label(target, params, None).name.clone();
            Ok(Flow::Terminal(Terminator::Jump(vec![NodeCall {
                label,
                ssa_args,
            }])))
        }

        "JUMP_ABSOLUTE" => {
            let target = arg;
            let ssa_args = state.stack.to_ssa();
            if target < instr.offset {
                if !state.cfg.is_registered(target) {
                    bail!(
                        Severity::External,
                        TranslateErrorKind::MissingBackEdge {
                            from: instr.offset,
                            to: target,
                        }
                    );
                }
                let label = state.cfg.get(target).unwrap();
                if label.ssa_parameters.len() != ssa_args.len() {
                    bail!(
                        Severity::Internal,
                        TranslateErrorKind::InvalidBackEdge {
                            name: label.name.clone(),
                            expected: label.ssa_parameters.len(),
                            actual: ssa_args.len(),
                        }
                    );
                }
                if !label.backedge {
                    bail!(
                        Severity::Internal,
                        TranslateErrorKind::InvalidBackEdge {
                            name: label.name.clone(),
                            expected: label.ssa_parameters.len(),
                            actual: ssa_args.len(),
                        }
                    );
                }
                let name = label.name.clone();
                Ok(Flow::Terminal(Terminator::Jump(vec![NodeCall {
                    label: name,
                    ssa_args,
                }])))
            } else {
                let params = crate::stack::SymbolicStack::mk_ssa_parameters(ssa_args.len(), &mut state.ssa);
                let label = state.cfg.get_label(target, params, None).name.clone();
                Ok(Flow::Terminal(Terminator::Jump(vec![NodeCall {
                    label,
                    ssa_args,
                }])))
            }
        }

        "FOR_ITER" => {
            let target = next_offset + arg;
            let iterator = pop!();
            let ssa_next = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa_next,
                call: BuiltinCaller::NextIter,
                args: vec![Argument::positional(iterator.clone())],
            });
            let ssa_cond = state.fresh_ssa();
            state.emit(Statement::BuiltinCall {
                lhs: ssa_cond,
                call: BuiltinCaller::HasNextIter,
                args: vec![Argument::positional(Expression::Temp(ssa_next))],
            });
            let base_ssa_args = state.stack.to_ssa();
            let has_item_params =
                crate::stack::SymbolicStack::mk_ssa_parameters(base_ssa_args.len(), &mut state.ssa);
            let exhausted_params =
                crate::stack::SymbolicStack::mk_ssa_parameters(base_ssa_args.len(), &mut state.ssa);

            let prelude: Prelude = std::rc::Rc::new(move |state: &mut TranslatorState| {
                state.push(iterator.clone());
                let ssa_item = state.fresh_ssa();
                state.emit(Statement::BuiltinCall {
                    lhs: ssa_item,
                    call: BuiltinCaller::IterData,
                    args: vec![Argument::positional(Expression::Temp(ssa_next))],
                });
                state.push(Expression::Temp(ssa_item));
                Ok(())
            });

            let has_item_label = state
                .cfg
                .get_label(next_offset, has_item_params, Some(prelude))
                .name
                .clone();
            let exhausted_label = state
                .cfg
                .get_label(target, exhausted_params, None)
                .name
                .clone();

            Ok(Flow::Terminal(Terminator::If {
                cond: Expression::Temp(ssa_cond),
                then: Box::new(Terminator::Jump(vec![NodeCall {
                    label: has_item_label,
                    ssa_args: base_ssa_args.clone(),
                }])),
                or_else: Box::new(Terminator::Jump(vec![NodeCall {
                    label: exhausted_label,
                    ssa_args: base_ssa_args,
                }])),
            }))
        }

        other => Err(err(
            state,
            Severity::Internal,
            TranslateErrorKind::UnsupportedOpcode(other.to_string()),
            source_path,
        )),
    }
}
