use pybc_ir_core::{CodeObject, Constant, Expression, RawConstant, RawInstruction, Statement, Terminator};
use pybc_translate::{translate, TranslateOpts};

fn instr(opname: &str, arg: u32, offset: u32) -> RawInstruction {
    RawInstruction {
        opname: opname.to_string(),
        arg,
        offset,
        starts_line: Some(1),
        is_jump_target: false,
    }
}

fn jump_target(opname: &str, arg: u32, offset: u32) -> RawInstruction {
    RawInstruction {
        is_jump_target: true,
        ..instr(opname, arg, offset)
    }
}

fn base_code(consts: Vec<RawConstant>, names: Vec<&str>, varnames: Vec<&str>, instructions: Vec<RawInstruction>) -> CodeObject {
    CodeObject {
        co_consts: consts,
        co_names: names.into_iter().map(String::from).collect(),
        co_varnames: varnames.into_iter().map(String::from).collect(),
        co_cellvars: Vec::new(),
        co_freevars: Vec::new(),
        co_name: "<module>".into(),
        co_filename: "./scenario.py".into(),
        instructions,
    }
}

/// Scenario 1: `LOAD_CONST` followed immediately by `RETURN_VALUE`.
#[test]
fn load_const_then_return() {
    let code = base_code(
        vec![RawConstant::Int { value: 42 }],
        vec![],
        vec![],
        vec![instr("LOAD_CONST", 0, 0), instr("RETURN_VALUE", 0, 2)],
    );
    let object = translate(&code, TranslateOpts::default()).unwrap();
    assert_eq!(object.toplevel.len(), 1);
    assert_eq!(
        object.toplevel[0].last,
        Terminator::Return(Expression::Const(Constant::Int(42)))
    );
}

/// Scenario 2: two `LOAD_FAST`s combined with `BINARY_ADD`, then returned.
#[test]
fn load_fast_binary_add_return() {
    let code = base_code(
        vec![],
        vec![],
        vec!["a", "b"],
        vec![
            instr("LOAD_FAST", 0, 0),
            instr("LOAD_FAST", 1, 2),
            instr("BINARY_ADD", 0, 4),
            instr("RETURN_VALUE", 0, 6),
        ],
    );
    let object = translate(&code, TranslateOpts::default()).unwrap();
    let node = &object.toplevel[0];
    assert_eq!(node.stmts.len(), 1);
    match &node.stmts[0].1 {
        Statement::BuiltinCall { call, args, .. } => {
            assert_eq!(*call, pybc_ir_core::BuiltinCaller::Binary(pybc_ir_core::BinOp::Add));
            assert_eq!(args[0].value, Expression::LocalVar("a".into()));
            assert_eq!(args[1].value, Expression::LocalVar("b".into()));
        }
        other => panic!("expected a BuiltinCall, got {other:?}"),
    }
    assert!(matches!(node.last, Terminator::Return(Expression::Temp(_))));
}

/// Scenario 3: `LOAD_FAST` + `POP_JUMP_IF_FALSE` branches into two leaf
/// blocks, each ending in its own `RETURN_VALUE`.
#[test]
fn branch_into_two_leaf_nodes() {
    let code = base_code(
        vec![RawConstant::Int { value: 1 }, RawConstant::Int { value: 2 }],
        vec![],
        vec!["flag"],
        vec![
            instr("LOAD_FAST", 0, 0),
            instr("POP_JUMP_IF_FALSE", 8, 2),
            instr("LOAD_CONST", 0, 4),
            instr("RETURN_VALUE", 0, 6),
            jump_target("LOAD_CONST", 1, 8),
            instr("RETURN_VALUE", 0, 10),
        ],
    );
    let object = translate(&code, TranslateOpts::default()).unwrap();
    // entry block ends in an `If`, and there are three blocks total: the
    // entry plus the two branch targets.
    assert_eq!(object.toplevel.len(), 3);
    assert!(matches!(object.toplevel[0].last, Terminator::If { .. }));
    let returns: Vec<_> = object
        .toplevel
        .iter()
        .filter_map(|n| match &n.last {
            Terminator::Return(Expression::Const(Constant::Int(i))) => Some(*i),
            _ => None,
        })
        .collect();
    assert_eq!(returns.len(), 2);
    assert!(returns.contains(&1));
    assert!(returns.contains(&2));
}

/// Scenario 4: `IMPORT_NAME` with `fromlist=Null`, `level=0`.
#[test]
fn import_name_with_null_fromlist() {
    let code = base_code(
        vec![RawConstant::Int { value: 0 }, RawConstant::Null],
        vec!["os"],
        vec![],
        vec![
            instr("LOAD_CONST", 0, 0), // level
            instr("LOAD_CONST", 1, 2), // fromlist
            instr("IMPORT_NAME", 0, 4),
            instr("POP_TOP", 0, 6),
            instr("LOAD_CONST", 1, 8),
            instr("RETURN_VALUE", 0, 10),
        ],
    );
    let object = translate(&code, TranslateOpts::default()).unwrap();
    let node = &object.toplevel[0];
    assert_eq!(node.stmts.len(), 1);
    match &node.stmts[0].1 {
        Statement::ImportName(desc) => {
            assert_eq!(desc.id, "os");
            assert!(desc.fromlist.is_empty());
        }
        other => panic!("expected an ImportName statement, got {other:?}"),
    }
}

/// Scenario 5: a `FOR_ITER` loop whose "has item" successor runs its
/// prelude to materialize the iterator and the next item.
#[test]
fn for_iter_prelude_materializes_item() {
    // 0: LOAD_FAST it; 2: GET_ITER; 4: FOR_ITER -> exhausted at 10;
    // 6: POP_TOP; 8: JUMP_ABSOLUTE back to the loop header at 4;
    // 10: LOAD_CONST; 12: RETURN_VALUE.
    let code = base_code(
        vec![RawConstant::Null],
        vec![],
        vec!["it"],
        vec![
            instr("LOAD_FAST", 0, 0),
            instr("GET_ITER", 0, 2),
            jump_target("FOR_ITER", 4, 4),
            instr("POP_TOP", 0, 6),
            instr("JUMP_ABSOLUTE", 4, 8),
            jump_target("LOAD_CONST", 0, 10),
            instr("RETURN_VALUE", 0, 12),
        ],
    );

    let object = translate(&code, TranslateOpts::default()).unwrap();
    // One block carries a prelude-backed entry into the loop body; we just
    // check the overall shape translated without error and produced the
    // expected number of blocks (entry+GET_ITER, loop header, body, done).
    assert!(object.toplevel.len() >= 3);
    let has_next_iter_call = object.toplevel.iter().any(|n| {
        n.stmts.iter().any(|(_, s)| {
            matches!(
                s,
                Statement::BuiltinCall {
                    call: pybc_ir_core::BuiltinCaller::NextIter,
                    ..
                }
            )
        })
    });
    assert!(has_next_iter_call);
}

/// Scenario 6: `MAKE_FUNCTION` with `flags=0x04`, carrying constant-map
/// annotations.
#[test]
fn make_function_with_annotations() {
    // BUILD_CONST_KEY_MAP needs one value on the stack per key below the
    // keys tuple; a placeholder int stands in for `x`'s annotation.
    let inner = base_code(vec![], vec![], vec![], vec![instr("RETURN_VALUE", 0, 0)]);
    let code = base_code(
        vec![
            RawConstant::Int { value: 0 },
            RawConstant::Code { value: inner },
            RawConstant::Str {
                value: "f".to_string(),
            },
            RawConstant::Tuple {
                values: vec![RawConstant::Str {
                    value: "x".to_string(),
                }],
            },
        ],
        vec![],
        vec![],
        vec![
            instr("LOAD_CONST", 0, 0),  // annotation value for "x"
            instr("LOAD_CONST", 3, 2),  // keys tuple
            instr("BUILD_CONST_KEY_MAP", 1, 4),
            instr("LOAD_CONST", 1, 6), // code
            instr("LOAD_CONST", 2, 8), // qualname
            instr("MAKE_FUNCTION", 0x04, 10),
            instr("POP_TOP", 0, 12),
            instr("LOAD_CONST", 2, 14),
            instr("RETURN_VALUE", 0, 16),
        ],
    );

    let object = translate(&code, TranslateOpts::default()).unwrap();
    let node = &object.toplevel[0];
    let found_function = node.stmts.iter().find_map(|(_, s)| match s {
        Statement::Assign {
            rhs: Expression::Function { qualname, annotations, .. },
            ..
        } => Some((qualname.clone(), annotations.clone())),
        _ => None,
    });
    assert!(found_function.is_none(), "MAKE_FUNCTION pushes its Function expression directly, not via an Assign");
    assert_eq!(object.functions.get("f").map(|q| q.to_string()), Some("scenario.f".to_string()));
}

/// Scenario 7: `STORE_NAME` qualifies its target by the module name, and
/// rebinds the local name table when the stored value came from an import
/// (`ImportName` directly, or `ImportFrom` via `from X import Y`).
#[test]
fn store_name_qualifies_and_rebinds_imports() {
    let code = base_code(
        vec![RawConstant::Int { value: 1 }],
        vec!["x"],
        vec![],
        vec![
            instr("LOAD_CONST", 0, 0),
            instr("STORE_NAME", 0, 2),
            instr("LOAD_CONST", 0, 4),
            instr("RETURN_VALUE", 0, 6),
        ],
    );
    let object = translate(&code, TranslateOpts::default()).unwrap();
    let node = &object.toplevel[0];
    match &node.stmts[0].1 {
        Statement::Assign { lhs: Expression::Var(id), .. } => {
            assert_eq!(id.to_string(), "scenario.x");
        }
        other => panic!("expected an Assign to a qualified Var, got {other:?}"),
    }
}

/// Scenario 8: `from os import path` — `IMPORT_NAME`, `IMPORT_FROM`,
/// `STORE_NAME` — rebinds `path` to an `Imported` identifier, the same as
/// a bare `import os` does for `os`.
#[test]
fn store_name_rebinds_import_from() {
    let code = base_code(
        vec![RawConstant::Int { value: 0 }, RawConstant::Null],
        vec!["os", "path"],
        vec![],
        vec![
            instr("LOAD_CONST", 0, 0),  // level
            instr("LOAD_CONST", 1, 2),  // fromlist
            instr("IMPORT_NAME", 0, 4), // import os
            instr("IMPORT_FROM", 1, 6), // from os import path
            instr("STORE_NAME", 1, 8),
            instr("POP_TOP", 0, 10),
            instr("LOAD_CONST", 1, 12),
            instr("RETURN_VALUE", 0, 14),
        ],
    );
    let object = translate(&code, TranslateOpts::default()).unwrap();
    let node = &object.toplevel[0];
    let stored = node.stmts.iter().find_map(|(_, s)| match s {
        Statement::Assign { lhs: Expression::Var(id), .. } if id.to_string() == "os.path" => Some(id.clone()),
        _ => None,
    });
    assert!(stored.is_some(), "expected STORE_NAME to bind `path` to `os.path`");
    assert_eq!(
        stored.unwrap().kind(),
        pybc_ir_core::IdentifierKind::Imported
    );
}

/// Scenario 9: `JUMP_IF_FALSE_OR_POP` must strip the *condition* (the top
/// of stack, index 0 of `to_ssa()`'s result) from the fallthrough branch's
/// ssa_args, not the deepest/bottom-of-stack value.
#[test]
fn jump_if_false_or_pop_keeps_deepest_values() {
    // stack at the jump (top to bottom): x (cond), a, f
    let code = base_code(
        vec![],
        vec![],
        vec!["f", "a", "x", "y"],
        vec![
            instr("LOAD_FAST", 0, 0),  // f
            instr("LOAD_FAST", 1, 2),  // a
            instr("LOAD_FAST", 2, 4),  // x = cond
            instr("JUMP_IF_FALSE_OR_POP", 12, 6),
            instr("LOAD_FAST", 3, 8), // y, only on fallthrough
            instr("CALL_FUNCTION", 2, 10),
            jump_target("RETURN_VALUE", 0, 12),
        ],
    );
    let object = translate(&code, TranslateOpts::default()).unwrap();
    // The entry block's fallthrough jump (the "pop" branch) must carry `a`
    // and `f`, not the condition `x`, as its ssa_args.
    let entry = &object.toplevel[0];
    match &entry.last {
        Terminator::If { then, .. } => match then.as_ref() {
            Terminator::Jump(calls) => {
                assert_eq!(calls.len(), 1);
                assert_eq!(
                    calls[0].ssa_args,
                    vec![
                        Expression::LocalVar("a".into()),
                        Expression::LocalVar("f".into()),
                    ]
                );
            }
            other => panic!("expected the fallthrough branch to be a Jump, got {other:?}"),
        },
        other => panic!("expected an If terminator, got {other:?}"),
    }
}
