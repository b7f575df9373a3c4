//! Drives the interpreter across one code object's instruction stream,
//! assembling `Node`s and recursing into nested code objects found in
//! `co_consts`.

use pybc_ir_core::{CodeObject, Expression, Identifier, Loc, Node, Object, Terminator};

use crate::error::{Severity, TranslateError, TranslateErrorKind};
use crate::interpreter::{self, Flow};
use crate::state::TranslatorState;

/// Run the interpreter from `start_offset` until a terminator is produced
/// or control falls into an already-registered label (in which case we
/// synthesize a trailing `Jump` into it).
fn parse_bytecode_until_terminator(
    state: &mut TranslatorState,
    code: &CodeObject,
    instrs: &[pybc_ir_core::RawInstruction],
    start_index: usize,
    source_path: &str,
) -> Result<(usize, Loc, Terminator), TranslateError> {
    let mut i = start_index;
    loop {
        if i >= instrs.len() {
            return Err(TranslateError::new(
                state.cursor,
                Severity::Internal,
                TranslateErrorKind::NextOffsetMissing,
                source_path,
            ));
        }
        let instr = &instrs[i];
        if i != start_index
            && (state.cfg.is_registered(instr.offset) || state.cfg.is_frontend_jump_target(instr.offset))
        {
            // Control fell through into a block someone already registered a
            // label for, or into an offset the frontend flagged as a jump
            // target with nothing registered yet — the latter is a back-edge
            // whose header we're only now reaching for the first time, so we
            // commit to its arity from the live stack and mark it as such.
            let ssa_args = state.stack.to_ssa();
            let label = if let Some(existing) = state.cfg.get(instr.offset) {
                let params = if existing.ssa_parameters.is_empty() && !ssa_args.is_empty() {
                    crate::stack::SymbolicStack::mk_ssa_parameters(ssa_args.len(), &mut state.ssa)
                } else {
                    existing.ssa_parameters.clone()
                };
                state.cfg.get_label(instr.offset, params, None).name.clone()
            } else {
                let params = crate::stack::SymbolicStack::mk_ssa_parameters(ssa_args.len(), &mut state.ssa);
                state.cfg.synthesize_backedge(instr.offset, params).name.clone()
            };
            let loc = state.cursor;
            return Ok((
                i,
                loc,
                Terminator::Jump(vec![pybc_ir_core::NodeCall {
                    label,
                    ssa_args,
                }]),
            ));
        }
        let next_offset = instrs.get(i + 1).map(|n| n.offset).unwrap_or(instr.offset);
        match interpreter::exec(state, code, instr, next_offset, source_path)? {
            Flow::Continue => {
                i += 1;
            }
            Flow::Terminal(term) => {
                let loc = state.cursor;
                return Ok((i + 1, loc, term));
            }
        }
    }
}

/// Translate one code object's entire instruction stream into its list of
/// basic blocks.
fn mk_nodes(
    state: &mut TranslatorState,
    code: &CodeObject,
    source_path: &str,
) -> Result<Vec<Node>, TranslateError> {
    let instrs = &code.instructions;
    for instr in instrs {
        if instr.is_jump_target {
            state.cfg.note_jump_target(instr.offset);
        }
    }

    let mut nodes = Vec::new();
    let entry_offset = instrs.first().map(|i| i.offset).unwrap_or(0);
    state.cfg.get_label(entry_offset, Vec::new(), None);
    state.cfg.mark_processed(entry_offset);

    let mut pending_entries: Vec<u32> = vec![entry_offset];
    let mut visited = std::collections::BTreeSet::new();

    while let Some(offset) = pending_entries.pop() {
        if !visited.insert(offset) {
            continue;
        }
        let start_index = match instrs.iter().position(|i| i.offset == offset) {
            Some(idx) => idx,
            None => continue,
        };

        let label = state.cfg.get(offset).cloned().expect("label must exist");
        state.cfg.mark_processed(offset);
        let label_loc = Loc::new(offset, instrs[start_index].starts_line);

        // Reset the symbolic stack to the label's parameter shape and run
        // any prelude (FOR_ITER's "has item" successor) before the block's
        // own instructions execute.
        state.stack = crate::stack::SymbolicStack::new();
        for p in &label.ssa_parameters {
            state.push(Expression::Temp(*p));
        }
        if let Some(prelude) = &label.prelude {
            prelude(state).map_err(|k| TranslateError::new(state.cursor, Severity::Internal, k, source_path))?;
        }

        let mut builder = Node::new(label.name.clone(), label_loc);
        let (next_index, last_loc, terminator) =
            parse_bytecode_until_terminator(state, code, instrs, start_index, source_path)?;
        for (loc, stmt) in state.take_pending() {
            builder.push(loc, stmt);
        }
        nodes.push(builder.finish(last_loc, terminator.clone()));

        for successor_offset in successors_of(&terminator, state) {
            if !visited.contains(&successor_offset) {
                pending_entries.push(successor_offset);
            }
        }

        // `next_index` tells us where the block physically stopped; if it
        // fell straight into another already-registered label we don't
        // need to do anything further here — that label is already queued
        // as a successor.
        let _ = next_index;
    }

    Ok(nodes)
}

fn successors_of(term: &Terminator, state: &TranslatorState) -> Vec<u32> {
    match term {
        Terminator::Return(_) => Vec::new(),
        Terminator::Jump(calls) => calls
            .iter()
            .filter_map(|c| state.cfg.offset_of(&c.label))
            .collect(),
        Terminator::If { then, or_else, .. } => {
            let mut out = successors_of(then, state);
            out.extend(successors_of(or_else, state));
            out
        }
    }
}

/// Translate one code object into an `Object`, recursing into nested code
/// constants. `module_name` is this scope's fully qualified name (the
/// module's own name for a top-level call, extended by each nested
/// `co_name` for recursive calls).
pub fn mk_object(
    state: &mut TranslatorState,
    code: &CodeObject,
    source_path: &str,
) -> Result<Object, TranslateError> {
    let toplevel = mk_nodes(state, code, source_path)?;

    let mut object = Object::new(Identifier::normal(state.module_name.clone()));
    object.toplevel = toplevel;
    object.classes = state.classes.clone();
    object.functions = state.functions.clone();

    for (index, raw_const) in code.co_consts.iter().enumerate() {
        if let pybc_ir_core::RawConstant::Code { value: nested_code } = raw_const {
            let qualified = format!("{}.{}", state.module_name, nested_code.co_name);
            let mut nested_state = state.nested(qualified);
            let nested_object = mk_object(&mut nested_state, nested_code, source_path)?;
            // Point the nested object's location at the `LOAD_CONST` that
            // first loads it, so diagnostics can point at the def site.
            let loc = code
                .instructions
                .iter()
                .find(|i| i.opname == "LOAD_CONST" && i.arg == index as u32)
                .map(|i| Loc::new(i.offset, i.starts_line))
                .unwrap_or_default();
            object.objects.push((loc, nested_object));
        }
    }

    Ok(object)
}

/// Derive a module's name from its `co_filename`: strip a leading `./`
/// and the file extension, then replace path separators with dots.
pub fn module_name_from_filename(co_filename: &str) -> String {
    let stripped = co_filename.strip_prefix("./").unwrap_or(co_filename);
    let without_ext = stripped.rsplit_once('.').map(|(base, _)| base).unwrap_or(stripped);
    without_ext.split('/').collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_strips_prefix_and_extension() {
        assert_eq!(module_name_from_filename("./pkg/mod.py"), "pkg.mod");
        assert_eq!(module_name_from_filename("top.py"), "top");
    }
}
