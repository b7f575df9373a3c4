use pybc_ir_core::{Expression, SsaCounter, SsaName};

use crate::error::TranslateErrorKind;

/// The symbolic evaluation stack the interpreter threads through each
/// opcode handler. Index 0 is the top of stack, matching how opcodes are
/// specified (`pop` removes index 0).
#[derive(Debug, Clone, Default)]
pub struct SymbolicStack {
    values: Vec<Expression>,
}

impl SymbolicStack {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push(&mut self, value: Expression) {
        self.values.push(value);
    }

    pub fn pop(&mut self, op: &str) -> Result<Expression, TranslateErrorKind> {
        self.values
            .pop()
            .ok_or_else(|| TranslateErrorKind::EmptyStack(op.to_string()))
    }

    pub fn peek(&self, op: &str) -> Result<&Expression, TranslateErrorKind> {
        self.values
            .last()
            .ok_or_else(|| TranslateErrorKind::EmptyStack(op.to_string()))
    }

    /// Pop `n` values, returning them deepest-first (i.e. in the order they
    /// were originally pushed).
    pub fn pop_n(&mut self, n: usize, op: &str) -> Result<Vec<Expression>, TranslateErrorKind> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.pop(op)?);
        }
        out.reverse();
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drain the whole stack, deepest-first — the shape a `Jump`/`If`
    /// terminator needs for its `ssa_args`.
    pub fn to_ssa(&mut self) -> Vec<Expression> {
        let drained: Vec<_> = self.values.drain(..).collect();
        drained.into_iter().rev().collect()
    }

    /// Materialize `k` fresh SSA names without touching the stack; used to
    /// synthesize a label's parameter list to match a stack depth.
    pub fn mk_ssa_parameters(k: usize, counter: &mut SsaCounter) -> Vec<SsaName> {
        counter.fresh_n(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pybc_ir_core::Constant;

    #[test]
    fn pop_n_returns_deepest_first() {
        let mut stack = SymbolicStack::new();
        stack.push(Expression::Const(Constant::Int(1)));
        stack.push(Expression::Const(Constant::Int(2)));
        stack.push(Expression::Const(Constant::Int(3)));
        let popped = stack.pop_n(2, "TEST").unwrap();
        assert_eq!(
            popped,
            vec![
                Expression::Const(Constant::Int(2)),
                Expression::Const(Constant::Int(3)),
            ]
        );
    }

    #[test]
    fn pop_on_empty_stack_errors() {
        let mut stack = SymbolicStack::new();
        assert!(matches!(
            stack.pop("POP_TOP"),
            Err(TranslateErrorKind::EmptyStack(op)) if op == "POP_TOP"
        ));
    }
}
