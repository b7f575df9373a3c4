use crate::expr::Expression;

/// A jump to a successor block, carrying the SSA arguments that stand for
/// the materialized stack at this point.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCall {
    pub label: String,
    pub ssa_args: Vec<Expression>,
}

/// How a `Node` ends. Every node terminates with exactly one of these, and
/// no statement follows it.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    Return(Expression),
    /// At least one successor; a plain unconditional jump has exactly one.
    Jump(Vec<NodeCall>),
    If {
        cond: Expression,
        then: Box<Terminator>,
        or_else: Box<Terminator>,
    },
}
