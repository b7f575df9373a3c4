use core::fmt;

use indexmap::IndexMap;

use crate::constant::Constant;
use crate::identifier::Identifier;
use crate::ssa::SsaName;

/// Binary/in-place numeric & bitwise operators (`BINARY_*`/`INPLACE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    And,
    FloorDivide,
    LShift,
    MatrixMultiply,
    Modulo,
    Multiply,
    Or,
    Power,
    RShift,
    Subtract,
    TrueDivide,
    Xor,
}

/// Unary operators (`UNARY_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Positive,
    Negative,
    Not,
    Invert,
}

/// `COMPARE_OP`'s fixed comparator table. Index order matches CPython's
/// `dis.cmp_op`, truncated to the ten comparisons we handle (exception
/// matching is an exception-handling opcode and out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CompareOp {
    pub const TABLE: [CompareOp; 10] = [
        Self::Lt,
        Self::Le,
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Ge,
        Self::In,
        Self::NotIn,
        Self::Is,
        Self::IsNot,
    ];

    /// Look up `COMPARE_OP`'s integer operand; `None` if out of range
    /// (the caller turns that into `TranslateErrorKind::CompareOp(n)`).
    pub fn from_index(n: u32) -> Option<Self> {
        Self::TABLE.get(n as usize).copied()
    }
}

/// The result-building collection kinds (`BUILD_LIST`/`BUILD_SET`/etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Set,
    Tuple,
    Slice,
    Map,
    String,
}

/// Marker for a pseudo-function that a `CALL_FUNCTION`/opcode-pair
/// resolves to; never a real callable expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCaller {
    BuildClass,
    Format,
    FormatStr,
    FormatRepr,
    FormatAscii,
    Binary(BinOp),
    Inplace(BinOp),
    Unary(UnOp),
    Compare(CompareOp),
    GetIter,
    NextIter,
    HasNextIter,
    IterData,
}

/// The result of `IMPORT_NAME`: the dotted module path requested and the
/// `fromlist` names that came with it. Shared between the
/// `Expression::ImportName` pushed on the stack and the
/// `Statement::ImportName` side-effect marker recorded alongside it, so the
/// two can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDescriptor {
    pub id: String,
    pub fromlist: Vec<String>,
}

/// Tagged sum of syntactic expression forms. Every variant is
/// side-effect-free by construction — any opcode with a side effect
/// (a call, an import, a store) instead emits a `Statement` and leaves an
/// `Expression::Temp`/`Expression::ImportName` on the stack referring to
/// its result.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Const(Constant),
    Var(Identifier),
    LocalVar(String),
    Temp(SsaName),
    Subscript {
        exp: Box<Expression>,
        index: Box<Expression>,
    },
    Collection {
        kind: CollectionKind,
        values: Vec<Expression>,
    },
    ConstMap(IndexMap<Constant, Expression>),
    Function {
        qualname: Identifier,
        code: Constant,
        annotations: Option<Box<Expression>>,
    },
    Class(Vec<Expression>),
    GetAttr(Box<Expression>, String),
    LoadMethod(Box<Expression>, String),
    ImportName(ImportDescriptor),
    ImportFrom {
        from: Box<Expression>,
        name: String,
    },
    LoadClosure(String),
    Not(Box<Expression>),
    BuiltinCaller(BuiltinCaller),
}

impl Expression {
    pub fn get_attr(self, name: impl Into<String>) -> Self {
        Self::GetAttr(Box::new(self), name.into())
    }

    pub fn subscript(self, index: Expression) -> Self {
        Self::Subscript {
            exp: Box::new(self),
            index: Box::new(index),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(Constant::Int(i)) => write!(f, "{i}"),
            Self::Const(Constant::Bool(b)) => write!(f, "{b}"),
            Self::Const(Constant::Float(x)) => write!(f, "{x}"),
            Self::Const(Constant::String(s)) => write!(f, "{s:?}"),
            Self::Const(Constant::Null) => write!(f, "null"),
            Self::Const(Constant::Tuple(_)) => write!(f, "<tuple const>"),
            Self::Const(Constant::Code(_)) => write!(f, "<code const>"),
            Self::Var(id) => write!(f, "{id}"),
            Self::LocalVar(s) => write!(f, "%{s}"),
            Self::Temp(n) => write!(f, "{n}"),
            Self::Subscript { exp, index } => write!(f, "{exp}[{index}]"),
            Self::Collection { kind, values } => {
                write!(f, "{kind:?}(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, ")")
            }
            Self::ConstMap(_) => write!(f, "<const map>"),
            Self::Function { qualname, .. } => write!(f, "fn {qualname}"),
            Self::Class(_) => write!(f, "<class>"),
            Self::GetAttr(e, name) => write!(f, "{e}.{name}"),
            Self::LoadMethod(e, name) => write!(f, "{e}.{name}<method>"),
            Self::ImportName(desc) => write!(f, "import {}", desc.id),
            Self::ImportFrom { from, name } => write!(f, "from {from} import {name}"),
            Self::LoadClosure(name) => write!(f, "closure({name})"),
            Self::Not(e) => write!(f, "not {e}"),
            Self::BuiltinCaller(tag) => write!(f, "<builtin {tag:?}>"),
        }
    }
}
