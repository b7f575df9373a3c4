use std::fmt;

use pybc_ir_core::Loc;
use thiserror::Error;

/// Whether an error reflects a bug in the translator itself or a property
/// of the input bytecode the translator is entitled to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input violated an assumption the translator makes about
    /// well-formed CPython bytecode (bad operand, out-of-range table index).
    External,
    /// The translator's own bookkeeping is inconsistent (empty stack pop,
    /// a back-edge whose arity no longer matches). Should never happen on
    /// bytecode produced by CPython; indicates a translator bug.
    Internal,
}

#[derive(Error, Debug)]
pub struct TranslateError {
    pub location: Loc,
    pub severity: Severity,
    #[source]
    pub kind: TranslateErrorKind,
    pub source_path: String,
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.source_path, self.location, self.kind
        )
    }
}

impl TranslateError {
    pub fn new(
        location: Loc,
        severity: Severity,
        kind: TranslateErrorKind,
        source_path: impl Into<String>,
    ) -> Self {
        Self {
            location,
            severity,
            kind,
            source_path: source_path.into(),
        }
    }
}

/// Everything that can go wrong translating one code object. Each variant
/// names the opcode contract it violates (see `pybc_translate::interpreter`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranslateErrorKind {
    #[error("popped from an empty stack during {0}")]
    EmptyStack(String),

    #[error("unsupported opcode `{0}`")]
    UnsupportedOpcode(String),

    #[error("MAKE_FUNCTION expected {expected} on the stack, got {got}")]
    MakeFunction { expected: &'static str, got: String },

    #[error("BUILD_CONST_KEY_MAP got {values} values for {keys} keys")]
    BuildConstKeyMapLength { keys: usize, values: usize },

    #[error("BUILD_CONST_KEY_MAP expected a constant tuple of key names, got {0}")]
    BuildConstKeyMapKeys(String),

    #[error("LOAD_BUILD_CLASS call expected at least 2 arguments, got {0}")]
    LoadBuildClass(usize),

    #[error("LOAD_BUILD_CLASS expected a constant string class name, got {0}")]
    LoadBuildClassName(String),

    #[error("IMPORT_NAME fromlist must be null, a string, or a tuple of strings")]
    ImportNameFromList,

    #[error("IMPORT_NAME level must be a constant integer")]
    ImportNameLevel,

    #[error("IMPORT_NAME relative import climbs past the module root")]
    ImportNameDepth,

    #[error("IMPORT_FROM name not present in the preceding import's fromlist")]
    ImportFrom,

    #[error("COMPARE_OP operand {0} is out of range")]
    CompareOp(u32),

    #[error("UNPACK_SEQUENCE count must be at least 1, got {0}")]
    UnpackSequence(i64),

    #[error("FORMAT_VALUE format spec must be a constant string, got {0}")]
    FormatValueSpec(String),

    #[error("instruction stream ended without a terminator")]
    NextOffsetMissing,

    #[error("back-edge to offset {to} from {from} targets a label that was never registered")]
    MissingBackEdge { from: u32, to: u32 },

    #[error("back-edge to `{name}` expected {expected} live values, found {actual}")]
    InvalidBackEdge {
        name: String,
        expected: usize,
        actual: usize,
    },
}
