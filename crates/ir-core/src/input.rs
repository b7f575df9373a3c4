//! The decoded-code-object shape produced by the bytecode frontend (the
//! bytecode decoder itself is out of scope for this crate). We only
//! consume its output shape, so this module is intentionally thin: plain
//! structs, a `serde` derive so `pybc2ir`'s CLI can read one from JSON, and
//! the one bit of real logic this stage owns — constant normalization
//! (`RawConstant::normalize`).

use serde::Deserialize;

use crate::constant::Constant;

/// A bytecode instruction as the frontend hands it to us: already decoded
/// from whatever wire format the host file uses, offsets already resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInstruction {
    pub opname: String,
    #[serde(default)]
    pub arg: u32,
    pub offset: u32,
    #[serde(default)]
    pub starts_line: Option<u32>,
    #[serde(default)]
    pub is_jump_target: bool,
}

/// Raw decoded constant, pre-normalization. `Bytes` is the one shape the
/// canonical `Constant` domain doesn't have: the frontend may decode a
/// Python byte string as raw bytes, and those get coerced to `String`
/// during normalization: byte strings decoded from the frontend are
/// coerced to strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum RawConstant {
    Int { value: i64 },
    Bool { value: bool },
    Float { value: f64 },
    Str { value: String },
    Bytes { value: Vec<u8> },
    Tuple { values: Vec<RawConstant> },
    Code { value: CodeObject },
    Null,
}

impl RawConstant {
    /// Lift a raw constant into the canonical `Constant` domain.
    pub fn normalize(&self) -> Constant {
        match self {
            Self::Int { value } => Constant::Int(*value),
            Self::Bool { value } => Constant::Bool(*value),
            Self::Float { value } => Constant::Float(*value),
            Self::Str { value } => Constant::String(value.clone()),
            Self::Bytes { value } => {
                Constant::String(String::from_utf8_lossy(value).into_owned())
            }
            Self::Tuple { values } => {
                Constant::Tuple(values.iter().map(RawConstant::normalize).collect())
            }
            Self::Code { value } => Constant::Code(Box::new(value.clone())),
            Self::Null => Constant::Null,
        }
    }
}

/// A code object: immutable metadata plus an ordered instruction stream.
/// One value of this type exists per module/function/class body/
/// comprehension; nested code objects live inside `co_consts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeObject {
    pub co_consts: Vec<RawConstant>,
    pub co_names: Vec<String>,
    pub co_varnames: Vec<String>,
    #[serde(default)]
    pub co_cellvars: Vec<String>,
    #[serde(default)]
    pub co_freevars: Vec<String>,
    pub co_name: String,
    pub co_filename: String,
    pub instructions: Vec<RawInstruction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_constants_are_coerced_to_strings() {
        let raw = RawConstant::Bytes {
            value: b"hi".to_vec(),
        };
        assert_eq!(raw.normalize(), Constant::String("hi".into()));
    }

    #[test]
    fn tuple_constants_normalize_elementwise() {
        let raw = RawConstant::Tuple {
            values: vec![RawConstant::Int { value: 1 }, RawConstant::Null],
        };
        assert_eq!(
            raw.normalize(),
            Constant::Tuple(vec![Constant::Int(1), Constant::Null])
        );
    }
}
