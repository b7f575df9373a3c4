use core::fmt;

/// A position in the bytecode stream being translated: the instruction
/// offset plus whatever source line the frontend attached to it.
///
/// We never see source text, only offsets and an optional `starts_line`,
/// so a two-field struct carries everything an error or a `Node` needs to
/// point back at — no need for `ruff_source_file::SourceLocation`'s
/// source-text machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loc {
    pub offset: u32,
    pub line: Option<u32>,
}

impl Loc {
    pub const fn new(offset: u32, line: Option<u32>) -> Self {
        Self { offset, line }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "offset {} (line {line})", self.offset),
            None => write!(f, "offset {}", self.offset),
        }
    }
}
