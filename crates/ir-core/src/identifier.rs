use core::fmt;

/// How an identifier was resolved: against a known builtin, the result of
/// an import, or an ordinary module/local binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Builtin,
    Imported,
    Normal,
}

/// A qualified name: a root plus a reversed attribute path.
///
/// `path` is stored reversed (innermost attribute first) so that
/// `extend`/`pop` are both O(1) pushes/pops on a `Vec`; `Display`
/// reverses it back to reconstruct the dotted form `root.a.b.c`.
///
/// Invariant: an `Identifier`'s `root` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    root: String,
    path: Vec<String>,
    kind: IdentifierKind,
}

impl Identifier {
    pub fn new(root: impl Into<String>, kind: IdentifierKind) -> Self {
        let root = root.into();
        debug_assert!(!root.is_empty(), "identifiers are never empty");
        Self {
            root,
            path: Vec::new(),
            kind,
        }
    }

    pub fn builtin(root: impl Into<String>) -> Self {
        Self::new(root, IdentifierKind::Builtin)
    }

    pub fn normal(root: impl Into<String>) -> Self {
        Self::new(root, IdentifierKind::Normal)
    }

    pub fn imported(root: impl Into<String>) -> Self {
        Self::new(root, IdentifierKind::Imported)
    }

    /// `module.<name>`-style placeholder for a name that resolved to
    /// nothing: kept explicit so downstream tooling can flag it.
    pub fn unknown(name: &str) -> Self {
        let mut id = Self::new("$unknown", IdentifierKind::Normal);
        id.extend(name);
        id
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Append an attribute, producing `self.attr`.
    pub fn extend(&mut self, attr: impl Into<String>) {
        self.path.push(attr.into());
    }

    /// `self` with an attribute appended, leaving `self` untouched.
    #[must_use]
    pub fn extended(&self, attr: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.extend(attr);
        next
    }

    /// Strip the last path element, if any, returning it.
    pub fn pop(&mut self) -> Option<String> {
        self.path.pop()
    }

    /// Full dotted path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        core::iter::once(self.root.as_str()).chain(self.path.iter().rev().map(String::as_str))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments();
        write!(f, "{}", segments.next().unwrap_or_default())?;
        for seg in segments {
            write!(f, ".{seg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reconstructs_dotted_form() {
        let mut id = Identifier::normal("module");
        id.extend("a");
        id.extend("b");
        id.extend("c");
        assert_eq!(id.to_string(), "module.a.b.c");
    }

    #[test]
    fn pop_strips_tail() {
        let mut id = Identifier::normal("module");
        id.extend("a");
        id.extend("b");
        assert_eq!(id.pop(), Some("b".to_string()));
        assert_eq!(id.to_string(), "module.a");
    }

    #[test]
    fn unknown_is_flagged_explicitly() {
        let id = Identifier::unknown("frobnicate");
        assert_eq!(id.to_string(), "$unknown.frobnicate");
    }
}
