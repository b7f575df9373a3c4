use std::collections::BTreeMap;

use indexmap::IndexMap;
use pybc_ir_core::SsaName;

use crate::state::TranslatorState;

/// A hook run when control enters a label, before its body is interpreted.
/// The only user is `FOR_ITER`'s "has item" successor, which needs to
/// repush the iterator and materialize the next item before the block
/// proper begins. We avoid the self-referential `Label<S>`/`State<S>`
/// generic parameterization the original design sketch floated: `Label`
/// lives in this crate next to the one state type it closes over, so there
/// is no cycle to break.
pub type Prelude = std::rc::Rc<dyn Fn(&mut TranslatorState) -> Result<(), crate::error::TranslateErrorKind>>;

/// A registered jump target: an offset in the instruction stream that some
/// block transfers control to.
#[derive(Clone)]
pub struct Label {
    pub name: String,
    pub ssa_parameters: Vec<SsaName>,
    pub processed: bool,
    pub backedge: bool,
    pub prelude: Option<Prelude>,
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Label")
            .field("name", &self.name)
            .field("ssa_parameters", &self.ssa_parameters)
            .field("processed", &self.processed)
            .field("backedge", &self.backedge)
            .field("prelude", &self.prelude.is_some())
            .finish()
    }
}

/// Maps bytecode offsets to the labels registered at them, for one code
/// object. Registration is idempotent: asking for the label at an offset
/// that already has one returns the existing label unchanged.
#[derive(Debug, Default)]
pub struct CfgRegistry {
    labels: BTreeMap<u32, Label>,
    fresh_label_counter: u32,
    /// Offsets the frontend flagged `is_jump_target = true` that we haven't
    /// registered a label for yet — these are the back-edge candidates
    /// `starts_with_jump_target` distinguishes from ordinary offsets.
    frontend_jump_targets: IndexMap<u32, ()>,
}

impl CfgRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_jump_target(&mut self, offset: u32) {
        self.frontend_jump_targets.insert(offset, ());
    }

    fn fresh_name(&mut self) -> String {
        let n = self.fresh_label_counter;
        self.fresh_label_counter += 1;
        format!("block{n}")
    }

    /// Idempotently register (or fetch) the label at `offset`. If this is
    /// the first time we've seen `offset`, a fresh name is minted and the
    /// label is inserted with `processed = false`.
    pub fn get_label(
        &mut self,
        offset: u32,
        ssa_parameters: Vec<SsaName>,
        prelude: Option<Prelude>,
    ) -> &Label {
        if !self.labels.contains_key(&offset) {
            let name = self.fresh_name();
            self.labels.insert(
                offset,
                Label {
                    name,
                    ssa_parameters,
                    processed: false,
                    backedge: false,
                    prelude,
                },
            );
        }
        &self.labels[&offset]
    }

    pub fn get(&self, offset: u32) -> Option<&Label> {
        self.labels.get(&offset)
    }

    pub fn is_registered(&self, offset: u32) -> bool {
        self.labels.contains_key(&offset)
    }

    pub fn mark_processed(&mut self, offset: u32) {
        if let Some(label) = self.labels.get_mut(&offset) {
            label.processed = true;
        }
    }

    pub fn is_frontend_jump_target(&self, offset: u32) -> bool {
        self.frontend_jump_targets.contains_key(&offset)
    }

    /// Reverse lookup: the offset a registered label's name was minted
    /// for. Block assembly uses this to turn a `Terminator`'s successor
    /// labels back into offsets to walk next.
    pub fn offset_of(&self, name: &str) -> Option<u32> {
        self.labels
            .iter()
            .find(|(_, label)| label.name == name)
            .map(|(offset, _)| *offset)
    }

    /// Register `offset` as a back-edge target synthesized from the current
    /// stack depth. The frontend told us this offset is a jump target, but
    /// nothing in our forward walk has registered a label there yet, so we
    /// commit to an arity now, from the live stack depth, and mark it as a
    /// back-edge.
    pub fn synthesize_backedge(
        &mut self,
        offset: u32,
        ssa_parameters: Vec<SsaName>,
    ) -> &Label {
        if !self.labels.contains_key(&offset) {
            let name = self.fresh_name();
            self.labels.insert(
                offset,
                Label {
                    name,
                    ssa_parameters,
                    processed: false,
                    backedge: true,
                    prelude: None,
                },
            );
        }
        &self.labels[&offset]
    }
}
