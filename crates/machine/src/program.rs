//! The loaded, immutable representation of an M8 program.

use std::collections::BTreeMap;

use crate::isa::Instr;

/// A fully loaded M8 program: decoded instructions plus the label table.
///
/// Immutable once loaded. All jump targets inside [`Instr`] are already
/// resolved to absolute instruction indices; the label table is retained
/// only for diagnostics and listings. A `Program` can seed any number of
/// independent machines, so restarting a session never re-parses source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instrs: Vec<Instr>,
    /// 1-based physical source line of each instruction, for diagnostics.
    spans: Vec<usize>,
    labels: BTreeMap<String, usize>,
}

impl Program {
    pub(crate) fn new(
        instrs: Vec<Instr>,
        spans: Vec<usize>,
        labels: BTreeMap<String, usize>,
    ) -> Self {
        debug_assert_eq!(instrs.len(), spans.len());
        Self {
            instrs,
            spans,
            labels,
        }
    }

    /// Number of instructions (label and comment lines do not count).
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    /// Whether the program contains no instructions at all.
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// The instruction at absolute index `idx`, if in range.
    pub fn instr(&self, idx: usize) -> Option<Instr> {
        self.instrs.get(idx).copied()
    }

    /// All instructions in execution order.
    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    /// The 1-based source line the instruction at `idx` came from.
    pub fn span(&self, idx: usize) -> Option<usize> {
        self.spans.get(idx).copied()
    }

    /// The label table, name to bound instruction index.
    pub fn labels(&self) -> &BTreeMap<String, usize> {
        &self.labels
    }

    /// Labels bound to instruction index `idx`, in declaration-name order.
    pub fn labels_at(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .filter(move |(_, bound)| **bound == idx)
            .map(|(name, _)| name.as_str())
    }
}
