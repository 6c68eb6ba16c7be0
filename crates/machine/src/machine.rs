//! Machine state: the register file and program counter.
//!
//! This is the sole mutable state of an execution. It provides:
//! 1. **Storage:** A sparse, unbounded register file with lazy zero defaults.
//! 2. **Control state:** The program counter and halted flag.
//! 3. **Observability:** Read access to every touched register for snapshots.

use std::collections::BTreeMap;

/// Sparse register file over an unbounded index domain.
///
/// Registers are created on first write; reading a register that was never
/// written yields 0. Values are signed and unfloored; `DEC` below zero is
/// legal and produces negatives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: BTreeMap<usize, i64>,
}

impl RegisterFile {
    /// Creates an empty register file; every register reads as 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index. Any index is valid; untouched registers read 0.
    pub fn get(&self, idx: usize) -> i64 {
        self.regs.get(&idx).copied().unwrap_or(0)
    }

    /// Writes a register value, creating the register if needed.
    pub fn set(&mut self, idx: usize, val: i64) {
        let _ = self.regs.insert(idx, val);
    }

    /// Every register written so far, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.regs.iter().map(|(idx, val)| (*idx, *val))
    }
}

/// The mutable state of one M8 execution: registers, program counter, and
/// halted flag.
///
/// Created at session start or on restart; mutated one instruction at a time
/// by the execution engine and by the debugger's register-set operation.
#[derive(Debug, Clone, Default)]
pub struct Machine {
    /// The register file.
    pub registers: RegisterFile,
    /// Index of the next instruction to execute, 0-based.
    pub pc: usize,
    /// Set by `STOP`; a halted machine refuses further steps.
    pub halted: bool,
}

impl Machine {
    /// Creates a machine at program counter 0 with all registers zero.
    pub fn new() -> Self {
        Self::default()
    }
}
