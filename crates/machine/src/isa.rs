//! The M8 instruction set.
//!
//! M8 has five opcodes over an unbounded file of integer registers:
//! `INC`, `DEC`, `JUMP`, `IS_ZERO`, and `STOP`. Jump targets in source text
//! may be written as absolute instruction indices or as symbolic labels; by
//! the time an [`Instr`] exists, the loader has collapsed both forms to a
//! plain index, so execution never resolves names.

use std::fmt;

/// A decoded M8 instruction.
///
/// Operand arity is enforced by construction: `STOP` carries nothing, the
/// register opcodes carry a register index, and jump forms carry an absolute
/// instruction index resolved at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    /// `INC r`: increment register `r` by one.
    Inc(usize),
    /// `DEC r`: decrement register `r` by one; values may go negative.
    Dec(usize),
    /// `JUMP t`: transfer control to instruction index `t` unconditionally.
    Jump(usize),
    /// `IS_ZERO r t`: transfer control to instruction index `t` if
    /// register `r` holds zero, otherwise fall through.
    IsZero(usize, usize),
    /// `STOP`: halt the machine.
    Stop,
}

impl Instr {
    /// Returns the register operand, if this opcode has one.
    pub fn register(&self) -> Option<usize> {
        match self {
            Self::Inc(r) | Self::Dec(r) | Self::IsZero(r, _) => Some(*r),
            Self::Jump(_) | Self::Stop => None,
        }
    }

    /// Returns the resolved jump target, if this opcode has one.
    pub fn target(&self) -> Option<usize> {
        match self {
            Self::Jump(t) | Self::IsZero(_, t) => Some(*t),
            Self::Inc(_) | Self::Dec(_) | Self::Stop => None,
        }
    }
}

impl fmt::Display for Instr {
    /// Formats the instruction in canonical source syntax, with jump targets
    /// shown as resolved instruction indices.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inc(r) => write!(f, "INC {r}"),
            Self::Dec(r) => write!(f, "DEC {r}"),
            Self::Jump(t) => write!(f, "JUMP {t}"),
            Self::IsZero(r, t) => write!(f, "IS_ZERO {r} {t}"),
            Self::Stop => write!(f, "STOP"),
        }
    }
}
