//! Error taxonomy for the M8 debugger.
//!
//! This module defines every error the core library can surface. It provides:
//! 1. **Load-time errors:** [`ParseError`], raised while turning source text into a program.
//! 2. **Runtime errors:** [`ExecError`], raised by the execution engine during a step.
//! 3. **Misuse errors:** [`ControlError`], raised by the debugger controller's public operations.
//!
//! Load-time errors abort loading entirely; no partial program is exposed.
//! Runtime errors end the current run; misuse errors have no effect and the
//! session continues.

use thiserror::Error;

/// A malformed source program, reported with the offending 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error on line {line}: {kind}")]
pub struct ParseError {
    /// 1-based physical source line the error was found on.
    pub line: usize,
    /// What went wrong on that line.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// The reason a source line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The first token is not one of the five opcodes, a label, or a comment.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    /// An opcode requiring a register operand was not given one.
    #[error("missing register operand")]
    MissingRegister,

    /// A jump instruction was not given a line number or label target.
    #[error("missing jump target")]
    MissingTarget,

    /// A jump target that looks numeric but is not a non-negative integer.
    #[error("invalid jump target '{0}': expected an instruction index or label")]
    InvalidTarget(String),

    /// The line carries more tokens than the opcode's arity allows.
    #[error("unexpected trailing token '{0}'")]
    TrailingTokens(String),

    /// A register operand that is not a non-negative integer.
    #[error("invalid register '{0}': expected a non-negative integer")]
    InvalidRegister(String),

    /// The same label name was declared twice.
    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    /// A jump target names a label that was never declared.
    #[error("label '{0}' not found")]
    UnknownLabel(String),

    /// A resolved jump target points past the last instruction.
    #[error("jump target {target} is out of range for a program of {len} instructions")]
    TargetOutOfRange {
        /// The resolved absolute instruction index.
        target: usize,
        /// Number of instructions in the program.
        len: usize,
    },
}

/// A fatal error raised by the execution engine while stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The machine has already executed `STOP`; stepping it again is a bug
    /// in the driver, not the program.
    #[error("machine is halted")]
    MachineHalted,

    /// Control flow ran past the last instruction without a `STOP`.
    ///
    /// There is no fall-through rule in M8, so this is a program-authoring
    /// bug surfaced as an error rather than an implicit halt.
    #[error("program counter {pc} is out of range for a program of {len} instructions")]
    PcOutOfRange {
        /// Program counter at the failed step.
        pc: usize,
        /// Number of instructions in the program.
        len: usize,
    },
}

/// Caller-misuse errors from the debugger controller's public operations.
///
/// These never change session state; the operation is rejected and the
/// session continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    /// A breakpoint line outside the program's instruction range.
    #[error("line {line} is out of range for a program of {len} instructions")]
    InvalidLine {
        /// The rejected instruction index.
        line: usize,
        /// Number of instructions in the program.
        len: usize,
    },

    /// A negative register index.
    #[error("invalid register index {index}: registers are numbered from 0")]
    InvalidRegister {
        /// The rejected index as given by the caller.
        index: i64,
    },
}
