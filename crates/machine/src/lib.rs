//! M8 register-machine debugger library.
//!
//! This crate implements a tracer/interpreter for the M8 assembly language
//! (five opcodes, `INC`, `DEC`, `JUMP`, `IS_ZERO`, and `STOP`, plus `.name`
//! label lines) with the following:
//! 1. **Loader:** Two-pass source-text parser producing an immutable program
//!    with every jump target statically resolved.
//! 2. **Machine:** Sparse, unbounded register file plus program counter and
//!    halted flag.
//! 3. **Engine:** Single-instruction execution with structured step results.
//! 4. **Debugger:** A controller state machine adding stepping, breakpoints,
//!    run-to-completion with external cancellation, inspection, and restart.

/// Debugger controller (session state, breakpoints, run loop, snapshots).
pub mod debugger;
/// Error taxonomy (load-time, runtime, and caller-misuse errors).
pub mod error;
/// Single-step execution engine.
pub mod exec;
/// The decoded instruction set.
pub mod isa;
/// Source-text loader and jump-target resolution.
pub mod loader;
/// Register file and machine state.
pub mod machine;
/// The immutable loaded program.
pub mod program;

/// Interactive session type; construct with `Debugger::new(load(source)?)`.
pub use crate::debugger::Debugger;
/// Load M8 source text into a resolved [`Program`].
pub use crate::loader::load;
/// A loaded, immutable M8 program.
pub use crate::program::Program;
