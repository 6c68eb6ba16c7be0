//! The debugger controller: stepping, breakpoints, and state inspection.
//!
//! This module wraps the execution engine in an explicit state machine so
//! that single-instruction execution becomes an interactive session. It
//! performs:
//! 1. **Pacing:** `step` and `run`, with breakpoints honored between steps.
//! 2. **Session state:** Ready, paused-at-breakpoint, or halted, with a
//!    sticky fault recording a fatal engine error.
//! 3. **Inspection:** Read-only snapshots of registers, program counter,
//!    and halted flag.
//! 4. **Cancellation:** `run` observes an external flag between steps, so an
//!    infinite M8 program can be interrupted without threading inside the
//!    engine.
//!
//! The controller is front-end agnostic: the CLI, tests, or any other driver
//! invoke the same operations synchronously.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::debug;

use crate::error::{ControlError, ExecError};
use crate::exec::{self, StepResult};
use crate::machine::Machine;
use crate::program::Program;

/// Where a debugging session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Loaded and able to step or run.
    Ready,
    /// Paused with the program counter on a breakpoint line, that line not
    /// yet executed.
    AtBreakpoint,
    /// Terminal: `STOP` executed or a fatal engine error occurred. Only
    /// `restart` leaves this state.
    Halted,
}

/// Why a `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program executed `STOP`.
    Halted,
    /// The program counter landed on a breakpoint; the line has not executed.
    Breakpoint(usize),
    /// The external cancel flag was observed between steps.
    Cancelled,
}

/// A read-only view of machine state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Every register written so far, in index order.
    pub registers: BTreeMap<usize, i64>,
    /// Index of the next instruction to execute.
    pub pc: usize,
    /// Whether the machine has halted.
    pub halted: bool,
    /// The fatal engine error that ended the last run, if any.
    pub fault: Option<String>,
}

/// An interactive debugging session over one loaded program.
///
/// Owns the machine state it drives. Breakpoints are independent of the
/// machine and survive `restart`; the program itself is immutable and shared
/// read-only across restarts.
#[derive(Debug)]
pub struct Debugger {
    program: Program,
    machine: Machine,
    breakpoints: BTreeSet<usize>,
    state: SessionState,
    fault: Option<ExecError>,
}

impl Debugger {
    /// Starts a session over `program`: fresh machine, program counter 0,
    /// state [`SessionState::Ready`].
    pub fn new(program: Program) -> Self {
        Self {
            program,
            machine: Machine::new(),
            breakpoints: BTreeSet::new(),
            state: SessionState::Ready,
            fault: None,
        }
    }

    /// Replaces the loaded program with a new one.
    ///
    /// Resets the machine and clears breakpoints, which indexed lines of the
    /// old program. (Use [`restart`](Self::restart) to rerun the same
    /// program with breakpoints kept.)
    pub fn load(&mut self, program: Program) {
        self.program = program;
        self.machine = Machine::new();
        self.breakpoints.clear();
        self.state = SessionState::Ready;
        self.fault = None;
    }

    /// The loaded program.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The fatal engine error that ended the last run, if any. Cleared by
    /// [`restart`](Self::restart).
    pub fn fault(&self) -> Option<ExecError> {
        self.fault
    }

    /// Breakpoint lines, in order.
    pub fn breakpoints(&self) -> impl Iterator<Item = usize> + '_ {
        self.breakpoints.iter().copied()
    }

    /// Executes exactly one instruction.
    ///
    /// Valid from `Ready` or `AtBreakpoint`. After the step the session is
    /// re-evaluated against the breakpoint set at the *new* program counter.
    /// From `Halted` this fails with [`ExecError::MachineHalted`] and the
    /// session stays halted; a fatal engine error transitions to `Halted`
    /// with the fault recorded.
    pub fn step(&mut self) -> Result<StepResult, ExecError> {
        if self.state == SessionState::Halted {
            return Err(ExecError::MachineHalted);
        }
        match exec::step(&self.program, &mut self.machine) {
            Ok(StepResult::Halted) => {
                self.state = SessionState::Halted;
                Ok(StepResult::Halted)
            }
            Ok(result) => {
                self.state = if self.breakpoints.contains(&self.machine.pc) {
                    SessionState::AtBreakpoint
                } else {
                    SessionState::Ready
                };
                Ok(result)
            }
            Err(err) => {
                debug!(%err, pc = self.machine.pc, "fatal engine error");
                self.fault = Some(err);
                self.machine.halted = true;
                self.state = SessionState::Halted;
                Err(err)
            }
        }
    }

    /// Runs until `STOP`, a breakpoint, a fatal engine error, or `cancel`.
    ///
    /// The cancel flag is observed between steps, since each instruction is
    /// atomic, so an infinite, breakpoint-free program can be interrupted
    /// by another thread or a signal handler flipping the flag. When resuming
    /// from a breakpoint, at least one instruction executes before the set
    /// is consulted again, so the breakpoint being resumed from does not
    /// immediately re-trigger.
    pub fn run(&mut self, cancel: &AtomicBool) -> Result<RunOutcome, ExecError> {
        loop {
            if cancel.load(Ordering::Relaxed) {
                debug!(pc = self.machine.pc, "run cancelled");
                return Ok(RunOutcome::Cancelled);
            }
            match self.step()? {
                StepResult::Halted => return Ok(RunOutcome::Halted),
                StepResult::Continued | StepResult::Jumped => {
                    if self.state == SessionState::AtBreakpoint {
                        debug!(pc = self.machine.pc, "paused at breakpoint");
                        return Ok(RunOutcome::Breakpoint(self.machine.pc));
                    }
                }
            }
        }
    }

    /// Sets a breakpoint at instruction index `line`.
    ///
    /// `run` pauses when the program counter lands on `line`, before that
    /// line executes. Fails with [`ControlError::InvalidLine`] outside the
    /// program's instruction range; setting an existing breakpoint again is
    /// a no-op.
    pub fn set_breakpoint(&mut self, line: usize) -> Result<(), ControlError> {
        self.check_line(line)?;
        let _ = self.breakpoints.insert(line);
        Ok(())
    }

    /// Clears the breakpoint at instruction index `line`.
    ///
    /// Fails with [`ControlError::InvalidLine`] outside the program's
    /// instruction range; clearing a line with no breakpoint is a no-op.
    pub fn clear_breakpoint(&mut self, line: usize) -> Result<(), ControlError> {
        self.check_line(line)?;
        let _ = self.breakpoints.remove(&line);
        Ok(())
    }

    /// Writes a register directly, e.g. to seed inputs before a run.
    ///
    /// Fails with [`ControlError::InvalidRegister`] for a negative index;
    /// any non-negative index is a valid register.
    pub fn set_register(&mut self, index: i64, value: i64) -> Result<(), ControlError> {
        let idx =
            usize::try_from(index).map_err(|_| ControlError::InvalidRegister { index })?;
        self.machine.registers.set(idx, value);
        Ok(())
    }

    /// Takes a read-only snapshot of machine state; never mutates anything.
    pub fn inspect(&self) -> Snapshot {
        Snapshot {
            registers: self.machine.registers.iter().collect(),
            pc: self.machine.pc,
            halted: self.machine.halted,
            fault: self.fault.map(|err| err.to_string()),
        }
    }

    /// Restarts the same program from scratch: fresh machine, fault cleared,
    /// breakpoints preserved.
    pub fn restart(&mut self) {
        self.machine = Machine::new();
        self.state = SessionState::Ready;
        self.fault = None;
    }

    fn check_line(&self, line: usize) -> Result<(), ControlError> {
        if line >= self.program.len() {
            return Err(ControlError::InvalidLine {
                line,
                len: self.program.len(),
            });
        }
        Ok(())
    }
}
