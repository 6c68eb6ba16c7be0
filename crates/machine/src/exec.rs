//! The execution engine: single-instruction dispatch.
//!
//! The engine executes exactly one instruction per call, advancing the
//! machine's program counter and registers according to the opcode's
//! semantics. Each step is atomic; all control over pacing (stepping,
//! running, pausing at breakpoints, cancellation) lives in the debugger
//! controller, which calls [`step`] in a loop.

use tracing::trace;

use crate::error::ExecError;
use crate::isa::Instr;
use crate::machine::Machine;
use crate::program::Program;

/// How a single step transferred control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Fell through to the next instruction.
    Continued,
    /// Control transferred to a jump target.
    Jumped,
    /// `STOP` executed; the machine is now halted.
    Halted,
}

/// Executes the instruction at the current program counter.
///
/// Fails with [`ExecError::MachineHalted`] if the machine already executed
/// `STOP`, and with [`ExecError::PcOutOfRange`] if control flow ran past the
/// last instruction. M8 has no fall-through rule, so a missing trailing
/// `STOP` is a program bug, not an implicit halt.
pub fn step(program: &Program, machine: &mut Machine) -> Result<StepResult, ExecError> {
    if machine.halted {
        return Err(ExecError::MachineHalted);
    }
    let Some(instr) = program.instr(machine.pc) else {
        return Err(ExecError::PcOutOfRange {
            pc: machine.pc,
            len: program.len(),
        });
    };
    trace!(pc = machine.pc, %instr, "executing");

    match instr {
        Instr::Inc(r) => {
            let val = machine.registers.get(r).wrapping_add(1);
            machine.registers.set(r, val);
            machine.pc += 1;
            Ok(StepResult::Continued)
        }
        Instr::Dec(r) => {
            // No floor at zero: registers are signed and unbounded.
            let val = machine.registers.get(r).wrapping_sub(1);
            machine.registers.set(r, val);
            machine.pc += 1;
            Ok(StepResult::Continued)
        }
        Instr::Jump(target) => {
            machine.pc = target;
            Ok(StepResult::Jumped)
        }
        Instr::IsZero(r, target) => {
            if machine.registers.get(r) == 0 {
                machine.pc = target;
                Ok(StepResult::Jumped)
            } else {
                machine.pc += 1;
                Ok(StepResult::Continued)
            }
        }
        Instr::Stop => {
            machine.halted = true;
            Ok(StepResult::Halted)
        }
    }
}
