//! # Execution Engine Tests
//!
//! Per-opcode semantics of the single-step engine: arithmetic, control
//! transfer, halting, and the fatal cases.

use pretty_assertions::assert_eq;
use rstest::rstest;

use m8db_core::error::ExecError;
use m8db_core::exec::{StepResult, step};
use m8db_core::machine::Machine;

use crate::common::program;

#[test]
fn test_inc_increments_and_continues() {
    let program = program("INC 7\nSTOP\n");
    let mut machine = Machine::new();
    assert_eq!(step(&program, &mut machine), Ok(StepResult::Continued));
    assert_eq!(machine.registers.get(7), 1);
    assert_eq!(machine.pc, 1);
}

#[rstest]
#[case(0, -1)]
#[case(5, 4)]
#[case(-3, -4)]
fn test_dec_has_no_floor(#[case] start: i64, #[case] expected: i64) {
    let program = program("DEC 0\nSTOP\n");
    let mut machine = Machine::new();
    machine.registers.set(0, start);
    assert_eq!(step(&program, &mut machine), Ok(StepResult::Continued));
    assert_eq!(machine.registers.get(0), expected);
}

#[test]
fn test_inc_then_dec_round_trips() {
    let program = program("INC 2\nDEC 2\nSTOP\n");
    let mut machine = Machine::new();
    machine.registers.set(2, 41);
    let _ = step(&program, &mut machine);
    let _ = step(&program, &mut machine);
    assert_eq!(machine.registers.get(2), 41);
}

#[test]
fn test_jump_is_unconditional() {
    let program = program("JUMP 1\nSTOP\n");
    let mut machine = Machine::new();
    assert_eq!(step(&program, &mut machine), Ok(StepResult::Jumped));
    assert_eq!(machine.pc, 1);
}

#[test]
fn test_is_zero_jumps_on_zero_register() {
    let program = program("IS_ZERO 0 1\nSTOP\n");
    let mut machine = Machine::new();
    assert_eq!(step(&program, &mut machine), Ok(StepResult::Jumped));
    assert_eq!(machine.pc, 1);
}

#[test]
fn test_is_zero_falls_through_on_nonzero_register() {
    let program = program("IS_ZERO 0 0\nSTOP\n");
    let mut machine = Machine::new();
    machine.registers.set(0, -2);
    assert_eq!(step(&program, &mut machine), Ok(StepResult::Continued));
    assert_eq!(machine.pc, 1);
}

#[test]
fn test_stop_halts_without_moving_pc() {
    let program = program("STOP\n");
    let mut machine = Machine::new();
    assert_eq!(step(&program, &mut machine), Ok(StepResult::Halted));
    assert!(machine.halted);
    assert_eq!(machine.pc, 0);
}

#[test]
fn test_step_after_halt_is_an_error() {
    let program = program("STOP\n");
    let mut machine = Machine::new();
    let _ = step(&program, &mut machine);
    assert_eq!(step(&program, &mut machine), Err(ExecError::MachineHalted));
}

#[test]
fn test_running_off_the_end_is_an_error() {
    let program = program("INC 0\n");
    let mut machine = Machine::new();
    let _ = step(&program, &mut machine);
    assert_eq!(
        step(&program, &mut machine),
        Err(ExecError::PcOutOfRange { pc: 1, len: 1 })
    );
}

#[test]
fn test_untouched_registers_read_zero() {
    let machine = Machine::new();
    assert_eq!(machine.registers.get(0), 0);
    assert_eq!(machine.registers.get(1_000_000), 0);
}
