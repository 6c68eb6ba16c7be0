//! # Instruction Set Tests
//!
//! Accessors and the canonical-syntax display form used by listings.

use pretty_assertions::assert_eq;
use rstest::rstest;

use m8db_core::isa::Instr;

#[rstest]
#[case(Instr::Inc(0), "INC 0")]
#[case(Instr::Dec(12), "DEC 12")]
#[case(Instr::Jump(3), "JUMP 3")]
#[case(Instr::IsZero(1, 4), "IS_ZERO 1 4")]
#[case(Instr::Stop, "STOP")]
fn test_display_is_canonical_syntax(#[case] instr: Instr, #[case] expected: &str) {
    assert_eq!(instr.to_string(), expected);
}

#[test]
fn test_register_accessor() {
    assert_eq!(Instr::Inc(5).register(), Some(5));
    assert_eq!(Instr::Dec(5).register(), Some(5));
    assert_eq!(Instr::IsZero(5, 0).register(), Some(5));
    assert_eq!(Instr::Jump(0).register(), None);
    assert_eq!(Instr::Stop.register(), None);
}

#[test]
fn test_target_accessor() {
    assert_eq!(Instr::Jump(9).target(), Some(9));
    assert_eq!(Instr::IsZero(0, 9).target(), Some(9));
    assert_eq!(Instr::Inc(0).target(), None);
    assert_eq!(Instr::Stop.target(), None);
}
