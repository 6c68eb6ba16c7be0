use std::sync::atomic::AtomicBool;

use m8db_core::debugger::RunOutcome;
use m8db_core::{Debugger, Program, load};

/// Loads source that the test expects to be well-formed.
pub fn program(source: &str) -> Program {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    load(source).expect("test program should load")
}

/// Starts a debugging session over well-formed source.
pub fn session(source: &str) -> Debugger {
    Debugger::new(program(source))
}

/// Runs with a cancel flag that never flips.
pub fn run_free(dbg: &mut Debugger) -> RunOutcome {
    let cancel = AtomicBool::new(false);
    dbg.run(&cancel).expect("run should not fault")
}

/// The countdown program from the language examples: decrements register 1
/// until zero, then halts via the `done` label.
pub const COUNTDOWN: &str = "\
.start
DEC 1
IS_ZERO 1 done
JUMP start
.done
STOP
";

/// An infinite loop: register 0 becomes nonzero, so `IS_ZERO` never fires
/// and `JUMP 1` spins forever without reaching `STOP`.
pub const INFINITE_LOOP: &str = "\
INC 0
INC 0
IS_ZERO 0 4
JUMP 1
STOP
";
