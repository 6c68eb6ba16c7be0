//! M8 register-machine debugger CLI.
//!
//! This binary provides two entry points over the core library:
//! 1. **Batch run:** `m8db <file>` loads an M8 program and runs it to
//!    completion, printing the final registers (or a JSON snapshot).
//! 2. **Interactive session:** `m8db` with no file starts a prompt reading
//!    debugger commands from standard input; commands map 1:1 onto the
//!    controller's operations.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::{fs, io};

use clap::Parser;

use m8db_core::debugger::RunOutcome;
use m8db_core::{Debugger, load};

#[derive(Parser, Debug)]
#[command(
    name = "m8db",
    author,
    version,
    about = "Debugger and interpreter for the M8 register machine",
    long_about = "Run an M8 program to completion, or debug it interactively.\n\nExamples:\n  m8db demos/countdown.m8\n  m8db demos/countdown.m8 --json\n  m8db               (then: load demos/countdown.m8)"
)]
struct Cli {
    /// M8 source file to load and run non-interactively; omit to start an
    /// interactive session.
    file: Option<PathBuf>,

    /// Print the final machine state as JSON instead of a register listing.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.file {
        Some(path) => run_batch(&path, cli.json),
        None => interactive(),
    }
}

/// Loads `path` and runs it to completion without breakpoints.
///
/// Exits 0 on a clean `STOP`; 1 on a read, parse, or fatal engine error.
fn run_batch(path: &Path, json: bool) -> ExitCode {
    let Some(mut dbg) = load_file(path) else {
        return ExitCode::FAILURE;
    };

    let cancel = AtomicBool::new(false);
    match dbg.run(&cancel) {
        Ok(RunOutcome::Halted) => {
            if json {
                print_json(&dbg);
            } else {
                print_registers(&dbg);
            }
            ExitCode::SUCCESS
        }
        // No breakpoints are set and the flag never flips in batch mode.
        Ok(RunOutcome::Breakpoint(_) | RunOutcome::Cancelled) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                print_json(&dbg);
            } else {
                print_registers(&dbg);
            }
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Reads and loads an M8 source file, reporting failures to stderr.
fn load_file(path: &Path) -> Option<Debugger> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read '{}': {err}", path.display());
            return None;
        }
    };
    match load(&source) {
        Ok(program) => Some(Debugger::new(program)),
        Err(err) => {
            eprintln!("{}: {err}", path.display());
            None
        }
    }
}

/// The interactive command loop.
///
/// Caller-misuse errors are printed and the session continues; `quit` exits
/// cleanly with code 0.
fn interactive() -> ExitCode {
    let stdin = io::stdin();
    let mut session: Option<Debugger> = None;
    let cancel = AtomicBool::new(false);

    loop {
        print!("(m8db) ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }
        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) | Err(_) => return ExitCode::SUCCESS,
            Ok(_) => {}
        }

        let mut tokens = input.split_whitespace();
        let Some(command) = tokens.next() else {
            continue;
        };

        match command {
            "q" | "quit" => return ExitCode::SUCCESS,
            "h" | "?" | "help" => print_help(),
            "load" => match tokens.next() {
                Some(path) => {
                    if let Some(dbg) = load_file(Path::new(path)) {
                        println!("loaded {} instructions", dbg.program().len());
                        session = Some(dbg);
                    }
                }
                None => println!("usage: load <file>"),
            },
            _ => {
                let Some(dbg) = session.as_mut() else {
                    println!("no program loaded; use: load <file>");
                    continue;
                };
                dispatch(dbg, command, &mut tokens, &cancel);
            }
        }
    }
}

/// Applies one command to a loaded session.
fn dispatch<'a>(
    dbg: &mut Debugger,
    command: &str,
    args: &mut impl Iterator<Item = &'a str>,
    cancel: &AtomicBool,
) {
    match command {
        "s" | "step" => match dbg.step() {
            Ok(_) => print_location(dbg),
            Err(err) => println!("error: {err}"),
        },
        "c" | "run" | "continue" => match dbg.run(cancel) {
            Ok(RunOutcome::Halted) => println!("machine halted"),
            Ok(RunOutcome::Breakpoint(line)) => println!("breakpoint at line {line}"),
            Ok(RunOutcome::Cancelled) => println!("run cancelled"),
            Err(err) => println!("error: {err}"),
        },
        "b" | "break" => match args.next() {
            Some(arg) => match arg.parse() {
                Ok(line) => match dbg.set_breakpoint(line) {
                    Ok(()) => {}
                    Err(err) => println!("error: {err}"),
                },
                Err(_) => println!("usage: break <line>"),
            },
            None => print_breakpoints(dbg),
        },
        "d" | "delete" => match args.next().and_then(|arg| arg.parse().ok()) {
            Some(line) => match dbg.clear_breakpoint(line) {
                Ok(()) => {}
                Err(err) => println!("error: {err}"),
            },
            None => println!("usage: delete <line>"),
        },
        "set" => match parse_set_args(args) {
            Some((register, value)) => match dbg.set_register(register, value) {
                Ok(()) => {}
                Err(err) => println!("error: {err}"),
            },
            None => println!("usage: set <register> <value>"),
        },
        "r" | "registers" => print_registers(dbg),
        "pc" => println!("pc = {}", dbg.inspect().pc),
        "p" | "program" => print_program(dbg),
        "restart" => {
            dbg.restart();
            println!("restarted");
        }
        other => println!("unknown command '{other}'; try: help"),
    }
}

fn parse_set_args<'a>(args: &mut impl Iterator<Item = &'a str>) -> Option<(i64, i64)> {
    let register = args.next()?.parse().ok()?;
    let value = args.next()?.parse().ok()?;
    Some((register, value))
}

fn print_location(dbg: &Debugger) {
    let snapshot = dbg.inspect();
    if snapshot.halted {
        println!("machine halted");
    } else if let Some(instr) = dbg.program().instr(snapshot.pc) {
        println!("{: >4}  {instr}", snapshot.pc);
    }
}

fn print_registers(dbg: &Debugger) {
    let snapshot = dbg.inspect();
    if snapshot.registers.is_empty() {
        println!("no registers written");
        return;
    }
    for (idx, val) in &snapshot.registers {
        println!("{idx: >4} : {val}");
    }
}

fn print_json(dbg: &Debugger) {
    match serde_json::to_string_pretty(&dbg.inspect()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("error: {err}"),
    }
}

/// Prints a listing window around the program counter, marking the current
/// line and any labels bound to it.
fn print_program(dbg: &Debugger) {
    let snapshot = dbg.inspect();
    let program = dbg.program();
    let lower = snapshot.pc.saturating_sub(5);
    let upper = program.len().min(snapshot.pc + 6);

    for idx in lower..upper {
        let Some(instr) = program.instr(idx) else {
            break;
        };
        for label in program.labels_at(idx) {
            println!("      .{label}");
        }
        let marker = if idx == snapshot.pc && !snapshot.halted {
            ">"
        } else {
            " "
        };
        println!("{marker} {idx: >3}  {instr}");
    }
}

fn print_breakpoints(dbg: &Debugger) {
    let lines: Vec<String> = dbg.breakpoints().map(|line| line.to_string()).collect();
    if lines.is_empty() {
        println!("no breakpoints set");
    } else {
        println!("breakpoints: {}", lines.join(", "));
    }
}

fn print_help() {
    println!(
        "Commands and their aliases:

    load <file>            -- Load an M8 program
    step (s)               -- Execute one instruction
    run / continue (c)     -- Run until STOP or a breakpoint
    break <line> (b)       -- Set a breakpoint; bare 'break' lists them
    delete <line> (d)      -- Clear a breakpoint
    set <register> <value> -- Write a register
    registers (r)          -- Show every written register
    pc                     -- Show the program counter
    program (p)            -- List instructions around the program counter
    restart                -- Rerun the same program; breakpoints kept
    help (h, ?)            -- Show this help
    quit (q)               -- Exit
    "
    );
}
