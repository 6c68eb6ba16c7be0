//! Two-pass loader: M8 source text to a resolved [`Program`].
//!
//! The loader performs all static work so the execution engine never touches
//! source text or label names:
//! 1. **Scan:** Classify each physical line as an instruction, a `.name`
//!    label declaration, a `#` comment, or blank, keeping 1-based line
//!    numbers for diagnostics. Labels bind to the index of the next
//!    executable instruction.
//! 2. **Resolve:** Decode each instruction line, then collapse every jump
//!    target (written either as an absolute instruction index or as a label
//!    name) to a plain index, rejecting anything out of range.
//!
//! Numeric targets address the label-stripped instruction sequence, 0-based,
//! so label and comment lines never shift them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ParseError, ParseErrorKind};
use crate::isa::Instr;
use crate::program::Program;

/// An unresolved jump target as written in source.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    /// Absolute instruction index, written as a bare integer.
    Index(usize),
    /// Symbolic label, resolved against the label table.
    Label(&'a str),
}

/// A decoded instruction whose jump target may still be symbolic.
#[derive(Debug, Clone, Copy)]
enum RawInstr<'a> {
    Inc(usize),
    Dec(usize),
    Jump(Target<'a>),
    IsZero(usize, Target<'a>),
    Stop,
}

/// Loads M8 source text into an immutable, fully resolved [`Program`].
///
/// Fails with a [`ParseError`] naming the offending 1-based source line on
/// malformed syntax: an unknown opcode, a wrong operand count or shape, a
/// duplicate label declaration, a reference to an undeclared label, or a
/// jump target past the last instruction. A failed load exposes no partial
/// program.
pub fn load(source: &str) -> Result<Program, ParseError> {
    let mut labels: BTreeMap<String, usize> = BTreeMap::new();
    let mut raw: Vec<(RawInstr<'_>, usize)> = Vec::new();

    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        match classify(text).map_err(|kind| ParseError::new(line, kind))? {
            LineKind::Blank => {}
            LineKind::Label(name) => {
                // Binds to the next executable instruction; a trailing label
                // binds to len and is caught below if anything targets it.
                if labels.insert(name.to_owned(), raw.len()).is_some() {
                    return Err(ParseError::new(
                        line,
                        ParseErrorKind::DuplicateLabel(name.to_owned()),
                    ));
                }
            }
            LineKind::Instr(instr) => raw.push((instr, line)),
        }
    }

    let len = raw.len();
    let mut instrs = Vec::with_capacity(len);
    let mut spans = Vec::with_capacity(len);

    for (instr, line) in &raw {
        let resolved = match *instr {
            RawInstr::Inc(r) => Instr::Inc(r),
            RawInstr::Dec(r) => Instr::Dec(r),
            RawInstr::Jump(target) => Instr::Jump(resolve(&labels, target, len, *line)?),
            RawInstr::IsZero(r, target) => Instr::IsZero(r, resolve(&labels, target, len, *line)?),
            RawInstr::Stop => Instr::Stop,
        };
        instrs.push(resolved);
        spans.push(*line);
    }

    debug!(instructions = len, labels = labels.len(), "program loaded");
    Ok(Program::new(instrs, spans, labels))
}

/// What a single physical source line turned out to be.
enum LineKind<'a> {
    Blank,
    Label(&'a str),
    Instr(RawInstr<'a>),
}

fn classify(text: &str) -> Result<LineKind<'_>, ParseErrorKind> {
    let mut tokens = text.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(LineKind::Blank);
    };
    if first.starts_with('#') {
        return Ok(LineKind::Blank);
    }

    if let Some(name) = first.strip_prefix('.') {
        if name.is_empty() {
            return Err(ParseErrorKind::UnknownOpcode(first.to_owned()));
        }
        if let Some(extra) = tokens.next() {
            return Err(ParseErrorKind::TrailingTokens(extra.to_owned()));
        }
        return Ok(LineKind::Label(name));
    }

    let instr = match first {
        "INC" => RawInstr::Inc(next_register(&mut tokens)?),
        "DEC" => RawInstr::Dec(next_register(&mut tokens)?),
        "JUMP" => RawInstr::Jump(next_target(&mut tokens)?),
        "IS_ZERO" => {
            let register = next_register(&mut tokens)?;
            RawInstr::IsZero(register, next_target(&mut tokens)?)
        }
        "STOP" => RawInstr::Stop,
        other => return Err(ParseErrorKind::UnknownOpcode(other.to_owned())),
    };

    if let Some(extra) = tokens.next() {
        return Err(ParseErrorKind::TrailingTokens(extra.to_owned()));
    }
    Ok(LineKind::Instr(instr))
}

fn next_register<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<usize, ParseErrorKind> {
    let token = tokens.next().ok_or(ParseErrorKind::MissingRegister)?;
    token
        .parse()
        .map_err(|_| ParseErrorKind::InvalidRegister(token.to_owned()))
}

fn next_target<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<Target<'a>, ParseErrorKind> {
    let token = tokens.next().ok_or(ParseErrorKind::MissingTarget)?;
    if let Ok(index) = token.parse() {
        return Ok(Target::Index(index));
    }
    // A numeric-looking token that failed to parse (e.g. "-3") is a malformed
    // index, not a label reference.
    if token.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
        return Err(ParseErrorKind::InvalidTarget(token.to_owned()));
    }
    Ok(Target::Label(token))
}

fn resolve(
    labels: &BTreeMap<String, usize>,
    target: Target<'_>,
    len: usize,
    line: usize,
) -> Result<usize, ParseError> {
    let index = match target {
        Target::Index(index) => index,
        Target::Label(name) => *labels.get(name).ok_or_else(|| {
            ParseError::new(line, ParseErrorKind::UnknownLabel(name.to_owned()))
        })?,
    };
    if index >= len {
        return Err(ParseError::new(
            line,
            ParseErrorKind::TargetOutOfRange { target: index, len },
        ));
    }
    Ok(index)
}
