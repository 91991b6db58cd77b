/*!
  The human readable textual form of bytecode is called assembly. One line holds at most one
  instruction:

  ```text
  MNEMONIC [b[,] [c]]   ; optional comment
  ```

  Mnemonics are matched case-insensitively against the `strum` names of `Operation`. Operands
  are decimal or `0x`-prefixed hexadecimal and may be separated by commas, whitespace, or
  both. A missing `c` is 0, and a missing `b` is 0 as well.

  Translation is all or nothing: the first bad line aborts the whole source, and no bytes are
  produced.
*/

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use nom::{
  branch::alt,
  bytes::complete::{is_not, tag_no_case},
  character::complete::{
    char as one_char,
    digit1,
    hex_digit1,
    space0,
    space1
  },
  combinator::{map, opt, recognize},
  multi::many0,
  sequence::{pair, preceded, terminated, tuple},
  IResult
};

use crate::bytecode::binary::{encode_instruction, to_hex, EncodedInstruction};
use crate::bytecode::{Instruction, Operation};
use crate::error::{AssemblyError, AssemblyErrorKind, UvmError};

const COMMENT_CHAR: char = ';';

/// One line of the intermediate representation listing. Diagnostic only.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ListingEntry {
  /// 1-based source line.
  pub line        : usize,
  pub instruction : Instruction,
  pub bytes       : EncodedInstruction,
}

impl Display for ListingEntry {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{:>4}: {:<20} (A={}, B={}, C={})  {}",
      self.line,
      self.instruction.to_string(),
      self.instruction.opcode().code(),
      self.instruction.b(),
      self.instruction.c(),
      to_hex(&self.bytes).replace(' ', ", ")
    )
  }
}

/// The result of a successful translation.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Assembly {
  /// The binary program: each instruction's 5 bytes, in source order.
  pub program : Vec<u8>,
  pub listing : Vec<ListingEntry>,
}

// region Parsers

/// Anything up to the next separator.
fn token(input: &str) -> IResult<&str, &str> {
  is_not(" \t,")(input)
}

/// A comma with optional surrounding whitespace, or just whitespace.
fn separator(input: &str) -> IResult<&str, &str> {
  alt((
    recognize(tuple((space0, one_char(','), space0))),
    space1
  ))(input)
}

/// The mnemonic followed by its operand tokens. A trailing separator is allowed.
fn statement(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
  terminated(
    pair(token, many0(preceded(separator, token))),
    opt(separator)
  )(input)
}

/// A decimal or `0x` hex literal. The digits are already validated, so the only way the
/// conversion fails is overflow, which saturates and is caught by the range check.
fn number(input: &str) -> IResult<&str, u64> {
  alt((
    map(
      preceded(tag_no_case("0x"), hex_digit1),
      |digits: &str| u64::from_str_radix(digits, 16).unwrap_or(u64::MAX)
    ),
    map(digit1, |digits: &str| digits.parse::<u64>().unwrap_or(u64::MAX))
  ))(input)
}

// endregion

fn parse_operand(text: &str) -> Result<u64, AssemblyErrorKind> {
  match number(text) {
    Ok(("", value)) => Ok(value),
    _               => Err(AssemblyErrorKind::InvalidOperand(text.to_string()))
  }
}

/// Parses the code portion of a line, which is already trimmed and known to be non-empty.
fn parse_statement(code: &str) -> Result<Instruction, AssemblyErrorKind> {
  let (rest, (mnemonic, operand_tokens)) = statement(code)
    .map_err(|_| AssemblyErrorKind::UnknownMnemonic(code.to_string()))?;
  let operation = Operation::from_str(&mnemonic.to_ascii_uppercase())
    .map_err(|_| AssemblyErrorKind::UnknownMnemonic(mnemonic.to_string()))?;
  if !rest.is_empty() {
    return Err(AssemblyErrorKind::InvalidOperand(rest.to_string()));
  }
  if operand_tokens.len() > 2 {
    return Err(AssemblyErrorKind::TooManyOperands(operand_tokens.len()));
  }

  let operands = operand_tokens
    .iter()
    .map(|text| parse_operand(text))
    .collect::<Result<Vec<u64>, AssemblyErrorKind>>()?;
  let (b, c) =
    match operands.as_slice() {
      [b, c] => (*b, *c),
      [b]    => (*b, 0),
      _      => (0, 0)
    };

  Ok(Instruction::new(operation, b, c)?)
}

/**
  Parses a single source line. Returns `Ok(None)` for lines that are blank once the comment is
  removed.
*/
pub fn parse_line(line: usize, text: &str) -> Result<Option<Instruction>, AssemblyError> {
  let code = match text.find(COMMENT_CHAR) {
    Some(idx) => &text[..idx],
    None      => text
  }.trim();

  if code.is_empty() {
    return Ok(None);
  }

  parse_statement(code)
    .map(Some)
    .map_err(|kind| AssemblyError { line, text: text.to_string(), kind })
}

/// Parses every line of the source, pairing each instruction with its 1-based line number.
pub fn parse_assembly(text: &str) -> Result<Vec<(usize, Instruction)>, AssemblyError> {
  let mut instructions = Vec::new();
  for (idx, line_text) in text.lines().enumerate() {
    if let Some(instruction) = parse_line(idx + 1, line_text)? {
      instructions.push((idx + 1, instruction));
    }
  }
  Ok(instructions)
}

/// Translates assembly source into a binary program and its listing.
pub fn assemble(text: &str) -> Result<Assembly, AssemblyError> {
  let instructions = parse_assembly(text)?;

  let mut assembly = Assembly {
    program : Vec::with_capacity(instructions.len() * crate::bytecode::INSTRUCTION_SIZE),
    listing : Vec::with_capacity(instructions.len()),
  };
  for (line, instruction) in instructions {
    let bytes = encode_instruction(&instruction);
    assembly.program.extend_from_slice(&bytes);
    assembly.listing.push(ListingEntry { line, instruction, bytes });
  }

  debug!(
    "Assembled {} instructions into {} bytes.",
    assembly.listing.len(),
    assembly.program.len()
  );
  Ok(assembly)
}

/**
  Assembles the source file at `input` and writes the binary program to `output`. The source
  must be valid UTF-8. Nothing is written unless the whole file assembles.
*/
pub fn assemble_file(input: &Path, output: &Path) -> Result<Assembly, UvmError> {
  let bytes = fs::read(input).map_err(|e| UvmError::io(input.display().to_string(), e))?;
  let text = String::from_utf8(bytes)
    .map_err(|e| UvmError::Utf8 { path: input.display().to_string(), source: e })?;
  let assembly = assemble(&text)?;

  fs::write(output, &assembly.program)
    .map_err(|e| UvmError::io(output.display().to_string(), e))?;
  Ok(assembly)
}
