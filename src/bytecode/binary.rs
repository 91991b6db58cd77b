/*!
  This module is responsible for the encoding and decoding of binary instructions.

  There is exactly one layout and it is the same for every opcode:

  ```text
  byte:   0          1    2    3          4
        [Opcode:8] [B:24, little-endian] [C:8]
  ```
*/
use std::convert::TryFrom;

use super::{Instruction, Operation};
use crate::error::{MalformedEncodingError, OperandRangeError};

// If you change these you must also change `encode_fields` and `decode_fields`.
pub type Word = u32;
pub const INSTRUCTION_SIZE: usize = 5;
pub const MAX_OPERAND_B: u32 = 0xFF_FFFF;
pub const MAX_OPERAND_C: u32 = 0xFF;

pub type EncodedInstruction = [u8; INSTRUCTION_SIZE];

/// The raw fields of one encoded instruction: `(opcode, b, c)`. The opcode need not be known.
pub type Fields = (u8, u32, u8);

/**
  Encodes an opcode byte and two operands. Fails if `b` does not fit in 3 bytes or `c` does
  not fit in 1 byte.
*/
pub fn encode_fields(opcode: u8, b: u32, c: u32) -> Result<EncodedInstruction, OperandRangeError> {
  if b > MAX_OPERAND_B {
    return Err(OperandRangeError::OperandB(b.into()));
  }
  if c > MAX_OPERAND_C {
    return Err(OperandRangeError::OperandC(c.into()));
  }
  let b = b.to_le_bytes();
  Ok([opcode, b[0], b[1], b[2], c as u8])
}

/// Encodes the instruction into bytecode. Operands were range checked on construction.
pub fn encode_instruction(instruction: &Instruction) -> EncodedInstruction {
  let b = instruction.b().to_le_bytes();
  [instruction.opcode().code(), b[0], b[1], b[2], instruction.c()]
}

/// Exact inverse of `encode_fields`. The chunk must be exactly `INSTRUCTION_SIZE` bytes.
pub fn decode_fields(chunk: &[u8]) -> Result<Fields, MalformedEncodingError> {
  match chunk {
    &[opcode, b0, b1, b2, c] => {
      Ok((opcode, u32::from_le_bytes([b0, b1, b2, 0]), c))
    }
    _ => Err(MalformedEncodingError { length: chunk.len() })
  }
}

/// Decodes a chunk into an `Instruction`, or `None` if the chunk is malformed or the opcode is
/// not one of ours.
pub fn try_decode_instruction(chunk: &[u8]) -> Option<Instruction> {
  let (opcode, b, c) = decode_fields(chunk).ok()?;
  let opcode = Operation::try_from(opcode).ok()?;
  // A decoded `b` is at most 24 bits wide, so this cannot fail.
  Instruction::new(opcode, b.into(), c.into()).ok()
}

/**
  Splits a binary program into the fields of its instructions, in order. A trailing chunk
  shorter than `INSTRUCTION_SIZE` is not an instruction and is dropped.
*/
pub fn decode_program(program: &[u8]) -> impl Iterator<Item = Fields> + '_ {
  program
    .chunks_exact(INSTRUCTION_SIZE)
    .filter_map(|chunk| decode_fields(chunk).ok())
}

/// Renders bytes the way the listing shows them: `54 5E 03 00 13`.
pub fn to_hex(bytes: &[u8]) -> String {
  bytes
    .iter()
    .map(|byte| format!("{:02X}", byte))
    .collect::<Vec<String>>()
    .join(" ")
}
