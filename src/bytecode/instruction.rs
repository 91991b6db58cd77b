use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, IntoStaticStr, EnumString, EnumIter};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::bytecode::binary::{MAX_OPERAND_B, MAX_OPERAND_C};
use crate::error::OperandRangeError;

/**
  Opcodes of the virtual machine.

  The discriminant of each variant is the byte that appears in byte 0 of an encoded
  instruction, so the values below are significant and may not be reordered or renumbered.
  The text form is the upper case mnemonic. Parsing text into an `Operation` is case
  sensitive; the assembler upper cases the token first.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq, Debug,           Hash
)]
#[repr(u8)]
pub enum Operation {
  /// `LOAD b, c` : `R[c] = b`
  #[strum(to_string = "LOAD")]
  Load  =  84,
  /// `READ b, c` : `R[b] = MEM[R[c]]`
  #[strum(to_string = "READ")]
  Read  = 223,
  /// `STORE b, c` : `MEM[b] = R[c]`
  #[strum(to_string = "STORE")]
  Store =   9,
  /// `ROTR b, c` : `R[b] = R[b] rotated right by (MEM[R[c]] & 0x1F)`
  #[strum(to_string = "ROTR")]
  Rotr  = 213,
}

impl Operation {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn mnemonic(&self) -> &'static str {
    (*self).into()
  }
}

/**
  Holds the unencoded components of an instruction:

  ```text
  [Opcode:8][B:24, little-endian][C:8]
  ```

  The meaning of `b` and `c` (literal, register index, or memory address) depends on the
  opcode. An `Instruction` can only be built with operands that fit their fields, so every
  `Instruction` can be encoded.
*/
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct Instruction {
  opcode : Operation,
  b      : u32,
  c      : u8,
}

impl Instruction {
  pub fn new(opcode: Operation, b: u64, c: u64) -> Result<Instruction, OperandRangeError> {
    if b > u64::from(MAX_OPERAND_B) {
      return Err(OperandRangeError::OperandB(b));
    }
    if c > u64::from(MAX_OPERAND_C) {
      return Err(OperandRangeError::OperandC(c));
    }
    Ok(Instruction { opcode, b: b as u32, c: c as u8 })
  }

  pub fn opcode(&self) -> Operation {
    self.opcode
  }

  pub fn b(&self) -> u32 {
    self.b
  }

  pub fn c(&self) -> u8 {
    self.c
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}, {}", self.opcode, self.b, self.c)
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::convert::TryFrom;
  use std::str::FromStr;
  use strum::IntoEnumIterator;

  #[test]
  fn opcode_table(){
    assert_eq!(Operation::Load.code(),   84);
    assert_eq!(Operation::Read.code(),  223);
    assert_eq!(Operation::Store.code(),   9);
    assert_eq!(Operation::Rotr.code(),  213);
  }

  #[test]
  fn mnemonic_text(){
    for operation in Operation::iter() {
      let text = operation.to_string();
      assert_eq!(text, operation.mnemonic());
      assert_eq!(Operation::from_str(&text), Ok(operation));
      assert_eq!(Operation::try_from(operation.code()).ok(), Some(operation));
    }
    assert!(Operation::from_str("HALT").is_err());
    assert!(Operation::try_from(0u8).is_err());
  }

  #[test]
  fn operand_limits(){
    assert!(Instruction::new(Operation::Load, 0xFF_FFFF, 255).is_ok());
    assert_eq!(
      Instruction::new(Operation::Load, 1 << 24, 0),
      Err(OperandRangeError::OperandB(1 << 24))
    );
    assert_eq!(
      Instruction::new(Operation::Load, 0, 256),
      Err(OperandRangeError::OperandC(256))
    );
  }

  #[test]
  fn display(){
    let instruction = Instruction::new(Operation::Rotr, 36, 48).unwrap();
    assert_eq!(instruction.to_string(), "ROTR 36, 48");
  }
}
