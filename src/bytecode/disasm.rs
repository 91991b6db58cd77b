//! Turns a binary program back into assembly text, one instruction per line. Chunks whose opcode
//! is not an operation, and a trailing fragment, come out as comments so the text still
//! assembles.

use super::binary::{to_hex, try_decode_instruction, INSTRUCTION_SIZE};

pub fn disassemble(program: &[u8]) -> Vec<String> {
  let chunks = program.chunks_exact(INSTRUCTION_SIZE);
  let remainder = chunks.remainder();

  let mut lines: Vec<String> =
    chunks.map(|chunk| {
      match try_decode_instruction(chunk) {
        Some(instruction) => instruction.to_string(),
        None => format!("; opcode {} is not an operation: {}", chunk[0], to_hex(chunk))
      }
    }).collect();

  if !remainder.is_empty() {
    lines.push(format!("; trailing bytes: {}", to_hex(remainder)));
  }
  lines
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::assemble;

  #[test]
  fn reassembles_to_the_same_bytes(){
    let source = "LOAD 862, 19\nREAD 43, 11\nSTORE 955, 60\nROTR 36, 48\nLOAD 0, 0";
    let program = assemble(source).unwrap().program;
    let lines = disassemble(&program);
    assert_eq!(lines.join("\n"), source);
    assert_eq!(assemble(&lines.join("\n")).unwrap().program, program);
  }

  #[test]
  fn unknown_opcodes_and_fragments_become_comments(){
    let lines = disassemble(&[0xAA, 1, 0, 0, 2, 84, 5, 0, 0, 1, 9, 9]);
    assert_eq!(
      lines,
      vec![
        "; opcode 170 is not an operation: AA 01 00 00 02".to_string(),
        "LOAD 5, 1".to_string(),
        "; trailing bytes: 09 09".to_string(),
      ]
    );
    assert!(disassemble(&[]).is_empty());
  }
}
