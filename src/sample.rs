//! A small program that exercises every operation, with the memory window that shows its effect.

use crate::uvm::DumpRange;

pub const SAMPLE_PROGRAM: &str = "; Sample program: one of each operation.

; R19 = 862
LOAD 862, 19

; R43 = MEM[R11], after putting 999 at address 777
LOAD 777, 11      ; R11 = 777 (an address)
LOAD 999, 0       ; R0 = 999
STORE 777, 0      ; MEM[777] = 999
READ 43, 11       ; R43 = MEM[777] = 999

; MEM[955] = R60
LOAD 12345, 60    ; R60 = 12345
STORE 955, 60     ; MEM[955] = 12345

; R36 rotated right by MEM[R48]
LOAD 0x00ABCDEF, 36  ; value to rotate
LOAD 8, 0            ; shift amount = 8
STORE 100, 0         ; MEM[100] = 8
LOAD 100, 48         ; R48 = 100 (address of the shift amount)
ROTR 36, 48          ; R36 = 0xEF00ABCD
";

pub const SAMPLE_RANGE: DumpRange = DumpRange { start: 0, end: 1000 };


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::assemble;
  use crate::report::run_program;
  use crate::uvm::MachineConfig;
  use pretty_assertions::assert_eq;

  #[test]
  fn sample_program_results(){
    let assembly = assemble(SAMPLE_PROGRAM).unwrap();
    assert_eq!(assembly.listing.len(), 12);

    let report = run_program(&assembly.program, MachineConfig::default(), SAMPLE_RANGE);
    let registers: Vec<(String, u32)> =
      report.registers.iter().map(|(address, value)| (address.to_string(), *value)).collect();
    assert_eq!(
      registers,
      vec![
        ("R00".to_string(), 8),
        ("R11".to_string(), 777),
        ("R19".to_string(), 862),
        ("R36".to_string(), 0xEF00_ABCD),
        ("R43".to_string(), 999),
        ("R48".to_string(), 100),
        ("R60".to_string(), 12345),
      ]
    );
    let memory: Vec<(String, u32)> =
      report.memory.iter().map(|(address, value)| (address.to_string(), *value)).collect();
    assert_eq!(
      memory,
      vec![("0x0064".to_string(), 8), ("0x0309".to_string(), 999), ("0x03BB".to_string(), 12345)]
    );
    assert_eq!(report.info.memory_range, "0-1000");
    assert_eq!(report.info.program_size, 60);
  }
}
