//! Text in, report out, through the public API only.

use std::fs;

use pretty_assertions::assert_eq;

use uvm::bytecode::{decode_fields, encode_fields, Operation};
use uvm::{
  assemble, assemble_file, disassemble, run_program, Address, AssemblyErrorKind, DumpRange,
  MachineConfig, RunReport, UvmError, UVM
};

#[test]
fn load_then_read_register(){
  for r in &[0u32, 19, 63] {
    let assembly = assemble(&format!("LOAD 862, {}", r)).unwrap();
    assert_eq!(decode_fields(&assembly.program), Ok((Operation::Load.code(), 862, *r as u8)));

    let mut machine = UVM::new();
    machine.run(&assembly.program);
    assert_eq!(machine.register(*r as usize), Some(862));
  }
}

#[test]
fn store_then_read_through_memory(){
  let (value, addr, dst) = (0xC0FFEE, 1500, 42);
  let source = format!(
    "LOAD {v},0\nSTORE {a},0\nLOAD {a},1\nREAD {d},1",
    v = value, a = addr, d = dst
  );
  let mut machine = UVM::new();
  machine.run(&assemble(&source).unwrap().program);
  assert_eq!(machine.register(dst), Some(value));
}

#[test]
fn rotate_example(){
  let source = "
    LOAD 0x00ABCDEF, 5
    LOAD 8, 6
    STORE 300, 6
    LOAD 300, 7
    ROTR 5, 7
  ";
  let mut machine = UVM::new();
  machine.run(&assemble(source).unwrap().program);
  assert_eq!(machine.register(5), Some(0x00AB_CDEFu32.rotate_right(8)));
}

#[test]
fn failed_assembly_produces_nothing(){
  let error = assemble("LOAD 1, 2\nFOO 1,2\n").unwrap_err();
  assert_eq!(error.line, 2);
  assert_eq!(error.kind, AssemblyErrorKind::UnknownMnemonic("FOO".to_string()));
}

#[test]
fn trailing_fragment_is_ignored(){
  let mut program = assemble("LOAD 3, 3\nLOAD 4, 4").unwrap().program;
  program.extend_from_slice(&encode_fields(Operation::Load.code(), 9, 9).unwrap()[..4]);

  let report = run_program(&program, MachineConfig::default(), DumpRange::default());
  assert_eq!(report.registers.len(), 2);
  assert_eq!(report.info.program_size, 14);
}

#[test]
fn disassembly_round_trip(){
  let source = "STORE 16777215, 255\nROTR 1, 2\nREAD 3, 4";
  let program = assemble(source).unwrap().program;
  assert_eq!(disassemble(&program).join("\n"), source);
}

#[test]
fn report_file(){
  let program = assemble("LOAD 77, 2\nSTORE 150, 2").unwrap().program;
  let report = run_program(&program, MachineConfig::default(), DumpRange::default());

  let path = std::env::temp_dir().join(format!("uvm-report-{}.json", std::process::id()));
  report.write_json(&path).unwrap();
  let text = fs::read_to_string(&path).unwrap();
  fs::remove_file(&path).unwrap();

  let read_back: RunReport = serde_json::from_str(&text).unwrap();
  assert_eq!(read_back, report);
  assert_eq!(read_back.memory.get(&Address::Memory(0x96)), Some(&77));
  assert!(text.contains("\"0x0096\": 77"));
  assert_eq!(read_back.info.memory_range, "0-200");
}

#[test]
fn assemble_file_writes_program(){
  let dir = std::env::temp_dir();
  let input = dir.join(format!("uvm-source-{}.asm", std::process::id()));
  let output = dir.join(format!("uvm-source-{}.bin", std::process::id()));
  fs::write(&input, "; comment\nLOAD 862, 19\n").unwrap();

  let assembly = assemble_file(&input, &output).unwrap();
  let written = fs::read(&output).unwrap();
  fs::remove_file(&input).unwrap();
  fs::remove_file(&output).unwrap();

  assert_eq!(written, vec![0x54, 0x5E, 0x03, 0x00, 0x13]);
  assert_eq!(assembly.program, written);
  assert_eq!(assembly.listing[0].line, 2);
}

#[test]
fn assemble_file_rejects_invalid_utf8(){
  let dir = std::env::temp_dir();
  let input = dir.join(format!("uvm-latin1-{}.asm", std::process::id()));
  let output = dir.join(format!("uvm-latin1-{}.bin", std::process::id()));
  fs::write(&input, b"LOAD 1, 2 ; caf\xE9\n").unwrap();

  let result = assemble_file(&input, &output);
  fs::remove_file(&input).unwrap();

  match result {
    Err(UvmError::Utf8 { path, .. }) => assert_eq!(path, input.display().to_string()),
    other => panic!("expected a UTF-8 error, got {:?}", other),
  }
  assert!(!output.exists());
}
