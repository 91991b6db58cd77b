/*!
  The record written after every run: the non-zero registers, the non-zero memory cells in the
  dump range, and a little metadata. It serializes to JSON as

  ```text
  {
    "registers": { "R19": 862 },
    "memory":    { "0x0309": 999 },
    "info":      { "program_size": 5, "memory_range": "0-200" }
  }
  ```

  Keys are `Address`es, which serialize as their labels. The maps are ordered by address, so
  `0x1001` comes before `0x10000` even though the labels alone would sort the other way.
*/

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::bytecode::Word;
use crate::error::UvmError;
use crate::uvm::{make_dump_table, DumpRange, MachineConfig, UVM};

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct RunInfo {
  /// Size of the binary program in bytes, including any ignored trailing fragment.
  pub program_size : usize,
  pub memory_range : String,
}

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct RunReport {
  pub registers : BTreeMap<Address, Word>,
  pub memory    : BTreeMap<Address, Word>,
  pub info      : RunInfo,
}

impl RunReport {
  /// Takes a snapshot of a machine that has finished running a program of `program_size` bytes.
  pub fn from_machine(machine: &UVM, program_size: usize, range: DumpRange) -> RunReport {
    RunReport {
      registers : machine.get_registers_dump().into_iter().collect(),
      memory    : machine.get_memory_dump(range.start, range.end).into_iter().collect(),
      info      : RunInfo {
        program_size,
        memory_range: range.to_string(),
      },
    }
  }

  pub fn to_json(&self) -> Result<String, UvmError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn write_json(&self, path: &Path) -> Result<(), UvmError> {
    fs::write(path, self.to_json()?)
      .map_err(|e| UvmError::io(path.display().to_string(), e))?;
    debug!("Wrote run report to {}", path.display());
    Ok(())
  }
}

/// Runs `program` on a fresh machine and reports on it.
pub fn run_program(program: &[u8], config: MachineConfig, range: DumpRange) -> RunReport {
  let mut machine = UVM::with_config(config);
  machine.run(program);
  RunReport::from_machine(&machine, program.len(), range)
}

impl Display for RunReport {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    fn entries(map: &BTreeMap<Address, Word>) -> Vec<(Address, Word)> {
      map.iter().map(|(address, value)| (*address, *value)).collect()
    }

    writeln!(f, "Program size: {} bytes", self.info.program_size)?;

    if self.registers.is_empty() {
      writeln!(f, "\nAll registers are zero.")?;
    } else {
      writeln!(f, "\nRegisters (non-zero):")?;
      write!(f, "{}", make_dump_table(&entries(&self.registers)))?;
    }

    if self.memory.is_empty() {
      writeln!(f, "\nAll memory in {} is zero.", self.info.memory_range)
    } else {
      writeln!(f, "\nMemory {} (non-zero):", self.info.memory_range)?;
      write!(f, "{}", make_dump_table(&entries(&self.memory)))
    }
  }
}
