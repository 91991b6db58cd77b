//! Structures and functions for the virtual machine: a register file, a flat word-addressed
//! memory, and an interpreter that runs a binary program against them.
//!
//! Faults are not errors. An instruction whose register index, memory address, or opcode is
//! out of range does nothing, and execution continues with the next instruction.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use log::debug;
#[cfg(feature = "trace_computation")]
use log::trace;
use prettytable::{format as TableFormat, Table};

use crate::address::Address;
use crate::bytecode::{decode_program, Operation, Word, INSTRUCTION_SIZE};
use crate::error::UvmError;

pub const REGISTER_COUNT: usize = 64;
pub const DEFAULT_MEMORY_SIZE: usize = 2048;

/// Only the low 5 bits of a memory cell are used as a rotation amount.
const SHIFT_MASK: Word = 0x1F;

// region Configuration

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MachineConfig {
  /// Number of words of memory.
  pub memory_size: usize,
}

impl Default for MachineConfig {
  fn default() -> MachineConfig {
    MachineConfig { memory_size: DEFAULT_MEMORY_SIZE }
  }
}

/// A half open window `[start, end)` of memory addresses to dump.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DumpRange {
  pub start : usize,
  pub end   : usize,
}

impl DumpRange {
  pub fn new(start: usize, end: usize) -> Result<DumpRange, UvmError> {
    if start >= end {
      return Err(UvmError::InvalidRange { start, end });
    }
    Ok(DumpRange { start, end })
  }
}

impl Default for DumpRange {
  fn default() -> DumpRange {
    DumpRange { start: 0, end: 200 }
  }
}

impl Display for DumpRange {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}-{}", self.start, self.end)
  }
}

// endregion

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum State {
  Idle,
  Running,
  Halted
}

impl Display for State {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      State::Idle    => write!(f, "Idle"),
      State::Running => write!(f, "Running"),
      State::Halted  => write!(f, "Halted")
    }
  }
}

pub struct UVM {
  config    : MachineConfig,
  state     : State,

  // Memory Stores
  registers : [Word; REGISTER_COUNT],
  memory    : Vec<Word>,

  /// Byte offset of the current instruction; a cursor.
  ip        : usize,
}

impl UVM {

  // region Low-level utility methods

  pub fn new() -> UVM {
    UVM::with_config(MachineConfig::default())
  }

  pub fn with_config(config: MachineConfig) -> UVM {
    UVM {
      config,
      state     :  State::Idle,
      registers :  [0; REGISTER_COUNT],
      memory    :  vec![0; config.memory_size],
      ip        :  0,
    }
  }

  pub fn config(&self) -> MachineConfig {
    self.config
  }

  pub fn state(&self) -> State {
    self.state
  }

  /// Clears every register and memory cell.
  pub fn reset(&mut self) {
    self.registers = [0; REGISTER_COUNT];
    self.memory.clear();
    self.memory.resize(self.config.memory_size, 0);
    self.ip    = 0;
    self.state = State::Idle;
  }

  /// The register index named by `value`, if there is such a register.
  fn register_idx(value: Word) -> Option<usize> {
    let idx = value as usize;
    if idx < REGISTER_COUNT { Some(idx) } else { None }
  }

  /// The memory index named by `value`, if it is inside memory.
  fn memory_idx(&self, value: Word) -> Option<usize> {
    let idx = value as usize;
    if idx < self.memory.len() { Some(idx) } else { None }
  }

  pub fn register(&self, idx: usize) -> Option<Word> {
    self.registers.get(idx).copied()
  }

  pub fn memory_cell(&self, idx: usize) -> Option<Word> {
    self.memory.get(idx).copied()
  }

  // endregion

  // region Execution

  /**
    Runs a binary program from a fresh, all zero machine. Execution is linear: every complete
    5 byte chunk is executed exactly once, in order, and a trailing partial chunk is ignored.
  */
  pub fn run(&mut self, program: &[u8]) {
    self.reset();
    self.state = State::Running;

    for (opcode, b, c) in decode_program(program) {
      let executed = self.execute(opcode, b, c).is_some();

      #[cfg(feature = "trace_computation")]
        {
          match Operation::try_from(opcode) {
            Ok(operation) if executed => trace!("{:>6}: {} {}, {}", self.ip, operation, b, c),
            Ok(operation) => trace!("{:>6}: {} {}, {}  (skipped)", self.ip, operation, b, c),
            Err(_)        => trace!("{:>6}: opcode {} is not an operation (skipped)", self.ip, opcode)
          }
        }
      #[cfg(not(feature = "trace_computation"))]
        let _ = executed;

      self.ip += INSTRUCTION_SIZE;
    }

    self.state = State::Halted;
    debug!(
      "Executed {} instructions; {} trailing bytes ignored.",
      self.ip / INSTRUCTION_SIZE,
      program.len() % INSTRUCTION_SIZE
    );
  }

  /// Executes one decoded instruction. Returns `None` if it had no effect because an index was
  /// out of range or the opcode is not an operation.
  fn execute(&mut self, opcode: u8, b: Word, c: u8) -> Option<()> {
    match Operation::try_from(opcode) {
      Ok(Operation::Load)  => self.load(b, c),
      Ok(Operation::Read)  => self.read(b, c),
      Ok(Operation::Store) => self.store(b, c),
      Ok(Operation::Rotr)  => self.rotr(b, c),
      Err(_)               => None
    }
  }

  /// `R[c] = b`
  fn load(&mut self, b: Word, c: u8) -> Option<()> {
    let dst = UVM::register_idx(c as Word)?;
    self.registers[dst] = b;
    Some(())
  }

  /// `R[b] = MEM[R[c]]`
  fn read(&mut self, b: Word, c: u8) -> Option<()> {
    let src  = UVM::register_idx(c as Word)?;
    let addr = self.memory_idx(self.registers[src])?;
    let dst  = UVM::register_idx(b)?;
    self.registers[dst] = self.memory[addr];
    Some(())
  }

  /// `MEM[b] = R[c]`
  fn store(&mut self, b: Word, c: u8) -> Option<()> {
    let src  = UVM::register_idx(c as Word)?;
    let addr = self.memory_idx(b)?;
    self.memory[addr] = self.registers[src];
    Some(())
  }

  /// `R[b] = R[b] >>> (MEM[R[c]] & 0x1F)`, a 32 bit circular shift right.
  fn rotr(&mut self, b: Word, c: u8) -> Option<()> {
    let reg   = UVM::register_idx(b)?;
    let src   = UVM::register_idx(c as Word)?;
    let addr  = self.memory_idx(self.registers[src])?;
    let shift = self.memory[addr] & SHIFT_MASK;
    self.registers[reg] = self.registers[reg].rotate_right(shift);
    Some(())
  }

  // endregion

  // region Dumps

  /// Every register holding a non-zero value, in register order.
  pub fn get_registers_dump(&self) -> Vec<(Address, Word)> {
    self.registers
        .iter()
        .enumerate()
        .filter(|(_, value)| **value != 0)
        .map(|(i, value)| (Address::Register(i), *value))
        .collect()
  }

  /// Every memory cell in `[start, end)` holding a non-zero value. `end` is clamped to the
  /// memory size.
  pub fn get_memory_dump(&self, start: usize, end: usize) -> Vec<(Address, Word)> {
    let end = end.min(self.memory.len());
    if start >= end {
      return vec![];
    }
    self.memory[start..end]
        .iter()
        .enumerate()
        .filter(|(_, value)| **value != 0)
        .map(|(i, value)| (Address::Memory(i + start), *value))
        .collect()
  }

  // endregion

}

impl Default for UVM {
  fn default() -> UVM {
    UVM::new()
  }
}

// region Display methods

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/// Builds a table of `address = value` rows, showing each value in decimal and hexadecimal.
pub(crate) fn make_dump_table<A: Display>(entries: &[(A, Word)]) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Address", ubr->"Decimal", ubl->"Hex"]);

  for (address, value) in entries {
    table.add_row(
      row![r->format!("{} =", address), r->value, format!("0x{:08X}", value)]
    );
  }
  table
}

impl Display for UVM {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let r_table = make_dump_table(&self.get_registers_dump());
    let m_table = make_dump_table(&self.get_memory_dump(0, self.memory.len()));

    let mut combined_table = table!([r_table, m_table]);

    combined_table.set_titles(row![ub->"Registers", ub->"Memory"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "State: {}\tIP: {}\n{}", self.state, self.ip, combined_table)
  }
}

// endregion
