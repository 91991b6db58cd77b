/*!
  An educational virtual machine. Programs are written in a four instruction assembly language,
  assembled into fixed width 5 byte instructions, and run against 64 registers and a flat
  memory of 32 bit words.

  The pipeline is this:
  ```text
  text -> [`bytecode::assemble`] -> bytes -> [`uvm::UVM::run`] -> [`report::RunReport`]
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bytecode;
pub mod error;
pub mod report;
pub mod sample;
pub mod uvm;

pub use address::Address;
pub use bytecode::{assemble, assemble_file, disassemble, Assembly, Instruction, Operation};
pub use error::{
  AddressParseError, AssemblyError, AssemblyErrorKind, MalformedEncodingError, OperandRangeError,
  UvmError
};
pub use report::{run_program, RunReport};
pub use uvm::{DumpRange, MachineConfig, UVM};
