/*!

  Instructions are a fixed 5 bytes wide. Registers and memory cells hold 32 bit unsigned
  words. The sizes of instruction components are as follows:

    Opcode:     8 bits
    Operand B: 24 bits, little-endian
    Operand C:  8 bits

  The same layout is used for every opcode. Whether an operand is a literal, a register index,
  or a memory address is a property of the opcode, not of the encoding, so the decoder does not
  need to know which opcode it is looking at. A byte value that is not one of the four opcodes
  still decodes into fields; it is up to the machine to ignore it.

  A program is nothing but a concatenation of encoded instructions. There is no header, and a
  trailing fragment shorter than one instruction is not part of the program.

  As in the rest of the crate, an enum is used for the opcode itself, and the operands travel
  alongside it in a small `Copy` record.

*/

mod assembly;
mod binary;
mod disasm;
mod instruction;

pub use assembly::{assemble, assemble_file, parse_assembly, parse_line, Assembly, ListingEntry};
pub use binary::{
  decode_fields, decode_program, encode_fields, encode_instruction, to_hex, try_decode_instruction,
  EncodedInstruction, Fields, Word, INSTRUCTION_SIZE, MAX_OPERAND_B, MAX_OPERAND_C
};
pub use disasm::disassemble;
pub use instruction::{Instruction, Operation};
