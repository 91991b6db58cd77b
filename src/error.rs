/*!
  Error types. Assembly is strict: any malformed line aborts the whole translation unit and is
  reported with its line number and text. Execution is permissive: faults during a run are not
  errors at all, so nothing in here is produced by `UVM::run`.
*/

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// An operand does not fit in its field of the 5-byte instruction. Values too large for a `u64`
/// are reported as `u64::MAX`.
#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
pub enum OperandRangeError {
  /// Operand B occupies 3 bytes.
  #[error("operand B = {0} does not fit in 24 bits (max 0xFFFFFF)")]
  OperandB(u64),
  /// Operand C occupies 1 byte.
  #[error("operand C = {0} does not fit in 8 bits (max 0xFF)")]
  OperandC(u64),
}

/// A chunk handed to the decoder was not exactly one instruction long.
#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
#[error("malformed encoding: expected 5 bytes, got {length}")]
pub struct MalformedEncodingError {
  pub length: usize,
}

/// Text that is not a dump label (`R05` or `0x03BB`).
#[derive(Error, Clone, Eq, PartialEq, Debug)]
#[error("`{0}` is not a register or memory label")]
pub struct AddressParseError(pub String);

#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum AssemblyErrorKind {
  #[error("unknown mnemonic `{0}`")]
  UnknownMnemonic(String),
  #[error("invalid operand `{0}`")]
  InvalidOperand(String),
  #[error(transparent)]
  OperandRange(#[from] OperandRangeError),
  #[error("expected at most 2 operands, found {0}")]
  TooManyOperands(usize),
}

/// A line-level assembly failure. `line` is 1-based and `text` is the line exactly as written.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
#[error("Error on line {line}: {kind}\n  Line: '{text}'")]
pub struct AssemblyError {
  pub line: usize,
  pub text: String,
  pub kind: AssemblyErrorKind,
}

/// Errors at the file and front-end level.
#[derive(Error, Debug)]
pub enum UvmError {
  #[error(transparent)]
  Assembly(#[from] AssemblyError),
  #[error("{path}: {source}")]
  Io {
    path: String,
    #[source]
    source: io::Error,
  },
  #[error("{path}: assembly source is not valid UTF-8: {source}")]
  Utf8 {
    path: String,
    #[source]
    source: FromUtf8Error,
  },
  #[error("could not serialize the run report: {0}")]
  Report(#[from] serde_json::Error),
  #[error("invalid dump range {start}-{end}: start must be less than end")]
  InvalidRange { start: usize, end: usize },
}

impl UvmError {
  pub fn io(path: impl Into<String>, source: io::Error) -> UvmError {
    UvmError::Io { path: path.into(), source }
  }
}
