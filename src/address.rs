//! An `Either` type that holds the address of either a register or a memory cell. The `Display`
//! form is the label used by dumps and the run report, and it is also how an `Address` is
//! serialized, so report keys read `R05` and `0x03BB` but sort by number.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};
use serde::{Serialize, Serializer};

use crate::error::AddressParseError;

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Address{
  /// An index into the register file.
  Register(AddressNumberType),
  /// An index into memory. Memory is addressed by word, not by byte.
  Memory(AddressNumberType)
}


impl Display for Address{
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self{
      Address::Register(i) => {
        write!(f, "R{:02}", i)
      },
      Address::Memory(i) => {
        write!(f, "0x{:04X}", i)
      }
    }
  }
}

impl FromStr for Address {
  type Err = AddressParseError;

  /// Inverse of `Display`. Any number of digits is accepted, so `R5` and `0x3BB` also parse.
  fn from_str(text: &str) -> Result<Address, AddressParseError> {
    let error = || AddressParseError(text.to_string());
    let (digits, radix) =
      if let Some(digits) = text.strip_prefix('R') {
        (digits, 10)
      } else if let Some(digits) = text.strip_prefix("0x") {
        (digits, 16)
      } else {
        return Err(error());
      };

    // `from_str_radix` would also take a leading sign.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
      return Err(error());
    }
    let idx = AddressNumberType::from_str_radix(digits, radix).map_err(|_| error())?;
    match radix {
      10 => Ok(Address::Register(idx)),
      _  => Ok(Address::Memory(idx))
    }
  }
}

// region serde

impl Serialize for Address {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

struct AddressVisitor;

impl<'de> Visitor<'de> for AddressVisitor {
  type Value = Address;

  fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str("a register label like `R05` or a memory label like `0x03BB`")
  }

  fn visit_str<E: de::Error>(self, text: &str) -> Result<Address, E> {
    Address::from_str(text).map_err(|_| E::invalid_value(Unexpected::Str(text), &self))
  }
}

impl<'de> Deserialize<'de> for Address {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
    deserializer.deserialize_str(AddressVisitor)
  }
}

// endregion


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels(){
    assert_eq!(Address::Register(5).to_string(),   "R05");
    assert_eq!(Address::Register(63).to_string(),  "R63");
    assert_eq!(Address::Memory(955).to_string(),   "0x03BB");
    assert_eq!(Address::Memory(0x1_0000).to_string(), "0x10000");
  }

  #[test]
  fn labels_parse_back(){
    for address in &[Address::Register(0), Address::Register(63), Address::Memory(955), Address::Memory(0x1_0000)] {
      assert_eq!(address.to_string().parse::<Address>(), Ok(*address));
    }
    assert_eq!("R5".parse::<Address>(), Ok(Address::Register(5)));
    assert_eq!("0x3bb".parse::<Address>(), Ok(Address::Memory(955)));
    for text in &["", "R", "0x", "R+5", "0x-1", "r05", "05", "R0x5", "0xG"] {
      assert_eq!(text.parse::<Address>(), Err(AddressParseError(text.to_string())), "{}", text);
    }
  }

  #[test]
  fn memory_sorts_by_number_not_label(){
    assert!(Address::Memory(0x1001) < Address::Memory(0x1_0000));
    assert!(Address::Memory(0x1001).to_string() > Address::Memory(0x1_0000).to_string());
  }

  #[test]
  fn registers_sort_before_memory(){
    assert!(Address::Register(63) < Address::Memory(0));
  }

  #[test]
  fn serialized_as_label(){
    assert_eq!(serde_json::to_string(&Address::Memory(955)).unwrap(), "\"0x03BB\"");
    assert_eq!(serde_json::from_str::<Address>("\"R07\"").unwrap(), Address::Register(7));
    assert!(serde_json::from_str::<Address>("\"bogus\"").is_err());
    assert!(serde_json::from_str::<Address>("7").is_err());
  }
}
