//! Clarity Values - wire serialization
//!
//! Only the subset the client ever puts on the wire. The breaker functions
//! take no arguments, so in practice the argument vector is empty; booleans
//! are kept for tests and for symmetry with the read-side repr.

use std::fmt;

const TYPE_BOOL_TRUE: u8 = 0x03;
const TYPE_BOOL_FALSE: u8 = 0x04;

/// A serializable Clarity value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClarityValue {
    Bool(bool),
}

impl ClarityValue {
    /// Append the wire encoding to `out`
    pub fn serialize(&self, out: &mut Vec<u8>) {
        match self {
            ClarityValue::Bool(true) => out.push(TYPE_BOOL_TRUE),
            ClarityValue::Bool(false) => out.push(TYPE_BOOL_FALSE),
        }
    }

    /// Textual repr as the node's read endpoint would render it
    pub fn repr(&self) -> &'static str {
        match self {
            ClarityValue::Bool(true) => "true",
            ClarityValue::Bool(false) => "false",
        }
    }
}

impl fmt::Display for ClarityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.repr())
    }
}
