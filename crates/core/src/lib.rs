//! Core decoding layer: the opcode table, the instruction scanner, disassembly/wire rendering and
//! analysis configuration.

pub mod config;
pub mod decoder;
pub mod disasm;
pub mod hex_bytes;
pub mod opcode;

pub use decoder::{DecodedBytecode, Instruction};
pub use hex_bytes::{HexArray, HexBytes};
pub use opcode::{Opcode, mnemonic};
