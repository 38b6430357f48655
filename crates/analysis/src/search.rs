//! Queries over a decoded instruction stream.

use bytescope_core::decoder::{Instruction, keccak256};
use bytescope_core::{HexArray, Opcode};

/// Read-only query view over an instruction stream.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    instructions: &'a [Instruction],
}

impl<'a> Query<'a> {
    /// Wraps a decoded stream.
    pub const fn new(instructions: &'a [Instruction]) -> Self {
        Self { instructions }
    }

    /// True if any instruction uses `op`.
    pub fn opcode_found(&self, op: Opcode) -> bool {
        self.instructions.iter().any(|ins| ins.op == op)
    }

    /// Every instruction using `op`, in stream order.
    pub fn instructions_with_opcode(&self, op: Opcode) -> Vec<Instruction> {
        self.instructions.iter().filter(|ins| ins.op == op).cloned().collect()
    }

    /// True if an instruction with the same offset, opcode and immediate is present.
    pub fn match_instruction(&self, candidate: &Instruction) -> bool {
        self.instructions.iter().any(|ins| ins == candidate)
    }

    /// True if some `CALL` carries an immediate beginning with the given 4-byte selector.
    ///
    /// `hex_selector` may carry a `0x` prefix. A string that is not exactly four bytes of hex
    /// matches nothing.
    pub fn match_function_signature(&self, hex_selector: &str) -> bool {
        let Some(selector) = parse_selector(hex_selector) else {
            tracing::warn!("ignoring malformed selector {hex_selector:?}");
            return false;
        };
        self.instructions
            .iter()
            .any(|ins| ins.op == Opcode::CALL && ins.imm.starts_with(&selector))
    }

    /// The `PUSH4` instructions whose immediate is exactly `selector`.
    pub fn selector_references(&self, selector: [u8; 4]) -> Vec<&'a Instruction> {
        self.instructions
            .iter()
            .filter(|ins| ins.op == Opcode::PUSH(4) && ins.imm == selector[..])
            .collect()
    }
}

/// Parses a 4-byte selector written as exactly eight hex digits, with or without `0x`.
pub fn parse_selector(hex_selector: &str) -> Option<[u8; 4]> {
    let trimmed = hex_selector.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 8 {
        return None;
    }
    let mut selector = [0u8; 4];
    hex::decode_to_slice(digits, &mut selector).ok()?;
    Some(selector)
}

/// The selector of a canonical function signature, e.g. `transfer(address,uint256)`.
///
/// ```
/// use bytescope_analysis::search::selector_of;
///
/// assert_eq!(selector_of("transfer(address,uint256)").to_string(), "0xa9059cbb");
/// ```
pub fn selector_of(signature: &str) -> HexArray<4> {
    HexArray::left_padded(&keccak256(signature.as_bytes())[..4])
}
