//! Disassembly text and wire records for a decoded instruction stream.
//!
//! The text form has one line per instruction:
//!
//! ```text
//! 0000 PUSH1 0x80 // Place item on stack
//! 0002 MSTORE // Save word to memory
//! ```
//!
//! [`parse_disassembly`] reads offsets, mnemonics and immediates back out of that text, so the
//! rendering is lossless for structure. [`InstructionRecord`] is the serde form handed to other
//! processes.

use crate::config::DisassemblyOptions;
use crate::decoder::Instruction;
use crate::hex_bytes::{HexArray, HexBytes};
use crate::Opcode;
use bytescope_utils::errors::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Renders a single instruction as one disassembly line (no trailing newline).
pub fn render_line(ins: &Instruction, opts: &DisassemblyOptions) -> String {
    let mut line = format!("{:0width$x} {}", ins.offset, ins.op, width = opts.offset_width);
    if !ins.imm.is_empty() {
        let _ = write!(line, " {}", ins.imm);
    }
    if opts.descriptions {
        let _ = write!(line, " // {}", describe(ins));
    }
    line
}

/// Renders the whole stream, one line per instruction.
pub fn disassemble(instructions: &[Instruction], opts: &DisassemblyOptions) -> String {
    let mut out = String::with_capacity(instructions.len() * 32);
    for ins in instructions {
        out.push_str(&render_line(ins, opts));
        out.push('\n');
    }
    out
}

fn describe(ins: &Instruction) -> String {
    match ins.op {
        Opcode::Undefined(byte) => format!("{} (0x{byte:02x})", ins.op.description()),
        op if ins.is_truncated() => format!(
            "{} (truncated: {} of {} bytes)",
            op.description(),
            ins.imm.len(),
            op.immediate_size()
        ),
        op => op.description().to_string(),
    }
}

/// A line recovered from disassembly text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassembledLine {
    /// Byte offset
    pub offset: usize,
    /// Mnemonic as written
    pub mnemonic: String,
    /// Immediate bytes, empty when the line has none
    pub imm: HexBytes,
}

impl DisassembledLine {
    /// The opcode named by the mnemonic, if it names one.
    pub fn opcode(&self) -> Option<Opcode> {
        self.mnemonic.parse().ok()
    }
}

/// Parses disassembly text produced by [`disassemble`].
///
/// Handles lines like `0003 PUSH1 0x60 // comment` and skips blank lines.
pub fn parse_disassembly(text: &str) -> Result<Vec<DisassembledLine>, DecodeError> {
    let mut lines = Vec::new();
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.split("//").next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let parse_err = |msg: &str| DecodeError::Parse {
            line: line_no,
            msg: msg.to_string(),
            raw: raw.to_string(),
        };

        let mut parts = line.split_whitespace();
        let offset_hex = parts.next().ok_or_else(|| parse_err("missing offset"))?;
        let mnemonic = parts.next().ok_or_else(|| parse_err("missing mnemonic"))?;
        let imm = match parts.next() {
            Some(hex_imm) => hex::decode(hex_imm.trim_start_matches("0x"))
                .map_err(|_| parse_err("invalid immediate"))?,
            None => Vec::new(),
        };
        if parts.next().is_some() {
            return Err(parse_err("trailing tokens"));
        }

        let offset = usize::from_str_radix(offset_hex, 16).map_err(|_| parse_err("invalid offset"))?;
        if !mnemonic.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(parse_err("invalid mnemonic"));
        }

        lines.push(DisassembledLine {
            offset,
            mnemonic: mnemonic.to_string(),
            imm: HexBytes(imm),
        });
    }
    Ok(lines)
}

/// Wire representation of one instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRecord {
    /// Byte offset
    pub offset: usize,
    /// Numeric opcode value
    pub opcode: u8,
    /// Canonical mnemonic
    pub mnemonic: String,
    /// Immediate bytes as hex
    pub immediate: HexBytes,
    /// Stack word placed by a PUSH, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoded: Option<HexArray<32>>,
    /// Human description
    pub description: String,
    /// Whether the immediate was cut short by the end of input
    #[serde(default)]
    pub truncated: bool,
}

impl From<&Instruction> for InstructionRecord {
    fn from(ins: &Instruction) -> Self {
        Self {
            offset: ins.offset,
            opcode: ins.op.to_byte(),
            mnemonic: ins.mnemonic().to_string(),
            immediate: ins.imm.clone(),
            decoded: ins.decoded_data(),
            description: describe(ins),
            truncated: ins.is_truncated(),
        }
    }
}

impl InstructionRecord {
    /// Rebuilds the instruction the record describes.
    pub fn to_instruction(&self) -> Instruction {
        Instruction::new(self.offset, Opcode::from_byte(self.opcode), self.immediate.clone())
    }
}

/// Converts a stream into wire records.
pub fn to_records(instructions: &[Instruction]) -> Vec<InstructionRecord> {
    instructions.iter().map(InstructionRecord::from).collect()
}
