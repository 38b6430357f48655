//! bytescope's single entry-point for turning byte-sequences into instruction streams.
//!
//! The scanner walks the buffer left to right, one opcode at a time. PUSH immediates are consumed
//! by the cursor advance, so a `0x5b` byte inside PUSH data is never reported as a `JUMPDEST`.
//! A PUSH whose immediate runs past the end of the buffer keeps whatever bytes remain; this is
//! the common case for runtime code followed by compiler metadata and is not an error.

use crate::Opcode;
use crate::hex_bytes::{HexArray, HexBytes};
use bytescope_utils::errors::DecodeError;
use hex::FromHex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::{fmt, fs, path::Path};
use tiny_keccak::{Hasher, Keccak};

/// Represents a single decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    /// Byte offset of the opcode within the buffer.
    pub offset: usize,
    /// The decoded opcode.
    pub op: Opcode,
    /// Immediate operand bytes. Empty for everything but `PUSH1..PUSH32`.
    pub imm: HexBytes,
}

/// Metadata about the decoded bytecode blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeInfo {
    /// number of bytes
    pub byte_length: usize,
    /// a 32-byte Keccak-256 hash of the raw bytes
    pub keccak_hash: HexArray<32>,
    /// where the bytes came from
    pub source: SourceType,
}

/// Source type of the bytecode input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Handed over as raw bytes by a caller.
    Bytes,
    /// Parsed from a hex string.
    HexString,
    /// Read from a file (hex text or raw binary).
    File,
}

/// A decoded buffer: the instruction stream, its jump destinations and blob metadata.
#[derive(Debug, Clone)]
pub struct DecodedBytecode {
    /// Instructions in scan order.
    pub instructions: Vec<Instruction>,
    /// Offsets of every real `JUMPDEST`.
    pub jump_dests: BTreeSet<usize>,
    /// Length, hash and origin of the input.
    pub info: DecodeInfo,
}

impl Instruction {
    /// Builds an instruction from its parts.
    pub fn new(offset: usize, op: Opcode, imm: impl Into<HexBytes>) -> Self {
        Self {
            offset,
            op,
            imm: imm.into(),
        }
    }

    /// Canonical mnemonic of the opcode.
    #[inline]
    pub fn mnemonic(&self) -> &'static str {
        self.op.mnemonic()
    }

    /// Returns the number of bytes this instruction occupies in the buffer.
    #[inline]
    pub fn byte_size(&self) -> usize {
        1 + self.imm.len()
    }

    /// True when a PUSH immediate was cut short by the end of the buffer.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.imm.len() < self.op.immediate_size()
    }

    /// The 32-byte stack word a `PUSH0..PUSH32` places, i.e. the immediate left-padded.
    ///
    /// Truncated immediates are padded as-is, matching how the missing bytes would be absent
    /// from the executed value.
    pub fn decoded_data(&self) -> Option<HexArray<32>> {
        self.op
            .is_constant_push()
            .then(|| HexArray::left_padded(&self.imm))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.imm.is_empty() {
            write!(f, "{:04x} {}", self.offset, self.op)
        } else {
            write!(f, "{:04x} {} {}", self.offset, self.op, self.imm)
        }
    }
}

/// Normalizes hex strings by removing whitespace, 0x prefix, and ensuring even length
pub fn normalize_hex_string(input: &str) -> Result<String, DecodeError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let clean = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);

    if let Some((index, c)) = clean.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(DecodeError::HexDecode(
            hex::FromHexError::InvalidHexCharacter { c, index },
        ));
    }

    // Ensure even length by padding with leading zero if necessary
    Ok(if clean.len() % 2 == 1 {
        format!("0{}", clean.to_ascii_lowercase())
    } else {
        clean.to_ascii_lowercase()
    })
}

/// Normalizes input into a byte vector from hex string or file.
///
/// Files holding hex text are decoded as hex; anything else is taken as raw binary.
pub fn input_to_bytes(input: &str, is_file: bool) -> Result<Vec<u8>, DecodeError> {
    if !is_file {
        let normalized = normalize_hex_string(input)?;
        return Vec::from_hex(&normalized).map_err(DecodeError::HexDecode);
    }

    let path = Path::new(input);
    let raw = fs::read(path).map_err(|e| DecodeError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    let as_hex = std::str::from_utf8(&raw)
        .ok()
        .and_then(|text| normalize_hex_string(text).ok())
        .and_then(|normalized| Vec::from_hex(&normalized).ok());

    match as_hex {
        Some(bytes) => Ok(bytes),
        None => {
            tracing::debug!("{} is not hex text, reading as raw bytecode", path.display());
            Ok(raw)
        }
    }
}

fn scan(bytes: &[u8]) -> Result<(Vec<Instruction>, BTreeSet<usize>), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyBytecode);
    }

    let mut instructions = Vec::with_capacity(bytes.len() / 2);
    let mut jump_dests = BTreeSet::new();
    let mut pc = 0;

    while pc < bytes.len() {
        let (op, imm_size) = Opcode::parse(bytes[pc]);
        let imm_start = pc + 1;
        let imm_end = (imm_start + imm_size).min(bytes.len());

        if imm_end - imm_start < imm_size {
            tracing::trace!(
                "{} at 0x{:04x} truncated to {} of {} immediate bytes",
                op,
                pc,
                imm_end - imm_start,
                imm_size
            );
        }
        if op == Opcode::JUMPDEST {
            jump_dests.insert(pc);
        }

        instructions.push(Instruction::new(pc, op, &bytes[imm_start..imm_end]));
        pc = imm_end;
    }

    Ok((instructions, jump_dests))
}

/// Decodes raw bytes into an ordered instruction stream.
///
/// Fails only when `bytes` is empty.
///
/// ```
/// use bytescope_core::decoder::decode;
///
/// let ins = decode(&[0x60, 0x01, 0x60, 0x02, 0x01]).unwrap();
/// let offsets: Vec<_> = ins.iter().map(|i| i.offset).collect();
/// assert_eq!(offsets, [0, 2, 4]);
/// ```
pub fn decode(bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
    scan(bytes).map(|(instructions, _)| instructions)
}

/// Collects the offsets of every `JUMPDEST` in an already decoded stream.
pub fn jump_destinations(instructions: &[Instruction]) -> BTreeSet<usize> {
    instructions
        .iter()
        .filter(|i| i.op == Opcode::JUMPDEST)
        .map(|i| i.offset)
        .collect()
}

/// Computes the Keccak-256 hash of `bytes`.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut keccak = Keccak::v256();
    keccak.update(bytes);
    let mut hash = [0u8; 32];
    keccak.finalize(&mut hash);
    hash
}

/// Decodes raw EVM bytecode into an instruction stream with jump destinations and metadata.
///
/// # Arguments
/// * `bytes` - The raw EVM bytecode bytes to decode.
/// * `source` - How the bytes were obtained.
pub fn decode_bytecode_from_bytes(
    bytes: &[u8],
    source: SourceType,
) -> Result<DecodedBytecode, DecodeError> {
    let (instructions, jump_dests) = scan(bytes)?;

    tracing::debug!(
        "decoded {} bytes into {} instructions ({} jumpdests)",
        bytes.len(),
        instructions.len(),
        jump_dests.len()
    );

    Ok(DecodedBytecode {
        instructions,
        jump_dests,
        info: DecodeInfo {
            byte_length: bytes.len(),
            keccak_hash: HexArray(keccak256(bytes)),
            source,
        },
    })
}

/// Decodes a hex string or file path into an instruction stream with metadata.
///
/// Convenience wrapper around [`decode_bytecode_from_bytes`] that handles input normalization.
///
/// # Arguments
/// * `input` - A hex string or file path representing the EVM bytecode.
/// * `is_file` - Flag indicating if the input is a file path (false for hex string).
///
/// # Returns
/// The decoded bytecode together with the raw bytes it was decoded from.
pub fn decode_bytecode(
    input: &str,
    is_file: bool,
) -> Result<(DecodedBytecode, Vec<u8>), DecodeError> {
    let bytes = input_to_bytes(input, is_file)?;
    let source = if is_file {
        SourceType::File
    } else {
        SourceType::HexString
    };

    let decoded = decode_bytecode_from_bytes(&bytes, source)?;
    Ok((decoded, bytes))
}
