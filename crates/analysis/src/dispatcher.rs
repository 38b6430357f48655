//! Recognition of the Solidity selector dispatcher.
//!
//! Solidity-compiled contracts open with a prologue that loads the first calldata word, shifts
//! the 4-byte selector down and then compares it against every external function:
//!
//! ```text
//! PUSH1 0x00 CALLDATALOAD PUSH1 0xe0 SHR
//! DUP1 PUSH4 <selector> EQ PUSH2 <target> JUMPI
//! DUP1 PUSH4 <selector> EQ PUSH2 <target> JUMPI
//! ...
//! ```
//!
//! Detection recovers the selector → jump target pairs from that comparison chain. Indices are
//! positions in the instruction slice, targets are byte offsets.

use bytescope_core::decoder::Instruction;
use bytescope_core::{HexArray, Opcode};
use serde::{Deserialize, Serialize};

/// How far into the stream the prologue may start.
const PROLOGUE_SEARCH_WINDOW: usize = 200;

/// Maximum instructions between a comparison and its `JUMPI`.
const JUMPI_LOOKAHEAD: usize = 10;

/// A detected dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherInfo {
    /// Index of the first prologue instruction
    pub start_index: usize,
    /// Index one past the last comparison block
    pub end_index: usize,
    /// Selectors in comparison order
    pub selectors: Vec<FunctionSelector>,
    /// Which prologue shape was matched
    pub extraction_pattern: ExtractionPattern,
}

/// One selector comparison found in the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSelector {
    /// 4-byte function selector
    pub selector: HexArray<4>,
    /// Byte offset jumped to on a match, when the comparison pushes one
    pub target: Option<usize>,
    /// Index of the `PUSH4` carrying the selector
    pub instruction_index: usize,
}

/// Selector-extraction prologues emitted by different compiler versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPattern {
    /// `PUSH1 0x00 | PUSH0` `CALLDATALOAD PUSH1 0xe0 SHR`
    Standard,
    /// `PUSH1 0x00 | PUSH0` `CALLDATALOAD PUSH29 <mask> SHR`
    Alternative,
    /// `CALLDATALOAD PUSH1 0xe0 SHR` with the offset pushed earlier
    Newer,
    /// `CALLDATASIZE ISZERO`, contracts with only a fallback
    Fallback,
    /// `PUSH1 0x00 | PUSH0` `CALLDATALOAD` compared without a shift
    Direct,
}

impl ExtractionPattern {
    /// Number of instructions the prologue occupies.
    pub const fn len(self) -> usize {
        match self {
            Self::Standard | Self::Alternative => 4,
            Self::Newer => 3,
            Self::Fallback | Self::Direct => 2,
        }
    }

    /// Always false: every prologue spans at least two instructions.
    pub const fn is_empty(self) -> bool {
        false
    }
}

fn is_zero_push(ins: &Instruction) -> bool {
    ins.op == Opcode::PUSH0 || (ins.op == Opcode::PUSH(1) && ins.imm[..] == [0x00])
}

fn is_push_of(ins: &Instruction, n: u8, imm: Option<u8>) -> bool {
    ins.op == Opcode::PUSH(n) && imm.is_none_or(|b| ins.imm[..] == [b])
}

/// Matches a calldata selector-extraction prologue at the start of `instrs`.
pub fn is_calldata_extraction_pattern(instrs: &[Instruction]) -> Option<ExtractionPattern> {
    let op = |i: usize| instrs.get(i).map(|ins| ins.op);

    if let [zero, load, shift, shr, ..] = instrs
        && is_zero_push(zero)
        && load.op == Opcode::CALLDATALOAD
        && shr.op == Opcode::SHR
    {
        if is_push_of(shift, 1, Some(0xe0)) {
            return Some(ExtractionPattern::Standard);
        }
        if is_push_of(shift, 29, None) {
            return Some(ExtractionPattern::Alternative);
        }
    }

    if let [load, shift, shr, ..] = instrs
        && load.op == Opcode::CALLDATALOAD
        && (is_push_of(shift, 1, Some(0xe0)) || is_push_of(shift, 29, None))
        && shr.op == Opcode::SHR
    {
        return Some(ExtractionPattern::Newer);
    }

    if op(0) == Some(Opcode::CALLDATASIZE) && op(1) == Some(Opcode::ISZERO) {
        return Some(ExtractionPattern::Fallback);
    }

    if let [zero, load, ..] = instrs
        && is_zero_push(zero)
        && load.op == Opcode::CALLDATALOAD
    {
        return Some(ExtractionPattern::Direct);
    }

    None
}

/// Parses `[DUP1] PUSH4 <selector> (EQ|GT) ... PUSHn <target> ... JUMPI`.
///
/// Returns the selector, its target and the number of instructions consumed.
fn parse_selector_check(instrs: &[Instruction]) -> Option<(HexArray<4>, Option<usize>, usize)> {
    let mut i = usize::from(instrs.first()?.op == Opcode::DUP(1));

    let push = instrs.get(i)?;
    if push.op != Opcode::PUSH(4) || push.imm.len() != 4 {
        return None;
    }
    let selector = HexArray::left_padded(&push.imm);
    i += 1;

    if !matches!(instrs.get(i)?.op, Opcode::EQ | Opcode::GT) {
        return None;
    }
    i += 1;

    let mut target = None;
    for (j, ins) in instrs.iter().enumerate().skip(i).take(JUMPI_LOOKAHEAD) {
        if let Opcode::PUSH(1..=4) = ins.op {
            target = Some(ins.imm.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b)));
        }
        if ins.op == Opcode::JUMPI {
            return Some((selector, target, j + 1));
        }
    }
    None
}

fn detect_at(instrs: &[Instruction], base: usize) -> Option<DispatcherInfo> {
    let (start, pattern) = (0..instrs.len())
        .find_map(|i| is_calldata_extraction_pattern(&instrs[i..]).map(|p| (i, p)))?;
    tracing::debug!("found {pattern:?} selector prologue at index {}", base + start);

    let mut cursor = start + pattern.len();
    let mut selectors = Vec::new();
    let mut end = cursor;

    while cursor < instrs.len() {
        if let Some((selector, target, consumed)) = parse_selector_check(&instrs[cursor..]) {
            let push_index = cursor + usize::from(instrs[cursor].op == Opcode::DUP(1));
            tracing::trace!("selector {selector} -> {target:?}");
            selectors.push(FunctionSelector {
                selector,
                target,
                instruction_index: base + push_index,
            });
            cursor += consumed;
            end = cursor;
            continue;
        }

        // A PUSH4 compared without a recognisable JUMPI still names a selector.
        let ins = &instrs[cursor];
        if ins.op == Opcode::PUSH(4)
            && ins.imm.len() == 4
            && matches!(instrs.get(cursor + 1).map(|n| n.op), Some(Opcode::EQ | Opcode::GT))
        {
            selectors.push(FunctionSelector {
                selector: HexArray::left_padded(&ins.imm),
                target: None,
                instruction_index: base + cursor,
            });
            cursor += 2;
            end = cursor;
            continue;
        }

        cursor += 1;
    }

    if selectors.is_empty() {
        return None;
    }

    Some(DispatcherInfo {
        start_index: base + start,
        end_index: base + end,
        selectors,
        extraction_pattern: pattern,
    })
}

/// Detects the Solidity function dispatcher in `instructions`.
///
/// The prologue is searched for near the start of the stream, restarting every ten instructions
/// so a non-dispatching prologue match does not hide a later one.
pub fn detect_function_dispatcher(instructions: &[Instruction]) -> Option<DispatcherInfo> {
    let window = instructions.len().min(PROLOGUE_SEARCH_WINDOW);
    let found = (0..window)
        .step_by(10)
        .find_map(|start| detect_at(&instructions[start..], start));

    match &found {
        Some(info) => tracing::debug!(
            "dispatcher with {} selectors ({:?})",
            info.selectors.len(),
            info.extraction_pattern
        ),
        None => tracing::debug!("no selector dispatcher detected"),
    }
    found
}

/// Returns true iff a dispatcher was found.
pub fn has_dispatcher(instructions: &[Instruction]) -> bool {
    detect_function_dispatcher(instructions).is_some()
}
