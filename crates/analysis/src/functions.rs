//! Splits an instruction stream into candidate function bodies.
//!
//! A segment opens at a jump destination reached while nothing is open and closes at the first
//! flow-terminating instruction (`STOP`, `RETURN`, `REVERT`, `INVALID`, `SELFDESTRUCT` or an
//! unconditional `JUMP`) at the segment's own depth. A jump destination met inside an open segment
//! starts a nested [`BodyItem::Block`]; the block closes at the next `JUMPI` or terminator.
//!
//! The boundaries are a heuristic and not a function recovery: compiler-generated dispatch code
//! and shared tails will land in whatever segment happens to be open.

use crate::tree::TreeNode;
use bytescope_core::config::SelectorScan;
use bytescope_core::decoder::{Instruction, jump_destinations};
use bytescope_core::{HexArray, Opcode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An element of a segment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyItem {
    /// A plain instruction at the segment's depth
    Instruction(Instruction),
    /// A nested block rooted at an inner `JUMPDEST`
    Block(TreeNode),
}

impl BodyItem {
    fn instructions(&self) -> Box<dyn Iterator<Item = &Instruction> + '_> {
        match self {
            Self::Instruction(ins) => Box::new(std::iter::once(ins)),
            Self::Block(node) => Box::new(node.iter()),
        }
    }
}

/// A candidate function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSegment {
    /// Offset of the opening `JUMPDEST`
    pub entry_offset: usize,
    /// First 4-byte PUSH immediate found from the entry onwards
    pub selector: Option<HexArray<4>>,
    /// Instructions and nested blocks, in stream order
    pub body: Vec<BodyItem>,
    /// Offset of the last instruction in the segment
    pub end_offset: usize,
    /// False when the input ended before a terminator was seen
    pub terminated: bool,
}

impl FunctionSegment {
    /// Every instruction of the segment, nested blocks flattened, in stream order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.body.iter().flat_map(BodyItem::instructions)
    }

    /// Number of instructions in the segment.
    pub fn instruction_count(&self) -> usize {
        self.instructions().count()
    }
}

/// Segments plus the instructions that fell outside all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Segments in entry order
    pub segments: Vec<FunctionSegment>,
    /// Offsets of instructions seen while no segment was open
    pub outside: Vec<usize>,
}

struct OpenSegment {
    entry_offset: usize,
    entry_index: usize,
    body: Vec<BodyItem>,
    blocks: Vec<TreeNode>,
}

impl OpenSegment {
    fn new(entry_index: usize, ins: &Instruction) -> Self {
        Self {
            entry_offset: ins.offset,
            entry_index,
            body: vec![BodyItem::Instruction(ins.clone())],
            blocks: Vec::new(),
        }
    }

    fn push(&mut self, ins: &Instruction) {
        match self.blocks.last_mut() {
            Some(block) => block.children.push(TreeNode::new(ins.clone())),
            None => self.body.push(BodyItem::Instruction(ins.clone())),
        }
    }

    fn close_block(&mut self) {
        if let Some(block) = self.blocks.pop() {
            match self.blocks.last_mut() {
                Some(parent) => parent.children.push(block),
                None => self.body.push(BodyItem::Block(block)),
            }
        }
    }

    fn finish(
        mut self,
        instructions: &[Instruction],
        end_index: usize,
        terminated: bool,
        scan: SelectorScan,
    ) -> FunctionSegment {
        while !self.blocks.is_empty() {
            self.close_block();
        }

        let window = match scan {
            SelectorScan::Segment => &instructions[self.entry_index..=end_index],
            SelectorScan::Stream => &instructions[self.entry_index..],
        };

        FunctionSegment {
            entry_offset: self.entry_offset,
            selector: find_selector(window),
            body: self.body,
            end_offset: instructions[end_index].offset,
            terminated,
        }
    }
}

fn find_selector(window: &[Instruction]) -> Option<HexArray<4>> {
    window
        .iter()
        .find(|ins| ins.op.is_push() && ins.imm.len() == 4)
        .map(|ins| HexArray::left_padded(&ins.imm))
}

fn ends_segment(op: Opcode) -> bool {
    op.is_terminal() || op == Opcode::JUMP
}

/// Segments `instructions` using an explicit jump-destination set.
pub fn segment_functions(
    instructions: &[Instruction],
    jump_dests: &BTreeSet<usize>,
    scan: SelectorScan,
) -> Segmentation {
    let mut result = Segmentation::default();
    let mut open: Option<OpenSegment> = None;

    for (index, ins) in instructions.iter().enumerate() {
        let is_entry = ins.op == Opcode::JUMPDEST && jump_dests.contains(&ins.offset);

        let Some(segment) = open.as_mut() else {
            if is_entry {
                open = Some(OpenSegment::new(index, ins));
            } else {
                result.outside.push(ins.offset);
            }
            continue;
        };

        if is_entry {
            segment.blocks.push(TreeNode::new(ins.clone()));
            continue;
        }

        segment.push(ins);

        if ins.op == Opcode::JUMPI {
            segment.close_block();
        } else if ends_segment(ins.op) {
            if segment.blocks.is_empty() {
                if let Some(done) = open.take() {
                    result.segments.push(done.finish(instructions, index, true, scan));
                }
            } else {
                segment.close_block();
            }
        }
    }

    if let Some(segment) = open.take() {
        let last = instructions.len() - 1;
        tracing::debug!(
            "segment at {:#06x} reached end of input without a terminator",
            segment.entry_offset
        );
        result.segments.push(segment.finish(instructions, last, false, scan));
    }

    if !result.outside.is_empty() {
        tracing::debug!(
            "{} instructions outside any function segment (first at {:#06x})",
            result.outside.len(),
            result.outside[0]
        );
    }

    tracing::debug!("found {} function segments", result.segments.len());
    result
}

/// Segments `instructions` using their own `JUMPDEST`s, scanning forward through the rest of the
/// stream for each selector.
pub fn segments(instructions: &[Instruction]) -> Vec<FunctionSegment> {
    let jump_dests = jump_destinations(instructions);
    segment_functions(instructions, &jump_dests, SelectorScan::Stream).segments
}
