//! Summary figures over a decoded instruction stream.
//!
//! Counts instructions by category, undefined bytes and truncated pushes, and the height of the
//! instruction tree when one was built. These are cheap descriptive numbers for reports; nothing
//! here feeds back into the other views.
//!
//! # Usage
//! ```rust
//! use bytescope_analysis::{metrics::collect_metrics, tree::build_forest};
//! use bytescope_core::decoder::decode;
//!
//! let ins = decode(&[0x60, 0x01, 0x60, 0x02, 0x01, 0x00]).unwrap();
//! let forest = build_forest(&ins);
//! let metrics = collect_metrics(&ins, Some(forest.as_slice()));
//! assert_eq!(metrics.categories.arithmetic, 1);
//! assert_eq!(metrics.categories.stack, 2);
//! ```

use crate::tree::TreeNode;
use bytescope_core::Opcode;
use bytescope_core::decoder::Instruction;
use serde::{Deserialize, Serialize};

/// Descriptive metrics for one instruction stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Bytes covered by the stream (opcodes plus immediates).
    pub byte_len: usize,
    /// Number of decoded instructions.
    pub instruction_count: usize,
    /// Number of `JUMPDEST` instructions.
    pub jump_dest_count: usize,
    /// Number of bytes with no assigned opcode.
    pub undefined_count: usize,
    /// Whether the final PUSH ran past the end of the input.
    pub truncated_push: bool,
    /// Instructions per opcode category.
    pub categories: CategoryCounts,
    /// Height of the tallest top-level tree segment, 0 when no tree was built.
    pub max_tree_depth: usize,
    /// Number of top-level tree segments, 0 when no tree was built.
    pub tree_segments: usize,
}

/// Instruction counts per opcode category. An opcode may count in more than one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// `ADD` through `SIGNEXTEND` (`0x01..=0x0b`)
    pub arithmetic: usize,
    /// `LT` through `ISZERO`
    pub comparison: usize,
    /// `AND` through `SAR`
    pub bitwise: usize,
    /// Block and transaction environment reads
    pub block_info: usize,
    /// `POP`, pushes, dups and swaps
    pub stack: usize,
    /// `MLOAD`, `MSTORE`, `MSTORE8`, `MSIZE`, `MCOPY`
    pub memory: usize,
    /// Persistent and transient storage access
    pub storage: usize,
    /// Jumps, `JUMPDEST` and halting opcodes
    pub flow_control: usize,
    /// The `0xf0` range: creates, calls and halts
    pub system: usize,
    /// `LOG0..LOG4`
    pub log: usize,
}

impl CategoryCounts {
    fn record(&mut self, ins: &Instruction) {
        let op = ins.op;
        let bump = |flag: bool, slot: &mut usize| *slot += usize::from(flag);
        bump(op.is_arithmetic(), &mut self.arithmetic);
        bump(op.is_comparison(), &mut self.comparison);
        bump(op.is_bitwise(), &mut self.bitwise);
        bump(op.is_block_info(), &mut self.block_info);
        bump(op.is_stack(), &mut self.stack);
        bump(op.is_memory(), &mut self.memory);
        bump(op.is_storage(), &mut self.storage);
        bump(op.is_flow_control(), &mut self.flow_control);
        bump(op.is_system(), &mut self.system);
        bump(op.is_log(), &mut self.log);
    }
}

/// Collects metrics from an instruction stream and, optionally, its tree.
pub fn collect_metrics(instructions: &[Instruction], tree: Option<&[TreeNode]>) -> Metrics {
    let mut metrics = Metrics {
        instruction_count: instructions.len(),
        ..Metrics::default()
    };

    for ins in instructions {
        metrics.byte_len += ins.byte_size();
        metrics.categories.record(ins);
        if !ins.op.is_defined() {
            metrics.undefined_count += 1;
        }
        if ins.op == Opcode::JUMPDEST {
            metrics.jump_dest_count += 1;
        }
    }
    metrics.truncated_push = instructions.last().is_some_and(Instruction::is_truncated);

    if let Some(roots) = tree {
        metrics.tree_segments = roots.len();
        metrics.max_tree_depth = roots.iter().map(TreeNode::depth).max().unwrap_or(0);
    }

    tracing::debug!(
        "metrics: {} instructions, {} undefined, tree depth {}",
        metrics.instruction_count,
        metrics.undefined_count,
        metrics.max_tree_depth
    );
    metrics
}
