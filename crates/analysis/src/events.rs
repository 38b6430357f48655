//! Best-effort recovery of LOG topics and payloads.
//!
//! Topics and data are recovered by replaying the instructions that precede a `LOGn` on a toy
//! stack that only understands constants: PUSH places its immediate, `DUP1..DUP4`, `SWAP1..SWAP4`
//! and `POP` rearrange, everything else is ignored. Control flow is not followed and computed
//! values are invisible, so this only resolves events whose topics are compile-time constants
//! sitting in straight-line code before the LOG.

use bytescope_core::decoder::Instruction;
use bytescope_core::{HexArray, HexBytes, Opcode};
use serde::{Deserialize, Serialize};

/// Highest topic count a LOG instruction can carry.
pub const MAX_TOPICS: usize = 4;

/// A LOG site and whatever could be recovered about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Offset of the `LOGn` instruction
    pub log_offset: usize,
    /// Number of indexed arguments (`n - 1` for `LOGn`, 0 for `LOG0`)
    pub topic_count: usize,
    /// Recovered topics, the signature hash first. Empty when unresolved.
    pub topics: Vec<HexArray<32>>,
    /// Recovered payload, if the replay got that far
    pub data: Option<HexBytes>,
}

impl EventRecord {
    /// The event signature hash (`topics[0]`). Anonymous `LOG0` events have none.
    pub fn signature(&self) -> Option<HexArray<32>> {
        self.topics.first().copied()
    }

    /// Whether topics and payload were recovered.
    pub fn is_resolved(&self) -> bool {
        self.data.is_some()
    }
}

/// Constant-only stack used for the replay. Entries borrow the PUSH immediates.
#[derive(Debug, Default)]
struct StackMachine<'a> {
    stack: Vec<&'a [u8]>,
}

impl<'a> StackMachine<'a> {
    fn step(&mut self, ins: &'a Instruction) {
        let depth = self.stack.len();
        match ins.op {
            Opcode::PUSH0 => self.stack.push(&[]),
            op if op.is_push() => self.stack.push(&ins.imm),
            Opcode::DUP(n @ 1..=4) => {
                let n = n as usize;
                if depth >= n {
                    self.stack.push(self.stack[depth - n]);
                }
            }
            Opcode::SWAP(n @ 1..=4) => {
                let n = n as usize;
                if depth > n {
                    self.stack.swap(depth - 1, depth - 1 - n);
                }
            }
            Opcode::POP => {
                self.stack.pop();
            }
            _ => {}
        }
    }

    /// Reads `topic_count` topics off the top, then the payload beneath them.
    fn read_log(&self, topic_count: usize) -> Option<(HexBytes, Vec<HexArray<32>>)> {
        let depth = self.stack.len();
        if depth < topic_count + 1 {
            return None;
        }
        let topics = self.stack[depth - topic_count..]
            .iter()
            .rev()
            .map(|word| HexArray::left_padded(word))
            .collect();
        let data = HexBytes::from(self.stack[depth - topic_count - 1]);
        Some((data, topics))
    }
}

/// Recovers the payload and topics of the LOG at `log_offset`.
///
/// `topic_count` is the number of topics the LOG pops (the `n` of `LOGn`). Returns `None` when
/// `topic_count` exceeds four, when no LOG sits at `log_offset`, or when the replayed stack is too
/// shallow. Topics come back in stack order, nearest the top first.
pub fn decode_log(
    instructions: &[Instruction],
    log_offset: usize,
    topic_count: usize,
) -> Option<(HexBytes, Vec<HexArray<32>>)> {
    if topic_count > MAX_TOPICS {
        return None;
    }
    let index = instructions.iter().position(|ins| ins.offset == log_offset)?;
    if !instructions[index].op.is_log() {
        return None;
    }

    let mut machine = StackMachine::default();
    for ins in &instructions[..index] {
        machine.step(ins);
    }
    machine.read_log(topic_count)
}

/// Builds an [`EventRecord`] for every `LOG0..LOG4` in the stream.
pub fn reconstruct_events(instructions: &[Instruction]) -> Vec<EventRecord> {
    let mut machine = StackMachine::default();
    let mut events = Vec::new();

    for ins in instructions {
        if let Opcode::LOG(n) = ins.op {
            let n = n as usize;
            let resolved = machine.read_log(n);
            if resolved.is_none() {
                tracing::debug!("LOG{n} at {:#06x}: not enough constants on the stack", ins.offset);
            }
            let (data, topics) = match resolved {
                Some((data, topics)) => (Some(data), topics),
                None => (None, Vec::new()),
            };
            events.push(EventRecord {
                log_offset: ins.offset,
                topic_count: n.saturating_sub(1),
                topics,
                data,
            });
        }
        machine.step(ins);
    }

    tracing::debug!(
        "reconstructed {} events ({} resolved)",
        events.len(),
        events.iter().filter(|e| e.is_resolved()).count()
    );
    events
}
