//! Joins every derived view of one decoded buffer into a single [`Report`].
//!
//! The views only read the instruction stream, so [`analyze_concurrently`] hands each one a
//! shared `Arc<[Instruction]>` on the blocking pool and joins the results. [`analyze`] computes
//! the same report inline.

use crate::dispatcher::{DispatcherInfo, detect_function_dispatcher};
use crate::events::{EventRecord, reconstruct_events};
use crate::functions::{Segmentation, segment_functions};
use crate::metrics::{Metrics, collect_metrics};
use crate::tree::{TreeNode, build_forest};
use bytescope_core::config::{AnalysisConfig, SelectorScan};
use bytescope_core::decoder::{DecodeInfo, DecodedBytecode, Instruction, SourceType};
use bytescope_core::{HexArray, decoder};
use bytescope_utils::errors::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything derived from one buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Length, hash and origin of the input
    pub info: DecodeInfo,
    /// Offsets of every real `JUMPDEST`
    pub jump_dests: BTreeSet<usize>,
    /// Descriptive counts
    pub metrics: Metrics,
    /// Top-level instruction tree segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<Vec<TreeNode>>,
    /// Function segments and outside offsets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Segmentation>,
    /// One record per `LOG` instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventRecord>>,
    /// Selector dispatcher, when one was recognised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatcher: Option<DispatcherInfo>,
    /// Dispatcher selectors whose jump target opens a function segment
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

/// A dispatcher selector linked to the segment it jumps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Selector compared by the dispatcher
    pub selector: HexArray<4>,
    /// Byte offset of the segment's `JUMPDEST`
    pub target: usize,
    /// Index into the report's segment list
    pub segment_index: usize,
}

/// Pairs dispatcher targets with the segments that start at them.
pub fn link_entry_points(
    dispatcher: Option<&DispatcherInfo>,
    functions: Option<&Segmentation>,
) -> Vec<EntryPoint> {
    let (Some(dispatcher), Some(functions)) = (dispatcher, functions) else {
        return Vec::new();
    };

    dispatcher
        .selectors
        .iter()
        .filter_map(|sel| {
            let target = sel.target?;
            let segment_index = functions
                .segments
                .iter()
                .position(|seg| seg.entry_offset == target)?;
            Some(EntryPoint {
                selector: sel.selector,
                target,
                segment_index,
            })
        })
        .collect()
}

fn assemble(
    decoded_info: DecodeInfo,
    jump_dests: BTreeSet<usize>,
    instructions: &[Instruction],
    tree: Option<Vec<TreeNode>>,
    functions: Option<Segmentation>,
    events: Option<Vec<EventRecord>>,
    dispatcher: Option<DispatcherInfo>,
) -> Report {
    let metrics = collect_metrics(instructions, tree.as_deref());
    let entry_points = link_entry_points(dispatcher.as_ref(), functions.as_ref());
    tracing::debug!(
        "report ready: {} instructions, {} entry points",
        instructions.len(),
        entry_points.len()
    );
    Report {
        info: decoded_info,
        jump_dests,
        metrics,
        tree,
        functions,
        events,
        dispatcher,
        entry_points,
    }
}

/// Computes every view enabled in `config`, one after the other.
pub fn analyze(decoded: &DecodedBytecode, config: &AnalysisConfig) -> Report {
    let ins = decoded.instructions.as_slice();
    let views = config.views;

    let tree = views.tree.then(|| build_forest(ins));
    let functions = views
        .functions
        .then(|| segment_functions(ins, &decoded.jump_dests, config.selector_scan));
    let events = views.events.then(|| reconstruct_events(ins));
    let dispatcher = if views.dispatcher {
        detect_function_dispatcher(ins)
    } else {
        None
    };

    assemble(
        decoded.info.clone(),
        decoded.jump_dests.clone(),
        ins,
        tree,
        functions,
        events,
        dispatcher,
    )
}

/// Runs `view` on the blocking pool when `enabled`.
async fn run_view<T, F>(
    enabled: bool,
    instructions: &Arc<[Instruction]>,
    view: F,
) -> Result<Option<T>, AnalysisError>
where
    T: Send + 'static,
    F: FnOnce(&[Instruction]) -> T + Send + 'static,
{
    if !enabled {
        return Ok(None);
    }
    let instructions = Arc::clone(instructions);
    tokio::task::spawn_blocking(move || view(&instructions))
        .await
        .map(Some)
        .map_err(|e| AnalysisError::TaskFailed(e.to_string()))
}

/// Computes every view enabled in `config` as independent blocking tasks.
///
/// Produces the same report as [`analyze`]. Falls back to the inline path when
/// `config.concurrent` is off.
pub async fn analyze_concurrently(
    decoded: DecodedBytecode,
    config: AnalysisConfig,
) -> Result<Report, AnalysisError> {
    if !config.concurrent {
        return Ok(analyze(&decoded, &config));
    }

    let DecodedBytecode {
        instructions,
        jump_dests,
        info,
    } = decoded;
    let shared: Arc<[Instruction]> = Arc::from(instructions);
    let views = config.views;
    let scan: SelectorScan = config.selector_scan;
    let dests = jump_dests.clone();

    let (tree, functions, events, dispatcher) = tokio::try_join!(
        run_view(views.tree, &shared, build_forest),
        run_view(views.functions, &shared, move |ins| segment_functions(ins, &dests, scan)),
        run_view(views.events, &shared, reconstruct_events),
        run_view(views.dispatcher, &shared, detect_function_dispatcher),
    )?;

    Ok(assemble(
        info,
        jump_dests,
        &shared,
        tree,
        functions,
        events,
        dispatcher.flatten(),
    ))
}

/// Decodes `bytes` and analyzes them concurrently.
pub async fn analyze_bytes(bytes: &[u8], config: AnalysisConfig) -> Result<Report, AnalysisError> {
    let decoded = decoder::decode_bytecode_from_bytes(bytes, SourceType::Bytes)?;
    analyze_concurrently(decoded, config).await
}
