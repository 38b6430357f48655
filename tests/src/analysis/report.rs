use crate::{DISPATCHER_RUNTIME, init_tracing};
use bytescope_analysis::dispatcher::ExtractionPattern;
use bytescope_analysis::{analyze, analyze_bytes, analyze_concurrently};
use bytescope_core::config::{AnalysisConfig, SelectorScan};
use bytescope_core::decoder::{SourceType, decode_bytecode};

#[tokio::test]
async fn test_full_report_over_dispatcher_runtime() {
    init_tracing();
    let bytes = hex::decode(DISPATCHER_RUNTIME).unwrap();
    let report = analyze_bytes(&bytes, AnalysisConfig::standard()).await.unwrap();

    assert_eq!(report.info.byte_length, bytes.len());
    assert_eq!(report.info.source, SourceType::Bytes);
    assert_eq!(report.metrics.instruction_count, 33);
    assert_eq!(report.jump_dests.len(), 2);

    let dispatcher = report.dispatcher.as_ref().unwrap();
    assert_eq!(dispatcher.extraction_pattern, ExtractionPattern::Standard);
    assert_eq!(dispatcher.selectors.len(), 2);

    let entries: Vec<(String, usize)> = report
        .entry_points
        .iter()
        .map(|e| (e.selector.to_string(), e.segment_index))
        .collect();
    assert_eq!(
        entries,
        vec![("0xa9059cbb".to_string(), 0), ("0x70a08231".to_string(), 1)]
    );

    assert_eq!(report.events.as_ref().unwrap().len(), 1);
    assert!(report.tree.as_ref().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_concurrent_and_sequential_agree() {
    let (decoded, _) = decode_bytecode(DISPATCHER_RUNTIME, false).unwrap();
    let mut config = AnalysisConfig::standard();
    config.selector_scan = SelectorScan::Segment;

    let sequential = analyze(&decoded, &config);
    let concurrent = analyze_concurrently(decoded, config).await.unwrap();
    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_report_round_trips_through_json() {
    let (decoded, _) = decode_bytecode(DISPATCHER_RUNTIME, false).unwrap();
    let report = analyze_concurrently(decoded, AnalysisConfig::default()).await.unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: bytescope_analysis::Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[tokio::test]
async fn test_long_straight_line_report_round_trips() {
    let mut bytes = vec![0x01u8; 400]; // ADD
    bytes.push(0x00);
    let report = analyze_bytes(&bytes, AnalysisConfig::default()).await.unwrap();
    assert!(report.metrics.max_tree_depth > 128);

    let json = serde_json::to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tree"][0]["nodes"].as_array().unwrap().len(), 401);

    let back: bytescope_analysis::Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[tokio::test]
async fn test_views_can_be_switched_off() {
    let mut config = AnalysisConfig::standard();
    config.views.functions = false;
    let bytes = hex::decode(DISPATCHER_RUNTIME).unwrap();
    let report = analyze_bytes(&bytes, config).await.unwrap();

    assert!(report.functions.is_none());
    assert!(report.dispatcher.is_some());
    // no segments, nothing to link
    assert!(report.entry_points.is_empty());
}
