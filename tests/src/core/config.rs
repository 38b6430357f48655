use bytescope_core::config::{AnalysisConfig, SelectorScan};
use bytescope_utils::errors::ConfigError;
use std::io::Write;

#[test]
fn test_config_file_overrides_defaults() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    write!(
        tmp,
        r#"{{ "selector_scan": "segment", "views": {{ "tree": false }}, "disassembly": {{ "descriptions": false }} }}"#
    )
    .unwrap();

    let cfg = AnalysisConfig::from_file(tmp.path()).unwrap();
    assert_eq!(cfg.selector_scan, SelectorScan::Segment);
    assert!(!cfg.views.tree);
    assert!(cfg.views.functions);
    assert!(!cfg.disassembly.descriptions);
    assert_eq!(cfg.disassembly.offset_width, 4);
    assert!(cfg.concurrent);
}

#[test]
fn test_config_rejects_unknown_scan_scope() {
    let err = AnalysisConfig::from_json(r#"{ "selector_scan": "everywhere" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_serializes_back() {
    let cfg = AnalysisConfig::structure_only();
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(AnalysisConfig::from_json(&json).unwrap(), cfg);
}
