use crate::DISPATCHER_RUNTIME;
use bytescope_analysis::functions::{BodyItem, segment_functions, segments};
use bytescope_core::config::SelectorScan;
use bytescope_core::decoder::{decode, jump_destinations};
use bytescope_core::{HexArray, Opcode};

#[test]
fn test_dispatcher_runtime_splits_into_two_bodies() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let result = segment_functions(&ins, &jump_destinations(&ins), SelectorScan::Segment);

    assert_eq!(result.segments.len(), 2);
    let entries: Vec<usize> = result.segments.iter().map(|s| s.entry_offset).collect();
    assert_eq!(entries, vec![0x22, 0x69]);
    assert!(result.segments.iter().all(|s| s.terminated));
    assert_eq!(result.segments[0].end_offset, 0x68);
    assert_eq!(result.segments[1].end_offset, 0x71);

    // the whole dispatcher precedes the first JUMPDEST
    assert_eq!(result.outside.len(), 20);
    assert_eq!(result.outside.last(), Some(&0x21));
}

#[test]
fn test_entry_offsets_are_jump_destinations() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let dests = jump_destinations(&ins);
    for seg in segments(&ins) {
        assert!(dests.contains(&seg.entry_offset));
        assert!(matches!(seg.body.first(), Some(BodyItem::Instruction(i)) if i.op == Opcode::JUMPDEST));
    }
}

#[test]
fn test_explicit_jump_destination_set_controls_entries() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let only_second = [0x69].into_iter().collect();
    let result = segment_functions(&ins, &only_second, SelectorScan::Segment);
    assert_eq!(result.segments.len(), 1);
    assert_eq!(result.segments[0].entry_offset, 0x69);
}

#[test]
fn test_selector_from_segment_body() {
    // JUMPDEST PUSH4 12345678 PUSH1 00 SSTORE STOP
    let ins = decode(&hex::decode("5b631234567860005500").unwrap()).unwrap();
    let segs = segments(&ins);
    assert_eq!(segs[0].selector, Some(HexArray([0x12, 0x34, 0x56, 0x78])));
}

#[test]
fn test_selector_found_after_segment_end() {
    // JUMPDEST STOP, then PUSH4 aabbccdd outside any segment
    let ins = decode(&hex::decode("5b0063aabbccdd").unwrap()).unwrap();
    let segs = segments(&ins);
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].end_offset, 1);
    assert_eq!(segs[0].selector, Some(HexArray([0xaa, 0xbb, 0xcc, 0xdd])));
}

#[test]
fn test_unmatched_boundaries_do_not_panic() {
    for code in ["00", "5b", "56", "5b5b5b", "5b57", "f35b"] {
        let ins = decode(&hex::decode(code).unwrap()).unwrap();
        let result = segment_functions(&ins, &jump_destinations(&ins), SelectorScan::Stream);
        let covered: usize = result.segments.iter().map(|s| s.instruction_count()).sum();
        assert_eq!(covered + result.outside.len(), ins.len(), "{code}");
    }
}
