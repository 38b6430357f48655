use crate::{DISPATCHER_RUNTIME, TRANSFER_TOPIC};
use bytescope_analysis::events::{decode_log, reconstruct_events};
use bytescope_core::HexArray;
use bytescope_core::decoder::decode;

fn word(fill: u8) -> [u8; 32] {
    [fill; 32]
}

#[test]
fn test_log2_topics_and_data() {
    // PUSH32 A, PUSH32 B, PUSH32 C, LOG2
    let mut code = Vec::new();
    for fill in [0xaa, 0xbb, 0xcc] {
        code.push(0x7f);
        code.extend(word(fill));
    }
    code.push(0xa2);
    let ins = decode(&code).unwrap();

    let (data, topics) = decode_log(&ins, 99, 2).unwrap();
    assert_eq!(topics, vec![HexArray(word(0xcc)), HexArray(word(0xbb))]);
    assert_eq!(data, word(0xaa).to_vec());
}

#[test]
fn test_transfer_event_in_dispatcher_runtime() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let events = reconstruct_events(&ins);
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event.log_offset, 0x67);
    assert_eq!(event.topic_count, 1);
    assert_eq!(event.topics.len(), event.topic_count + 1);
    assert_eq!(format!("{:?}", event.signature().unwrap()), TRANSFER_TOPIC);
    assert_eq!(event.topics[1], HexArray::left_padded(&[0x01]));
    assert_eq!(
        event.data.as_ref().map(|d| HexArray::<32>::left_padded(d)),
        Some(HexArray::left_padded(&[0x64]))
    );
}

#[test]
fn test_unknown_offsets_and_wide_logs_are_rejected() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    assert!(decode_log(&ins, 0x67, 2).is_some());
    assert!(decode_log(&ins, 0x67, 5).is_none());
    assert!(decode_log(&ins, 0x68, 2).is_none());
    assert!(decode_log(&ins, 0x1000, 2).is_none());
}

#[test]
fn test_events_serialize_with_hex_fields() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let json = serde_json::to_value(reconstruct_events(&ins)).unwrap();
    assert_eq!(json[0]["topics"][0], TRANSFER_TOPIC);
    assert_eq!(json[0]["topic_count"], 1);
}
