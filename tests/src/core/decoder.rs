use crate::{DISPATCHER_RUNTIME, init_tracing};
use bytescope_core::Opcode;
use bytescope_core::decoder::{
    decode, decode_bytecode, decode_bytecode_from_bytes, jump_destinations, SourceType,
};
use bytescope_utils::errors::DecodeError;
use std::io::Write;

// Fixture: PUSH1 0x01, PUSH1 0x02, ADD, PUSH1 0x00, JUMPI
const BYTECODE: &str = "0x6001600201600057";

#[test]
fn test_hex_roundtrip() {
    init_tracing();
    let (decoded, bytes) = decode_bytecode(BYTECODE, false).unwrap();
    for instr in &decoded.instructions {
        tracing::debug!("{}", instr);
    }
    assert_eq!(decoded.instructions.len(), 5);

    let expected_bytes = BYTECODE.trim_start_matches("0x").len() / 2;
    assert_eq!(decoded.info.byte_length, expected_bytes);
    assert_eq!(bytes.len(), expected_bytes);
    assert_eq!(decoded.info.source, SourceType::HexString);
}

#[test]
fn test_decode_from_bytes() {
    let bytes = hex::decode(BYTECODE.trim_start_matches("0x")).unwrap();
    let decoded = decode_bytecode_from_bytes(&bytes, SourceType::HexString).unwrap();
    assert_eq!(decoded.instructions.len(), 5);
    assert_eq!(decoded.info.byte_length, bytes.len());

    // Same bytes, different source: only the source differs
    let again = decode_bytecode_from_bytes(&bytes, SourceType::File).unwrap();
    assert_eq!(again.instructions, decoded.instructions);
    assert_eq!(again.info.keccak_hash, decoded.info.keccak_hash);
    assert_eq!(again.info.source, SourceType::File);
}

#[test]
fn test_file_input() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&hex::decode(BYTECODE.trim_start_matches("0x")).unwrap())
        .unwrap();
    let path = tmp.path().to_str().unwrap();

    let (from_file, _) = decode_bytecode(path, true).unwrap();
    let (from_hex, _) = decode_bytecode(BYTECODE, false).unwrap();

    assert_eq!(from_file.instructions, from_hex.instructions);
    assert_eq!(from_file.info.byte_length, from_hex.info.byte_length);
    assert_eq!(from_file.info.source, SourceType::File);
}

#[test]
fn test_hex_text_file_input() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    writeln!(tmp, "0x6001 6002\n01").unwrap();
    let (decoded, bytes) = decode_bytecode(tmp.path().to_str().unwrap(), true).unwrap();
    assert_eq!(bytes, vec![0x60, 0x01, 0x60, 0x02, 0x01]);
    assert_eq!(decoded.instructions[2].op, Opcode::ADD);
}

#[test]
fn test_missing_file_fails() {
    let result = decode_bytecode("/nonexistent/runtime.bin", true);
    assert!(matches!(result, Err(DecodeError::FileRead { .. })));
}

#[test]
fn test_bad_hex_fails() {
    let result = decode_bytecode("0xZZ42", false);
    assert!(matches!(result, Err(DecodeError::HexDecode(_))));
}

#[test]
fn test_empty_input_is_the_only_scan_failure() {
    assert!(matches!(decode(&[]), Err(DecodeError::EmptyBytecode)));
    assert!(matches!(
        decode_bytecode("0x", false),
        Err(DecodeError::EmptyBytecode)
    ));

    // every single byte decodes, defined or not
    for byte in 0..=u8::MAX {
        assert!(decode(&[byte]).is_ok(), "byte 0x{byte:02x}");
    }
}

#[test]
fn test_decode_is_deterministic() {
    let bytes = hex::decode(DISPATCHER_RUNTIME).unwrap();
    assert_eq!(decode(&bytes).unwrap(), decode(&bytes).unwrap());
}

#[test]
fn test_offsets_and_push_lengths() {
    let bytes = hex::decode(DISPATCHER_RUNTIME).unwrap();
    let ins = decode(&bytes).unwrap();

    assert!(ins.windows(2).all(|w| w[0].offset < w[1].offset));
    assert_eq!(ins.iter().map(|i| i.byte_size()).sum::<usize>(), bytes.len());
    for i in &ins {
        if let Opcode::PUSH(n) = i.op {
            assert_eq!(i.imm.len(), n as usize, "{i}");
        } else {
            assert!(i.imm.is_empty(), "{i}");
        }
    }
}

#[test]
fn test_jumpdest_inside_push_data_is_ignored() {
    // PUSH2 5b5b JUMPDEST PUSH1 5b
    let ins = decode(&[0x61, 0x5b, 0x5b, 0x5b, 0x60, 0x5b]).unwrap();
    let dests = jump_destinations(&ins);
    assert_eq!(dests.into_iter().collect::<Vec<_>>(), vec![3]);

    let decoded = decode_bytecode_from_bytes(&[0x61, 0x5b, 0x5b, 0x5b, 0x60, 0x5b], SourceType::Bytes)
        .unwrap();
    assert_eq!(decoded.jump_dests.len(), 1);
}

#[test]
fn test_truncated_push_keeps_remaining_bytes() {
    let ins = decode(&[0x00, 0x7f, 0xaa, 0xbb]).unwrap();
    assert_eq!(ins.len(), 2);
    assert_eq!(ins[1].op, Opcode::PUSH(32));
    assert_eq!(ins[1].imm, vec![0xaa, 0xbb]);
    assert!(ins[1].is_truncated());

    let word = ins[1].decoded_data().unwrap();
    assert_eq!(word.0[30..], [0xaa, 0xbb]);
}

#[test]
fn test_keccak_of_input() {
    let decoded = decode_bytecode_from_bytes(&[0x00], SourceType::Bytes).unwrap();
    assert_eq!(
        format!("{:?}", decoded.info.keccak_hash),
        "bc36789e7a1e281436464229828f817d6612f7b477d66591ff96a9e064bcc98a"
    );
}
