use crate::DISPATCHER_RUNTIME;
use bytescope_core::config::DisassemblyOptions;
use bytescope_core::decoder::decode;
use bytescope_core::disasm::{InstructionRecord, disassemble, parse_disassembly, to_records};
use bytescope_core::{Opcode, mnemonic};

#[test]
fn test_disassembly_round_trip() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let text = disassemble(&ins, &DisassemblyOptions::default());
    assert_eq!(text.lines().count(), ins.len());

    let parsed = parse_disassembly(&text).unwrap();
    for (line, original) in parsed.iter().zip(&ins) {
        assert_eq!(line.offset, original.offset);
        assert_eq!(line.opcode(), Some(original.op));
        assert_eq!(line.imm, original.imm);
    }
}

#[test]
fn test_disassembly_line_format() {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let text = disassemble(&ins, &DisassemblyOptions::default());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[4], "0007 CALLDATALOAD // Get input data of current environment");
    assert!(lines[8].starts_with("000c PUSH4 0xa9059cbb // "));

    let wide = disassemble(
        &ins[..1],
        &DisassemblyOptions {
            descriptions: false,
            offset_width: 6,
        },
    );
    assert_eq!(wide, "000000 PUSH1 0x80\n");
}

#[test]
fn test_records_serialize_as_json_list() {
    let ins = decode(&[0x5f, 0x61, 0x01, 0x02, 0xfe]).unwrap();
    let json = serde_json::to_string(&to_records(&ins)).unwrap();
    let back: Vec<InstructionRecord> = serde_json::from_str(&json).unwrap();

    assert_eq!(back.len(), 3);
    assert_eq!(back[0].mnemonic, "PUSH0");
    assert_eq!(back[0].decoded.map(|w| w.0), Some([0u8; 32]));
    assert_eq!(back[1].immediate, vec![0x01, 0x02]);
    assert_eq!(back[2].mnemonic, mnemonic(0xfe));
    assert_eq!(back[2].to_instruction().op, Opcode::INVALID);
    assert!(back[2].decoded.is_none());
}

#[test]
fn test_aliases_resolve_to_canonical_names() {
    assert_eq!(mnemonic(0x20), "KECCAK256");
    assert_eq!(mnemonic(0x44), "PREVRANDAO");
    assert_eq!(mnemonic(0xff), "SELFDESTRUCT");
    assert_eq!("SHA3".parse::<Opcode>().unwrap(), Opcode::KECCAK256);
    assert_eq!("difficulty".parse::<Opcode>().unwrap(), Opcode::PREVRANDAO);
    assert_eq!("SUICIDE".parse::<Opcode>().unwrap(), Opcode::SELFDESTRUCT);
    assert_eq!(mnemonic(0x0c), "UNDEFINED");
}
