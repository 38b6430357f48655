use crate::DISPATCHER_RUNTIME;
use bytescope_analysis::search::{Query, selector_of};
use bytescope_core::decoder::{Instruction, decode};
use bytescope_core::Opcode;

fn runtime() -> Vec<Instruction> {
    decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap()
}

#[test]
fn test_opcode_queries() {
    let ins = runtime();
    let q = Query::new(&ins);
    assert!(q.opcode_found(Opcode::LOG(2)));
    assert!(!q.opcode_found(Opcode::LOG(1)));
    assert_eq!(q.instructions_with_opcode(Opcode::JUMPDEST).len(), 2);
    assert_eq!(q.instructions_with_opcode(Opcode::JUMPI).len(), 2);
}

#[test]
fn test_selector_references() {
    let ins = runtime();
    let q = Query::new(&ins);

    let transfer = q.selector_references(selector_of("transfer(address,uint256)").into_inner());
    assert_eq!(transfer.len(), 1);
    assert_eq!(transfer[0].offset, 0x0c);

    let balance_of = q.selector_references(selector_of("balanceOf(address)").into_inner());
    assert_eq!(balance_of.len(), 1);
    assert_eq!(balance_of[0].offset, 0x16);

    assert!(q.selector_references(selector_of("approve(address,uint256)").into_inner()).is_empty());
}

#[test]
fn test_call_selector_matching() {
    let ins = runtime();
    // the runtime has no CALL at all
    assert!(!Query::new(&ins).match_function_signature("a9059cbb"));

    let with_call = vec![Instruction::new(0, Opcode::CALL, vec![0xaau8, 0xbb, 0xcc, 0xdd])];
    let q = Query::new(&with_call);
    assert!(q.match_function_signature("aabbccdd"));
    assert!(q.match_function_signature("0xaabbccdd"));
    assert!(!q.match_function_signature("aabbccde"));
    assert!(!q.match_function_signature("0xgg"));
}

#[test]
fn test_instruction_matching() {
    let ins = runtime();
    let q = Query::new(&ins);
    for i in &ins {
        assert!(q.match_instruction(i));
    }
    let shifted = Instruction::new(ins[0].offset + 1, ins[0].op, ins[0].imm.clone());
    assert!(!q.match_instruction(&shifted));
}
