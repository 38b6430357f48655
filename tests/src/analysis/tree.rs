use crate::DISPATCHER_RUNTIME;
use bytescope_analysis::tree::{TreeNode, build_forest, build_tree, to_dot};
use bytescope_core::Opcode;
use bytescope_core::decoder::decode;

fn forest() -> (Vec<bytescope_core::Instruction>, Vec<TreeNode>) {
    let ins = decode(&hex::decode(DISPATCHER_RUNTIME).unwrap()).unwrap();
    let forest = build_forest(&ins);
    (ins, forest)
}

#[test]
fn test_every_instruction_lands_in_the_forest_once() {
    let (ins, forest) = forest();
    let seen: Vec<usize> = forest
        .iter()
        .flat_map(|root| root.iter().map(|i| i.offset))
        .collect();
    assert_eq!(seen, ins.iter().map(|i| i.offset).collect::<Vec<_>>());
}

#[test]
fn test_jump_class_instructions_are_leaves() {
    let (_, forest) = forest();
    let mut stack: Vec<&TreeNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        if node.instruction.op.is_jump_class() {
            assert!(node.children.is_empty(), "{}", node.instruction);
        }
        stack.extend(node.children.iter());
    }
}

#[test]
fn test_build_tree_returns_first_segment() {
    let (ins, forest) = forest();
    let first = build_tree(&ins).unwrap();
    assert_eq!(first, forest[0]);
    assert_eq!(first.instruction.offset, 0);
    assert_eq!(first.instruction.op, Opcode::PUSH(1));
}

#[test]
fn test_tree_serializes_and_renders() {
    let (ins, forest) = forest();
    let json = serde_json::to_string(&forest).unwrap();
    let back: Vec<TreeNode> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, forest);

    let dot = to_dot(&forest);
    assert!(dot.starts_with("digraph"));
    assert_eq!(dot.matches("[label=").count(), ins.len());
    assert_eq!(dot.matches(" -> ").count(), ins.len() - forest.len());
}

#[test]
fn test_very_long_straight_line_code() {
    // 100k STOP-free arithmetic instructions must not blow the stack on build or drop
    let ins = decode(&vec![0x01u8; 100_000]).unwrap();
    let forest = build_forest(&ins);
    assert_eq!(forest.iter().map(TreeNode::len).sum::<usize>(), ins.len());
    drop(forest);
}
