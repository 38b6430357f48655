//! Nesting of an instruction stream into an approximate "execution shape" tree.
//!
//! The builder keeps a stack of open nodes. Each instruction becomes a child of the node on top
//! of the stack and is then pushed itself, so straight-line code forms a chain. A jump-class
//! instruction (`JUMP`, `JUMPI`, `JUMPDEST`) is attached as a leaf of the top node and closes
//! that node. This is a grouping heuristic, not a control-flow graph: jump targets are never
//! resolved and unreachable code is nested like anything else.
//!
//! Chains are capped at [`MAX_DEPTH`] open nodes; past that, instructions are attached as leaves
//! of the deepest open node until a jump-class instruction closes it.
//!
//! A node serializes flat, as `{"nodes": [{"depth": 0, "instruction": ..}, ..]}` in pre-order, so
//! arbitrarily deep chains stay readable by parsers with a recursion limit.

use bytescope_core::decoder::Instruction;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Maximum number of simultaneously open nodes.
pub const MAX_DEPTH: usize = 256;

/// A node of the instruction tree. Children are owned; there are no parent links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// The instruction at this node
    pub instruction: Instruction,
    /// Nested instructions, in stream order
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// A leaf node.
    pub const fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            children: Vec::new(),
        }
    }

    /// Iterates the subtree in pre-order, which is the original stream order.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Number of nodes in the subtree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a node contains at least itself.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Height of the subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            stack.extend(node.children.iter().map(|c| (c, d + 1)));
        }
        max
    }
}

impl Drop for TreeNode {
    // Tear down iteratively so long chains do not recurse through nested drops.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order iterator over a [`TreeNode`].
#[derive(Debug)]
pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Instruction;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(&node.instruction)
    }
}

/// Pre-order iterator yielding each node with its depth below the starting node.
struct WithDepth<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
}

impl<'a> Iterator for WithDepth<'a> {
    type Item = (&'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        Some((node, depth))
    }
}

#[derive(Serialize)]
struct FlatNodeRef<'a> {
    depth: usize,
    instruction: &'a Instruction,
}

#[derive(Deserialize)]
struct FlatNode {
    depth: usize,
    instruction: Instruction,
}

#[derive(Deserialize)]
struct FlatTree {
    nodes: Vec<FlatNode>,
}

struct FlatNodes<'a>(&'a TreeNode);

impl Serialize for FlatNodes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let walk = WithDepth { stack: vec![(self.0, 0)] };
        serializer.collect_seq(walk.map(|(node, depth)| FlatNodeRef {
            depth,
            instruction: &node.instruction,
        }))
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TreeNode", 1)?;
        state.serialize_field("nodes", &FlatNodes(self))?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for TreeNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flat = FlatTree::deserialize(deserializer)?;
        rebuild(flat.nodes).map_err(de::Error::custom)
    }
}

/// Folds the top of `open` into its parent until `depth` nodes remain.
fn close_to(open: &mut Vec<TreeNode>, depth: usize) {
    while open.len() > depth.max(1) {
        if let Some(node) = open.pop()
            && let Some(parent) = open.last_mut()
        {
            parent.children.push(node);
        }
    }
}

/// Rebuilds a node from pre-order `(depth, instruction)` records.
fn rebuild(nodes: Vec<FlatNode>) -> Result<TreeNode, String> {
    // open[i] is the node at depth i on the current path
    let mut open: Vec<TreeNode> = Vec::new();

    for (index, FlatNode { depth, instruction }) in nodes.into_iter().enumerate() {
        if index == 0 && depth != 0 {
            return Err(format!("first node has depth {depth}, expected 0"));
        }
        if index > 0 && (depth == 0 || depth > open.len()) {
            return Err(format!("node {index} has depth {depth} under a path of {}", open.len()));
        }
        close_to(&mut open, depth);
        open.push(TreeNode::new(instruction));
    }

    close_to(&mut open, 1);
    open.pop().ok_or_else(|| "tree has no nodes".to_string())
}

fn attach(open: &mut [TreeNode], roots: &mut Vec<TreeNode>, node: TreeNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Builds every top-level segment of the instruction tree.
pub fn build_forest(instructions: &[Instruction]) -> Vec<TreeNode> {
    let mut roots = Vec::new();
    let mut open: Vec<TreeNode> = Vec::new();

    for ins in instructions {
        let node = TreeNode::new(ins.clone());

        if ins.op.is_jump_class() {
            match open.pop() {
                Some(mut top) => {
                    top.children.push(node);
                    attach(&mut open, &mut roots, top);
                }
                None => roots.push(node),
            }
        } else if open.len() >= MAX_DEPTH {
            attach(&mut open, &mut roots, node);
        } else {
            open.push(node);
        }
    }

    while let Some(top) = open.pop() {
        attach(&mut open, &mut roots, top);
    }

    tracing::debug!(
        "built instruction tree: {} instructions, {} top-level segments",
        instructions.len(),
        roots.len()
    );
    roots
}

/// Builds the instruction tree and returns its first top-level segment.
///
/// Returns `None` for an empty stream. Use [`build_forest`] to get every segment.
pub fn build_tree(instructions: &[Instruction]) -> Option<TreeNode> {
    build_forest(instructions).into_iter().next()
}

/// Renders the forest as an indented outline, one instruction per line.
pub fn render_outline(roots: &[TreeNode]) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&TreeNode, usize)> = roots.iter().rev().map(|r| (r, 0)).collect();
    while let Some((node, indent)) = stack.pop() {
        let _ = writeln!(out, "{:indent$}{}", "", node.instruction, indent = indent * 2);
        stack.extend(node.children.iter().rev().map(|c| (c, indent + 1)));
    }
    out
}

/// Renders the forest as a Graphviz digraph.
pub fn to_dot(roots: &[TreeNode]) -> String {
    let mut dot = String::from("digraph InstructionTree {\n");
    let mut next_id = 0usize;
    let mut stack: Vec<(&TreeNode, Option<usize>)> = roots.iter().rev().map(|r| (r, None)).collect();

    while let Some((node, parent)) = stack.pop() {
        let id = next_id;
        next_id += 1;
        let _ = writeln!(dot, "    {id} [label=\"{}\"];", node.instruction);
        if let Some(parent) = parent {
            let _ = writeln!(dot, "    {parent} -> {id};");
        }
        stack.extend(node.children.iter().rev().map(|c| (c, Some(id))));
    }

    dot.push_str("}\n");
    dot
}
