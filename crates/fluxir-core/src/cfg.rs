use crate::block::{BasicBlock, BlockId};
use crate::IrError;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// The control flow graph of a single method.
///
/// Created once per method by the lowering pass and structurally immutable
/// afterwards; analyses only attach their own per-block state on the side.
/// `start` is the unique entry and `end` the unique terminal block that every
/// return leads to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    blocks: Vec<BasicBlock>,
    pub start: BlockId,
    pub end: BlockId,
}

impl ControlFlowGraph {
    pub fn new() -> Self {
        let mut cfg = Self {
            blocks: Vec::new(),
            start: BlockId(0),
            end: BlockId(1),
        };
        cfg.start = cfg.new_block();
        cfg.end = cfg.new_block();
        cfg
    }

    pub fn count(&self) -> usize {
        self.blocks.len()
    }

    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock::new(id));
        id
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.0 as usize]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.0 as usize]
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter()
    }

    /// Adds an edge from `from` to `to`. A block without a condition may gain
    /// at most one successor, a branch block at most two.
    pub fn connect(&mut self, from: BlockId, to: BlockId) {
        let limit = if self.block(from).condition.is_some() {
            2
        } else {
            1
        };
        assert!(
            self.block(from).successors.len() < limit,
            "{from} already has its full set of successors"
        );
        self.block_mut(from).successors.push(to);
        self.block_mut(to).predecessors.push(from);
    }

    /// Terminates `block` so that it evaluates `condition` and creates two
    /// fresh successors: first the true branch, then the false branch.
    pub fn terminate_in_condition(&mut self, block: BlockId, condition: crate::ast::ExprId) {
        assert!(
            self.block(block).condition.is_none() && self.block(block).successors.is_empty(),
            "{block} is already terminated"
        );
        self.block_mut(block).condition = Some(condition);
        let true_block = self.new_block();
        let false_block = self.new_block();
        self.connect(block, true_block);
        self.connect(block, false_block);
    }

    /// Merges the control flow of blocks that do not yet have successors into
    /// a single fresh successor and returns it.
    pub fn join(&mut self, preds: &[BlockId]) -> BlockId {
        let result = self.new_block();
        for &pred in preds {
            assert!(
                self.block(pred).condition.is_none() && self.block(pred).successors.is_empty(),
                "{pred} is already terminated"
            );
            self.connect(pred, result);
        }
        result
    }

    /// Blocks reachable from `start` by following successor edges.
    pub fn reachable_blocks(&self) -> HashSet<BlockId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.start);

        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                for &succ in &self.block(current).successors {
                    queue.push_back(succ);
                }
            }
        }

        visited
    }

    /// Checks the structural invariants of a finished graph: `start` is the
    /// only reachable block without predecessors, `end` the only reachable
    /// terminal block, a condition is present exactly on two-successor blocks,
    /// and successor/predecessor edges mirror each other.
    pub fn validate(&self) -> Result<(), IrError> {
        if !self.block(self.start).predecessors.is_empty() {
            return Err(IrError::MalformedCfg(format!(
                "start block {} has predecessors",
                self.start
            )));
        }
        if !self.block(self.end).successors.is_empty() {
            return Err(IrError::MalformedCfg(format!(
                "end block {} has successors",
                self.end
            )));
        }

        let reachable = self.reachable_blocks();
        for block in &self.blocks {
            if block.condition.is_some() != (block.successors.len() == 2) {
                return Err(IrError::MalformedCfg(format!(
                    "{} has {} successors but condition is {}",
                    block.id,
                    block.successors.len(),
                    if block.condition.is_some() {
                        "set"
                    } else {
                        "absent"
                    }
                )));
            }
            for &succ in &block.successors {
                if !self.block(succ).predecessors.contains(&block.id) {
                    return Err(IrError::MalformedCfg(format!(
                        "edge {} -> {succ} is not mirrored",
                        block.id
                    )));
                }
            }
            if reachable.contains(&block.id) {
                if block.id != self.start && block.predecessors.is_empty() {
                    return Err(IrError::MalformedCfg(format!(
                        "reachable block {} has no predecessors",
                        block.id
                    )));
                }
                if block.is_terminal() && block.id != self.end {
                    return Err(IrError::MalformedCfg(format!(
                        "reachable block {} is terminal but is not the end block",
                        block.id
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for ControlFlowGraph {
    fn default() -> Self {
        Self::new()
    }
}
