use crate::ast::{ExprId, StmtId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BB{}", self.0)
    }
}

/// Node in a control flow graph. New blocks are created through
/// [`ControlFlowGraph`](crate::cfg::ControlFlowGraph), which assigns dense
/// 0-based ids.
///
/// A block holds a straight-line run of statement ids. When it ends, control
/// flows into one of its successors: a block with two successors carries a
/// `condition`, and the first successor is taken when the condition evaluates
/// to true. A block with no successors is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub stmts: Vec<StmtId>,
    pub predecessors: Vec<BlockId>,
    pub successors: Vec<BlockId>,
    pub condition: Option<ExprId>,
}

impl BasicBlock {
    pub(crate) fn new(id: BlockId) -> Self {
        Self {
            id,
            stmts: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
            condition: None,
        }
    }

    pub fn is_branch(&self) -> bool {
        self.condition.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.successors.is_empty()
    }

    /// Successor taken when the condition evaluates to true.
    pub fn true_successor(&self) -> BlockId {
        assert!(self.condition.is_some(), "{} has no condition", self.id);
        self.successors[0]
    }

    /// Successor taken when the condition evaluates to false.
    pub fn false_successor(&self) -> BlockId {
        assert!(self.condition.is_some(), "{} has no condition", self.id);
        self.successors[1]
    }
}
