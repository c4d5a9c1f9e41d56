/*! Core mid-end types and analyses for a small imperative-language compiler.
 *
 * Code generation needs straight-line blocks and per-block facts, not a nested
 * statement tree. This crate provides the control-flow-graph data model plus a
 * generic forward fixed-point solver, instantiated by reaching definitions and
 * non-null value tracking.
 */

pub mod analysis;
pub mod ast;
pub mod block;
pub mod cfg;
pub mod format;
pub mod ir_persist;

pub use analysis::{Analysis, Dataflow, Def, NonNullAnalysis, ReachingDefsAnalysis};
pub use ast::{BinOp, Expr, ExprId, MethodBody, Stmt, StmtId, Tree, UnOp, VarId, VarKind, Variable};
pub use block::{BasicBlock, BlockId};
pub use cfg::ControlFlowGraph;
pub use ir_persist::MethodIr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("malformed method body: {0}")]
    MalformedBody(String),
    #[error("malformed control flow graph: {0}")]
    MalformedCfg(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
