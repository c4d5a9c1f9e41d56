/*! Unified interface for the fluxir compiler mid-end.
 *
 * Single import for everything between semantic analysis and code generation:
 * the method-body arena, CFG lowering, and the dataflow analyses whose results
 * the backend consumes.
 */

pub use fluxir_core as core;
pub use fluxir_transform as transform;

pub use fluxir_core::{
    analysis::{Analysis, Dataflow, Def, NonNullAnalysis, ReachingDefsAnalysis},
    ast::{Expr, ExprId, MethodBody, Stmt, StmtId, Tree, VarId, VarKind},
    block::{BasicBlock, BlockId},
    cfg::ControlFlowGraph,
};

pub use fluxir_transform::{lower_method, CfgBuilder};
