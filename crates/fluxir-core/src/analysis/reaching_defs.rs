use crate::analysis::dataflow::{Analysis, Dataflow};
use crate::ast::{Expr, MethodBody, Stmt, StmtId, VarId, VarKind};
use crate::block::{BasicBlock, BlockId};
use crate::cfg::ControlFlowGraph;
use indexmap::IndexMap;
use std::collections::HashSet;

/// A definition: an assignment of the form `x = ...` where `x` is a
/// parameter or local. Identified by the assignment statement itself, so two
/// assignments to the same variable are distinct defs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Def {
    pub assign: StmtId,
    pub target: VarId,
}

/// Computes, for each block, the set of definitions that may reach it along
/// some path from `start`. May-analysis: union join, empty initial states.
pub struct ReachingDefsAnalysis {
    flow: Dataflow<HashSet<Def>>,
}

impl ReachingDefsAnalysis {
    pub fn new(cfg: &ControlFlowGraph, body: &MethodBody) -> Self {
        let gen: Vec<HashSet<Def>> = cfg.blocks().map(|b| block_gen(b, body)).collect();

        // A def is killed by a block if some other block's gen contains a def
        // of a variable with the same name. Matching is by name, as required
        // for overwriting assignments across scopes.
        let kill: Vec<HashSet<Def>> = cfg
            .blocks()
            .map(|block| {
                let assigned: HashSet<&str> = gen[block.id.0 as usize]
                    .iter()
                    .map(|def| body.var(def.target).name.as_str())
                    .collect();
                cfg.blocks()
                    .filter(|other| other.id != block.id)
                    .flat_map(|other| gen[other.id.0 as usize].iter().copied())
                    .filter(|def| assigned.contains(body.var(def.target).name.as_str()))
                    .collect()
            })
            .collect();

        let mut spec = ReachingDefs { gen, kill };
        let flow = Dataflow::solve(cfg, &mut spec);
        Self { flow }
    }

    /// Definitions that may reach the entry of `block`.
    pub fn in_state_of(&self, block: BlockId) -> &HashSet<Def> {
        self.flow.in_state_of(block)
    }

    /// Definitions that may reach the exit of `block`.
    pub fn out_state_of(&self, block: BlockId) -> &HashSet<Def> {
        self.flow.out_state_of(block)
    }
}

/// Defs generated by `block`: the last assignment per target name survives,
/// earlier same-name assignments are locally overwritten.
fn block_gen(block: &BasicBlock, body: &MethodBody) -> HashSet<Def> {
    let mut last: IndexMap<&str, Def> = IndexMap::new();
    for &sid in &block.stmts {
        if let Stmt::Assign { target, .. } = body.stmt(sid) {
            if let Expr::Var(var) = body.expr(*target) {
                if body.var(*var).kind != VarKind::Field {
                    last.insert(
                        body.var(*var).name.as_str(),
                        Def {
                            assign: sid,
                            target: *var,
                        },
                    );
                }
            }
        }
    }
    last.into_values().collect()
}

struct ReachingDefs {
    gen: Vec<HashSet<Def>>,
    kill: Vec<HashSet<Def>>,
}

impl Analysis for ReachingDefs {
    type State = HashSet<Def>;

    fn initial_state(&self) -> HashSet<Def> {
        HashSet::new()
    }

    fn start_state(&self) -> HashSet<Def> {
        HashSet::new()
    }

    fn transfer(&mut self, block: &BasicBlock, input: &HashSet<Def>) -> HashSet<Def> {
        let idx = block.id.0 as usize;
        let mut out: HashSet<Def> = input.difference(&self.kill[idx]).copied().collect();
        out.extend(self.gen[idx].iter().copied());
        out
    }

    fn join(&self, states: &[&HashSet<Def>]) -> HashSet<Def> {
        let mut joined = HashSet::new();
        for state in states {
            joined.extend(state.iter().copied());
        }
        joined
    }
}
