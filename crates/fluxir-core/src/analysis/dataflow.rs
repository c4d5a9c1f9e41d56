use crate::block::{BasicBlock, BlockId};
use crate::cfg::ControlFlowGraph;
use tracing::debug;

/// Block-local specification of a forward dataflow analysis.
///
/// `transfer` and `join` must be monotonic over a finite-height lattice, with
/// `join` the union for may-analyses and the intersection for must-analyses;
/// the solver relies on this for termination but cannot enforce it.
pub trait Analysis {
    type State: Clone + PartialEq;

    /// Out-state assigned to every block except `start` before the first
    /// pass: bottom for a may-analysis, top for a must-analysis.
    fn initial_state(&self) -> Self::State;

    /// Out-state pre-seeded for `start`, standing in for its empty
    /// predecessor set.
    fn start_state(&self) -> Self::State;

    /// Computes the out-state of `block` from its in-state.
    fn transfer(&mut self, block: &BasicBlock, input: &Self::State) -> Self::State;

    /// Merges predecessor out-states into an in-state. Must be well-defined
    /// for an empty slice.
    fn join(&self, states: &[&Self::State]) -> Self::State;
}

/// Fixed-point solution of a forward analysis: one in-state and one out-state
/// per block, indexed by the block ids of the graph the solver ran on.
#[derive(Debug, Clone)]
pub struct Dataflow<S> {
    in_states: Vec<S>,
    out_states: Vec<S>,
}

impl<S: Clone + PartialEq> Dataflow<S> {
    /// Runs `analysis` over `cfg` to a fixed point.
    pub fn solve<A>(cfg: &ControlFlowGraph, analysis: &mut A) -> Self
    where
        A: Analysis<State = S>,
    {
        let mut flow = Self {
            in_states: vec![analysis.initial_state(); cfg.count()],
            out_states: vec![analysis.initial_state(); cfg.count()],
        };
        flow.out_states[cfg.start.0 as usize] = analysis.start_state();
        flow.iterate(cfg, analysis);
        flow
    }

    /// Repeats full passes over all blocks until no out-state changes, and
    /// returns the number of passes. Calling this again on a converged
    /// solution performs exactly one further pass and changes nothing.
    pub fn iterate<A>(&mut self, cfg: &ControlFlowGraph, analysis: &mut A) -> usize
    where
        A: Analysis<State = S>,
    {
        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for block in cfg.blocks() {
                let input = {
                    let preds: Vec<&S> = block
                        .predecessors
                        .iter()
                        .map(|p| &self.out_states[p.0 as usize])
                        .collect();
                    analysis.join(&preds)
                };
                let output = analysis.transfer(block, &input);

                let idx = block.id.0 as usize;
                if self.out_states[idx] != output {
                    changed = true;
                }
                self.in_states[idx] = input;
                self.out_states[idx] = output;
            }
        }
        debug!(passes, blocks = cfg.count(), "dataflow solver converged");
        passes
    }

    /// In-state of `block`. Panics if the block does not belong to the graph
    /// the solution was computed for.
    pub fn in_state_of(&self, block: BlockId) -> &S {
        self.in_states
            .get(block.0 as usize)
            .unwrap_or_else(|| panic!("{block} does not belong to the analyzed graph"))
    }

    /// Out-state of `block`. Panics if the block does not belong to the graph
    /// the solution was computed for.
    pub fn out_state_of(&self, block: BlockId) -> &S {
        self.out_states
            .get(block.0 as usize)
            .unwrap_or_else(|| panic!("{block} does not belong to the analyzed graph"))
    }
}
