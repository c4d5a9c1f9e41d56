use crate::analysis::dataflow::{Analysis, Dataflow};
use crate::ast::{Expr, ExprId, MethodBody, Stmt, StmtId, VarId, VarKind};
use crate::block::{BasicBlock, BlockId};
use crate::cfg::ControlFlowGraph;
use std::collections::{HashMap, HashSet};

/// Tracks the set of parameters and locals that are provably non-null at a
/// program point on every path reaching it.
///
/// Must-analysis: intersection join, non-start blocks seeded with the full
/// declared-variable set so that repeated intersection shrinks the states
/// monotonically down to the fixed point. The transfer function simulates a
/// block's statements in order instead of using a static gen/kill pair,
/// because the effect of a copy assignment depends on the state it runs in.
pub struct NonNullAnalysis {
    flow: Dataflow<HashSet<VarId>>,
    before_stmt: HashMap<StmtId, HashSet<VarId>>,
    before_condition: HashMap<BlockId, HashSet<VarId>>,
}

impl NonNullAnalysis {
    pub fn new(cfg: &ControlFlowGraph, body: &MethodBody) -> Self {
        let all_vars: HashSet<VarId> = body.tracked_vars().map(|v| v.id).collect();
        let mut spec = NonNull { body, all_vars };
        let flow = Dataflow::solve(cfg, &mut spec);

        // Replay each block once from its converged in-state to capture the
        // per-statement snapshots.
        let mut before_stmt = HashMap::new();
        let mut before_condition = HashMap::new();
        for block in cfg.blocks() {
            let out = simulate(body, block, flow.in_state_of(block.id), |sid, state| {
                before_stmt.insert(sid, state.clone());
            });
            before_condition.insert(block.id, out);
        }

        Self {
            flow,
            before_stmt,
            before_condition,
        }
    }

    /// Variables guaranteed non-null at the entry of `block`.
    pub fn in_state_of(&self, block: BlockId) -> &HashSet<VarId> {
        self.flow.in_state_of(block)
    }

    /// Variables guaranteed non-null at the exit of `block`.
    pub fn out_state_of(&self, block: BlockId) -> &HashSet<VarId> {
        self.flow.out_state_of(block)
    }

    /// Variables guaranteed non-null just before `stmt` executes. Panics if
    /// the statement is not part of the analyzed graph.
    pub fn non_null_before(&self, stmt: StmtId) -> &HashSet<VarId> {
        self.before_stmt
            .get(&stmt)
            .unwrap_or_else(|| panic!("{stmt} does not belong to the analyzed graph"))
    }

    /// Variables guaranteed non-null after all of the block's statements but
    /// before its condition is evaluated.
    pub fn non_null_before_condition(&self, block: BlockId) -> &HashSet<VarId> {
        self.before_condition
            .get(&block)
            .unwrap_or_else(|| panic!("{block} does not belong to the analyzed graph"))
    }
}

struct NonNull<'a> {
    body: &'a MethodBody,
    all_vars: HashSet<VarId>,
}

impl Analysis for NonNull<'_> {
    type State = HashSet<VarId>;

    fn initial_state(&self) -> HashSet<VarId> {
        self.all_vars.clone()
    }

    fn start_state(&self) -> HashSet<VarId> {
        HashSet::new()
    }

    fn transfer(&mut self, block: &BasicBlock, input: &HashSet<VarId>) -> HashSet<VarId> {
        simulate(self.body, block, input, |_, _| {})
    }

    fn join(&self, states: &[&HashSet<VarId>]) -> HashSet<VarId> {
        match states.split_first() {
            None => HashSet::new(),
            Some((first, rest)) => {
                let mut joined = (*first).clone();
                joined.retain(|var| rest.iter().all(|state| state.contains(var)));
                joined
            }
        }
    }
}

/// Runs the block's statements in order against a working copy of `input`,
/// calling `snapshot` with the state just before each statement, and returns
/// the state after the last statement.
fn simulate(
    body: &MethodBody,
    block: &BasicBlock,
    input: &HashSet<VarId>,
    mut snapshot: impl FnMut(StmtId, &HashSet<VarId>),
) -> HashSet<VarId> {
    let mut state = input.clone();
    for &sid in &block.stmts {
        snapshot(sid, &state);
        apply(body, sid, &mut state);
    }
    state
}

fn apply(body: &MethodBody, sid: StmtId, state: &mut HashSet<VarId>) {
    if let Stmt::Assign { target, value } = body.stmt(sid) {
        if let Some(var) = tracked_var(body, *target) {
            match rhs_fact(body, *value) {
                RhsFact::NonNull => {
                    state.insert(var);
                }
                RhsFact::Null | RhsFact::Unknown => {
                    state.remove(&var);
                }
                RhsFact::CopyOf(source) => {
                    if state.contains(&source) {
                        state.insert(var);
                    } else {
                        state.remove(&var);
                    }
                }
                RhsFact::NoEffect => {}
            }
        }
    }

    // A dereference that faults diverts control flow, so reaching the next
    // statement proves the dereferenced variable was non-null.
    for_each_deref(body, sid, |var| {
        state.insert(var);
    });
}

enum RhsFact {
    /// Freshly allocated object or array, or `this`.
    NonNull,
    Null,
    /// Copies the current fact of another tracked variable.
    CopyOf(VarId),
    /// Field, element or call result, nullability unknown.
    Unknown,
    /// Value of a non-reference type.
    NoEffect,
}

fn rhs_fact(body: &MethodBody, expr: ExprId) -> RhsFact {
    match body.expr(expr) {
        Expr::NewObject { .. } | Expr::NewArray { .. } | Expr::ThisRef => RhsFact::NonNull,
        Expr::NullConst => RhsFact::Null,
        Expr::Var(var) => match tracked_var(body, expr) {
            Some(var) => RhsFact::CopyOf(var),
            None => {
                debug_assert_eq!(body.var(*var).kind, VarKind::Field);
                RhsFact::Unknown
            }
        },
        Expr::Cast { arg, .. } => rhs_fact(body, *arg),
        Expr::Field { .. } | Expr::Index { .. } | Expr::MethodCall { .. } | Expr::BuiltInRead => {
            RhsFact::Unknown
        }
        Expr::IntConst(_) | Expr::BoolConst(_) | Expr::Unary { .. } | Expr::Binary { .. } => {
            RhsFact::NoEffect
        }
    }
}

fn tracked_var(body: &MethodBody, expr: ExprId) -> Option<VarId> {
    match body.expr(expr) {
        Expr::Var(var) if body.var(*var).kind != VarKind::Field => Some(*var),
        _ => None,
    }
}

/// Calls `found` for every tracked variable the statement dereferences: a
/// field access base, an array access base, or a call receiver.
fn for_each_deref(body: &MethodBody, sid: StmtId, mut found: impl FnMut(VarId)) {
    let mut visit = |expr: ExprId| walk_derefs(body, expr, &mut found);
    match body.stmt(sid) {
        Stmt::Assign { target, value } => {
            visit(*target);
            visit(*value);
        }
        Stmt::BuiltInWrite { arg: Some(arg) } => visit(*arg),
        Stmt::BuiltInWrite { arg: None } => {}
        Stmt::Call(call) => visit(*call),
        Stmt::Return(Some(value)) => visit(*value),
        Stmt::Return(None) | Stmt::Nop => {}
    }
}

fn walk_derefs(body: &MethodBody, expr: ExprId, found: &mut impl FnMut(VarId)) {
    let mut base = |inner: ExprId, found: &mut dyn FnMut(VarId)| {
        if let Some(var) = tracked_var(body, inner) {
            found(var);
        }
    };
    match body.expr(expr) {
        Expr::Field { object, .. } => {
            base(*object, found);
            walk_derefs(body, *object, found);
        }
        Expr::Index { array, index } => {
            base(*array, found);
            walk_derefs(body, *array, found);
            walk_derefs(body, *index, found);
        }
        Expr::MethodCall { receiver, args, .. } => {
            base(*receiver, found);
            walk_derefs(body, *receiver, found);
            for arg in args {
                walk_derefs(body, *arg, found);
            }
        }
        Expr::Unary { arg, .. } | Expr::Cast { arg, .. } | Expr::NewArray { size: arg, .. } => {
            walk_derefs(body, *arg, found);
        }
        Expr::Binary { left, right, .. } => {
            walk_derefs(body, *left, found);
            walk_derefs(body, *right, found);
        }
        Expr::Var(_)
        | Expr::IntConst(_)
        | Expr::BoolConst(_)
        | Expr::NullConst
        | Expr::ThisRef
        | Expr::NewObject { .. }
        | Expr::BuiltInRead => {}
    }
}
