use crate::analysis::non_null::NonNullAnalysis;
use crate::ast::{Expr, MethodBody, Stmt, VarKind};
use crate::block::BlockId;
use crate::cfg::ControlFlowGraph;
use crate::tests::fixtures::{assign, call, new_object};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

#[test]
fn test_allocation_is_non_null_and_null_kills() {
    // a = new A(); b = null;
    let mut body = MethodBody::new("m");
    let a = body.new_var("a", VarKind::Local);
    let b = body.new_var("b", VarKind::Local);
    let alloc = assign(&mut body, a, new_object("A"));
    let null = assign(&mut body, b, Expr::NullConst);

    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.block_mut(start).stmts = vec![alloc, null];
    cfg.connect(start, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    assert_eq!(analysis.out_state_of(start), &HashSet::from([a]));
}

#[test]
fn test_copy_uses_current_fact_of_source() {
    // a = new A(); b = a; a = null; c = a;
    let mut body = MethodBody::new("m");
    let a = body.new_var("a", VarKind::Local);
    let b = body.new_var("b", VarKind::Local);
    let c = body.new_var("c", VarKind::Local);
    let stmts = vec![
        assign(&mut body, a, new_object("A")),
        assign(&mut body, b, Expr::Var(a)),
        assign(&mut body, a, Expr::NullConst),
        assign(&mut body, c, Expr::Var(a)),
    ];

    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.block_mut(start).stmts = stmts;
    cfg.connect(start, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    // b copied a while it was non-null, c copied it after the null
    assert_eq!(analysis.out_state_of(start), &HashSet::from([b]));
}

#[test]
fn test_unknown_loads_kill_target() {
    // a = new A(); a = read(); b = this; b = r.f;
    let mut body = MethodBody::new("m");
    let a = body.new_var("a", VarKind::Local);
    let b = body.new_var("b", VarKind::Local);
    let r = body.new_var("r", VarKind::Param);
    let read_a = assign(&mut body, a, Expr::BuiltInRead);
    let this_b = assign(&mut body, b, Expr::ThisRef);
    let r_var = body.add_expr(Expr::Var(r));
    let field_load = assign(
        &mut body,
        b,
        Expr::Field {
            object: r_var,
            field: "f".to_string(),
        },
    );
    let alloc = assign(&mut body, a, new_object("A"));

    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.block_mut(start).stmts = vec![alloc, read_a, this_b, field_load];
    cfg.connect(start, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    // both a and b end up unknown, but the field load dereferenced r
    assert_eq!(analysis.out_state_of(start), &HashSet::from([r]));
}

#[test]
fn test_dereference_proves_receiver_non_null() {
    // r.f(); nop;
    let mut body = MethodBody::new("m");
    let r = body.new_var("r", VarKind::Param);
    let deref = call(&mut body, r, "f");
    let nop = body.add_stmt(Stmt::Nop);

    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.block_mut(start).stmts = vec![deref, nop];
    cfg.connect(start, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    // the fact holds only once control has survived the call
    assert_eq!(analysis.non_null_before(deref), &HashSet::new());
    assert_eq!(analysis.non_null_before(nop), &HashSet::from([r]));
}

#[test]
fn test_diamond_intersects_branch_facts() {
    // a = new A(); if (c) { b = a; } else { b = null; }
    let mut body = MethodBody::new("m");
    let a = body.new_var("a", VarKind::Local);
    let b = body.new_var("b", VarKind::Local);
    let cond = body.add_expr(Expr::BoolConst(true));
    let alloc = assign(&mut body, a, new_object("A"));
    let copy = assign(&mut body, b, Expr::Var(a));
    let null = assign(&mut body, b, Expr::NullConst);

    let mut cfg = ControlFlowGraph::new();
    let start = cfg.start;
    cfg.block_mut(start).stmts.push(alloc);
    cfg.terminate_in_condition(start, cond);
    let then_block = cfg.block(start).true_successor();
    let else_block = cfg.block(start).false_successor();
    cfg.block_mut(then_block).stmts.push(copy);
    cfg.block_mut(else_block).stmts.push(null);
    let merged = cfg.join(&[then_block, else_block]);
    let end = cfg.end;
    cfg.connect(merged, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    assert_eq!(analysis.out_state_of(then_block), &HashSet::from([a, b]));
    assert_eq!(analysis.out_state_of(else_block), &HashSet::from([a]));
    assert_eq!(analysis.in_state_of(merged), &HashSet::from([a]));
}

#[test]
fn test_loop_header_is_not_guaranteed() {
    // a = null; while (c) { a = new A(); a.f(); }
    let mut body = MethodBody::new("m");
    let a = body.new_var("a", VarKind::Local);
    let cond = body.add_expr(Expr::BoolConst(true));
    let null = assign(&mut body, a, Expr::NullConst);
    let alloc = assign(&mut body, a, new_object("A"));
    let deref = call(&mut body, a, "f");

    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.block_mut(start).stmts.push(null);
    let test = cfg.new_block();
    cfg.connect(start, test);
    cfg.terminate_in_condition(test, cond);
    let loop_body = cfg.block(test).true_successor();
    let exit = cfg.block(test).false_successor();
    cfg.block_mut(loop_body).stmts = vec![alloc, deref];
    cfg.connect(loop_body, test);
    cfg.connect(exit, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    // inside the body, right after a.f(), a is provably non-null
    assert!(analysis.out_state_of(loop_body).contains(&a));
    // but the header merges the pre-loop path where a is null
    assert!(!analysis.in_state_of(test).contains(&a));
    assert!(!analysis.non_null_before_condition(test).contains(&a));
    assert!(analysis.non_null_before(deref).contains(&a));
}

#[test]
fn test_before_condition_snapshot_follows_statements() {
    let mut body = MethodBody::new("m");
    let a = body.new_var("a", VarKind::Local);
    let cond = body.add_expr(Expr::BoolConst(true));
    let alloc = assign(&mut body, a, new_object("A"));

    let mut cfg = ControlFlowGraph::new();
    let start = cfg.start;
    cfg.block_mut(start).stmts.push(alloc);
    cfg.terminate_in_condition(start, cond);
    let then_block = cfg.block(start).true_successor();
    let else_block = cfg.block(start).false_successor();
    let merged = cfg.join(&[then_block, else_block]);
    let end = cfg.end;
    cfg.connect(merged, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    assert_eq!(analysis.non_null_before(alloc), &HashSet::new());
    assert_eq!(analysis.non_null_before_condition(start), &HashSet::from([a]));
}

#[test]
#[should_panic(expected = "does not belong")]
fn test_condition_query_for_foreign_block_is_fatal() {
    let mut body = MethodBody::new("m");
    body.new_var("a", VarKind::Local);

    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.connect(start, end);

    let analysis = NonNullAnalysis::new(&cfg, &body);
    analysis.non_null_before_condition(BlockId(42));
}
