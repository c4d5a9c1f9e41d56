use crate::ast::{Expr, MethodBody};
use crate::block::BlockId;
use crate::cfg::ControlFlowGraph;
use std::collections::HashSet;

#[test]
fn test_new_graph_has_start_and_end() {
    let cfg = ControlFlowGraph::new();
    assert_eq!(cfg.count(), 2);
    assert_eq!(cfg.start, BlockId(0));
    assert_eq!(cfg.end, BlockId(1));
    assert!(cfg.block(cfg.end).is_terminal());
}

#[test]
fn test_connect_mirrors_edges() {
    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.connect(start, end);

    assert_eq!(cfg.block(start).successors, vec![end]);
    assert_eq!(cfg.block(end).predecessors, vec![start]);
}

#[test]
fn test_terminate_in_condition_creates_two_branches() {
    let mut body = MethodBody::new("m");
    let cond = body.add_expr(Expr::BoolConst(true));

    let mut cfg = ControlFlowGraph::new();
    let start = cfg.start;
    cfg.terminate_in_condition(start, cond);

    let block = cfg.block(start);
    assert_eq!(block.condition, Some(cond));
    assert_eq!(block.successors.len(), 2);
    assert!(block.is_branch());

    let true_block = block.true_successor();
    let false_block = block.false_successor();
    assert_ne!(true_block, false_block);
    assert_eq!(cfg.block(true_block).predecessors, vec![start]);
    assert_eq!(cfg.block(false_block).predecessors, vec![start]);
}

#[test]
#[should_panic(expected = "full set of successors")]
fn test_connect_rejects_second_fallthrough_edge() {
    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    let extra = cfg.new_block();
    cfg.connect(start, end);
    cfg.connect(start, extra);
}

#[test]
fn test_join_merges_open_blocks() {
    let mut cfg = ControlFlowGraph::new();
    let a = cfg.new_block();
    let b = cfg.new_block();

    let merged = cfg.join(&[a, b]);
    assert_eq!(cfg.block(merged).predecessors, vec![a, b]);
    assert_eq!(cfg.block(a).successors, vec![merged]);
    assert_eq!(cfg.block(b).successors, vec![merged]);
}

#[test]
fn test_reachable_blocks_skips_disconnected() {
    let mut body = MethodBody::new("m");
    let cond = body.add_expr(Expr::BoolConst(false));

    let mut cfg = ControlFlowGraph::new();
    let start = cfg.start;
    cfg.terminate_in_condition(start, cond);
    let true_block = cfg.block(start).true_successor();
    let false_block = cfg.block(start).false_successor();
    let merged = cfg.join(&[true_block, false_block]);
    let end = cfg.end;
    cfg.connect(merged, end);
    let orphan = cfg.new_block();

    let reachable = cfg.reachable_blocks();
    assert_eq!(
        reachable,
        HashSet::from([start, true_block, false_block, merged, end])
    );
    assert!(!reachable.contains(&orphan));
}

#[test]
fn test_validate_accepts_finished_graph() {
    let mut cfg = ControlFlowGraph::new();
    let (start, end) = (cfg.start, cfg.end);
    cfg.connect(start, end);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_rejects_dangling_terminal() {
    // start has no path to end yet, so it is a terminal non-end block
    let cfg = ControlFlowGraph::new();
    assert!(cfg.validate().is_err());
}
