use fluxir_core::ast::{MethodBody, Stmt, Tree};
use fluxir_core::block::BlockId;
use fluxir_core::cfg::ControlFlowGraph;
use tracing::debug;

/// Translates the structured statement tree of one method into a
/// [`ControlFlowGraph`], threading a "current block" cursor through the tree.
///
/// A cursor is always an open block (no successors yet) unless a return
/// connected it to `end`; constructs test for that before wiring fallthrough
/// edges, so a returning branch is never reconnected.
pub struct CfgBuilder<'a> {
    body: &'a MethodBody,
    cfg: ControlFlowGraph,
}

impl<'a> CfgBuilder<'a> {
    pub fn new(body: &'a MethodBody) -> Self {
        Self {
            body,
            cfg: ControlFlowGraph::new(),
        }
    }

    pub fn build(mut self) -> ControlFlowGraph {
        let body = self.body;
        let start = self.cfg.start;
        let last = self.tree(body.root(), start);

        // implicit fallthrough return
        if !self.reaches_end(last) {
            let end = self.cfg.end;
            self.cfg.connect(last, end);
        }

        debug!(
            method = %body.name,
            blocks = self.cfg.count(),
            "lowered method body to control flow graph"
        );
        self.cfg
    }

    fn tree(&mut self, tree: &Tree, cursor: BlockId) -> BlockId {
        match tree {
            Tree::Seq(children) => {
                let mut cursor = cursor;
                for child in children {
                    cursor = self.tree(child, cursor);
                    // anything after an unconditional return is dead code and
                    // is never reached by the cursor
                    if self.reaches_end(cursor) {
                        break;
                    }
                }
                cursor
            }

            Tree::Stmt(stmt) => {
                self.cfg.block_mut(cursor).stmts.push(*stmt);
                if matches!(self.body.stmt(*stmt), Stmt::Return(_)) {
                    let end = self.cfg.end;
                    self.cfg.connect(cursor, end);
                }
                cursor
            }

            Tree::If {
                condition,
                then,
                otherwise,
            } => {
                self.cfg.terminate_in_condition(cursor, *condition);
                let true_block = self.cfg.block(cursor).true_successor();
                let false_block = self.cfg.block(cursor).false_successor();

                let then_cursor = self.tree(then, true_block);
                let else_cursor = match otherwise {
                    Some(otherwise) => self.tree(otherwise, false_block),
                    // without an else branch the false block is the join entry
                    None => false_block,
                };

                let rest = self.cfg.new_block();
                if !self.reaches_end(then_cursor) {
                    self.cfg.connect(then_cursor, rest);
                }
                if !self.reaches_end(else_cursor) {
                    self.cfg.connect(else_cursor, rest);
                }
                rest
            }

            Tree::While { condition, body } => {
                // a fresh test block keeps the loop condition out of the
                // cursor, which may already hold statements that must not
                // re-run on the back-edge
                let test = self.cfg.new_block();
                self.cfg.connect(cursor, test);
                self.cfg.terminate_in_condition(test, *condition);
                let loop_body = self.cfg.block(test).true_successor();
                let exit = self.cfg.block(test).false_successor();

                let body_cursor = self.tree(body, loop_body);
                if !self.reaches_end(body_cursor) {
                    self.cfg.connect(body_cursor, test);
                }
                exit
            }
        }
    }

    fn reaches_end(&self, block: BlockId) -> bool {
        self.cfg.block(block).successors.contains(&self.cfg.end)
    }
}
