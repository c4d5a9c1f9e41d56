use crate::ast::{Expr, MethodBody, Stmt, StmtId, VarId};

/// Allocates an assignment `var = value` in the arena.
pub fn assign(body: &mut MethodBody, var: VarId, value: Expr) -> StmtId {
    let target = body.add_expr(Expr::Var(var));
    let value = body.add_expr(value);
    body.add_stmt(Stmt::Assign { target, value })
}

/// Allocates a bare call `receiver.method()` in the arena.
pub fn call(body: &mut MethodBody, receiver: VarId, method: &str) -> StmtId {
    let receiver = body.add_expr(Expr::Var(receiver));
    let call = body.add_expr(Expr::MethodCall {
        receiver,
        method: method.to_string(),
        args: Vec::new(),
    });
    body.add_stmt(Stmt::Call(call))
}

pub fn new_object(class: &str) -> Expr {
    Expr::NewObject {
        class: class.to_string(),
    }
}
