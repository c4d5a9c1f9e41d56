use crate::analysis::{NonNullAnalysis, ReachingDefsAnalysis};
use crate::ast::{Expr, ExprId, MethodBody, Stmt, StmtId};
use crate::cfg::ControlFlowGraph;
use std::fmt::Write;

pub fn format_cfg(cfg: &ControlFlowGraph, body: &MethodBody) -> String {
    let mut output = String::new();

    writeln!(&mut output, "; method {}", body.name).unwrap();
    for block in cfg.blocks() {
        let role = if block.id == cfg.start {
            " (start)"
        } else if block.id == cfg.end {
            " (end)"
        } else {
            ""
        };
        writeln!(&mut output, "{}:{role}", block.id).unwrap();
        for &sid in &block.stmts {
            writeln!(&mut output, "  {}", format_stmt(body, sid)).unwrap();
        }
        match block.condition {
            Some(cond) => writeln!(
                &mut output,
                "  if {} then {} else {}",
                format_expr(body, cond),
                block.true_successor(),
                block.false_successor()
            )
            .unwrap(),
            None => match block.successors.first() {
                Some(succ) => writeln!(&mut output, "  goto {succ}").unwrap(),
                None => writeln!(&mut output, "  <terminal>").unwrap(),
            },
        }
    }

    output
}

pub fn format_reaching_defs(
    cfg: &ControlFlowGraph,
    body: &MethodBody,
    analysis: &ReachingDefsAnalysis,
) -> String {
    let mut output = String::new();
    for block in cfg.blocks() {
        let mut defs: Vec<String> = analysis
            .out_state_of(block.id)
            .iter()
            .map(|def| format_stmt(body, def.assign))
            .collect();
        defs.sort();
        writeln!(&mut output, "{} out: [{}]", block.id, defs.join(", ")).unwrap();
    }
    output
}

pub fn format_non_null(
    cfg: &ControlFlowGraph,
    body: &MethodBody,
    analysis: &NonNullAnalysis,
) -> String {
    let mut output = String::new();
    for block in cfg.blocks() {
        let mut vars: Vec<&str> = analysis
            .out_state_of(block.id)
            .iter()
            .map(|var| body.var(*var).name.as_str())
            .collect();
        vars.sort();
        writeln!(&mut output, "{} out: [{}]", block.id, vars.join(", ")).unwrap();
    }
    output
}

pub fn format_stmt(body: &MethodBody, stmt: StmtId) -> String {
    match body.stmt(stmt) {
        Stmt::Assign { target, value } => format!(
            "{} = {}",
            format_expr(body, *target),
            format_expr(body, *value)
        ),
        Stmt::BuiltInWrite { arg: Some(arg) } => format!("write({})", format_expr(body, *arg)),
        Stmt::BuiltInWrite { arg: None } => "writeln()".to_string(),
        Stmt::Call(call) => format_expr(body, *call),
        Stmt::Return(Some(value)) => format!("return {}", format_expr(body, *value)),
        Stmt::Return(None) => "return".to_string(),
        Stmt::Nop => "nop".to_string(),
    }
}

pub fn format_expr(body: &MethodBody, expr: ExprId) -> String {
    match body.expr(expr) {
        Expr::Var(var) => body.var(*var).name.clone(),
        Expr::IntConst(value) => value.to_string(),
        Expr::BoolConst(value) => value.to_string(),
        Expr::NullConst => "null".to_string(),
        Expr::ThisRef => "this".to_string(),
        Expr::Unary { op, arg } => format!("{op}{}", format_expr(body, *arg)),
        Expr::Binary { op, left, right } => format!(
            "({} {op} {})",
            format_expr(body, *left),
            format_expr(body, *right)
        ),
        Expr::Cast { target_type, arg } => {
            format!("({target_type}){}", format_expr(body, *arg))
        }
        Expr::Field { object, field } => format!("{}.{field}", format_expr(body, *object)),
        Expr::Index { array, index } => format!(
            "{}[{}]",
            format_expr(body, *array),
            format_expr(body, *index)
        ),
        Expr::NewObject { class } => format!("new {class}()"),
        Expr::NewArray { elem_type, size } => {
            format!("new {elem_type}[{}]", format_expr(body, *size))
        }
        Expr::BuiltInRead => "read()".to_string(),
        Expr::MethodCall {
            receiver,
            method,
            args,
        } => {
            let args: Vec<String> = args.iter().map(|arg| format_expr(body, *arg)).collect();
            format!(
                "{}.{method}({})",
                format_expr(body, *receiver),
                args.join(", ")
            )
        }
    }
}
