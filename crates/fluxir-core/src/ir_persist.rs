use crate::ast::MethodBody;
use crate::cfg::ControlFlowGraph;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// A lowered method: the arena it was built from plus its control flow
/// graph. Block statement ids only make sense against the paired body, so
/// the two are persisted as one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodIr {
    pub body: MethodBody,
    pub cfg: ControlFlowGraph,
}

pub fn save_method(method: &MethodIr, path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(method)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::write(path, json)?;
    Ok(())
}

pub fn load_method(path: impl AsRef<Path>) -> io::Result<MethodIr> {
    let json = fs::read_to_string(path)?;
    let method =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Stmt, VarKind};
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_load_method() {
        let mut body = MethodBody::new("roundtrip");
        let x = body.new_var("x", VarKind::Local);
        let lhs = body.add_expr(Expr::Var(x));
        let rhs = body.add_expr(Expr::IntConst(7));
        let assign = body.add_stmt(Stmt::Assign {
            target: lhs,
            value: rhs,
        });

        let mut cfg = ControlFlowGraph::new();
        cfg.block_mut(cfg.start).stmts.push(assign);
        let (start, end) = (cfg.start, cfg.end);
        cfg.connect(start, end);

        let temp_file = NamedTempFile::new().unwrap();
        save_method(&MethodIr { body, cfg }, temp_file.path()).unwrap();

        let loaded = load_method(temp_file.path()).unwrap();
        assert_eq!(loaded.body.name, "roundtrip");
        assert_eq!(loaded.cfg.count(), 2);
        assert_eq!(loaded.cfg.block(loaded.cfg.start).stmts, vec![assign]);
    }
}
