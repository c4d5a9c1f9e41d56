use crate::IrError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExprId(pub u32);

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stmt{}", self.0)
    }
}

/// Storage class of a resolved variable. Definitions and non-null facts are
/// only tracked for parameters and locals; fields are shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarKind {
    Param,
    Local,
    Field,
}

/// A variable with its identity resolved by semantic analysis. Two references
/// to the same variable carry the same [`VarId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub id: VarId,
    pub name: String,
    pub kind: VarKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Plus,
    Minus,
    Not,
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            UnOp::Plus => "+",
            UnOp::Minus => "-",
            UnOp::Not => "!",
        };
        write!(f, "{token}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        };
        write!(f, "{token}")
    }
}

/// Expression nodes, arena-allocated in a [`MethodBody`] and addressed by
/// [`ExprId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    Var(VarId),
    IntConst(i64),
    BoolConst(bool),
    NullConst,
    ThisRef,
    Unary {
        op: UnOp,
        arg: ExprId,
    },
    Binary {
        op: BinOp,
        left: ExprId,
        right: ExprId,
    },
    Cast {
        target_type: String,
        arg: ExprId,
    },
    Field {
        object: ExprId,
        field: String,
    },
    Index {
        array: ExprId,
        index: ExprId,
    },
    NewObject {
        class: String,
    },
    NewArray {
        elem_type: String,
        size: ExprId,
    },
    BuiltInRead,
    MethodCall {
        receiver: ExprId,
        method: String,
        args: Vec<ExprId>,
    },
}

/// Simple statements. These are the only statement forms that appear inside
/// basic blocks; branching constructs live in [`Tree`] and are dissolved into
/// edges during lowering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    Assign {
        target: ExprId,
        value: ExprId,
    },
    /// Writes the argument, or a newline when the argument is absent.
    BuiltInWrite {
        arg: Option<ExprId>,
    },
    /// A method call in statement position. Must reference an
    /// [`Expr::MethodCall`].
    Call(ExprId),
    Return(Option<ExprId>),
    Nop,
}

/// The structured statement tree handed over by semantic analysis, one per
/// method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Tree {
    Seq(Vec<Tree>),
    Stmt(StmtId),
    If {
        condition: ExprId,
        then: Box<Tree>,
        otherwise: Option<Box<Tree>>,
    },
    While {
        condition: ExprId,
        body: Box<Tree>,
    },
}

/// Per-method arena owning variables, statements, expressions and the root
/// statement tree. Blocks and analyses refer to nodes by id, never by
/// embedded node objects, so there is no shared mutable AST state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodBody {
    pub name: String,
    vars: Vec<Variable>,
    stmts: Vec<Stmt>,
    exprs: Vec<Expr>,
    root: Tree,
}

impl MethodBody {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            stmts: Vec::new(),
            exprs: Vec::new(),
            root: Tree::Seq(Vec::new()),
        }
    }

    pub fn new_var(&mut self, name: impl Into<String>, kind: VarKind) -> VarId {
        let id = VarId(self.vars.len() as u32);
        self.vars.push(Variable {
            id,
            name: name.into(),
            kind,
        });
        id
    }

    pub fn add_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    pub fn add_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn set_root(&mut self, root: Tree) {
        self.root = root;
    }

    pub fn root(&self) -> &Tree {
        &self.root
    }

    pub fn var(&self, id: VarId) -> &Variable {
        &self.vars[id.0 as usize]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    pub fn vars(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    /// Parameters and locals declared in this method, the universe that the
    /// dataflow analyses range over.
    pub fn tracked_vars(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter().filter(|v| v.kind != VarKind::Field)
    }

    /// Checks that the statement tree only references nodes of this arena and
    /// that statement operands have the expected shape.
    pub fn validate(&self) -> Result<(), IrError> {
        for (idx, stmt) in self.stmts.iter().enumerate() {
            match stmt {
                Stmt::Assign { target, .. } => match self.checked_expr(*target)? {
                    Expr::Var(_) | Expr::Field { .. } | Expr::Index { .. } => {}
                    other => {
                        return Err(IrError::MalformedBody(format!(
                            "assignment target of stmt{idx} is not an lvalue: {other:?}"
                        )))
                    }
                },
                Stmt::Call(call) => {
                    if !matches!(self.checked_expr(*call)?, Expr::MethodCall { .. }) {
                        return Err(IrError::MalformedBody(format!(
                            "call statement stmt{idx} does not reference a method call"
                        )));
                    }
                }
                Stmt::BuiltInWrite { .. } | Stmt::Return(_) | Stmt::Nop => {}
            }
        }
        self.validate_tree(&self.root)
    }

    fn validate_tree(&self, tree: &Tree) -> Result<(), IrError> {
        match tree {
            Tree::Seq(children) => {
                for child in children {
                    self.validate_tree(child)?;
                }
            }
            Tree::Stmt(id) => {
                if id.0 as usize >= self.stmts.len() {
                    return Err(IrError::MalformedBody(format!(
                        "tree references unknown statement {id}"
                    )));
                }
            }
            Tree::If {
                condition,
                then,
                otherwise,
            } => {
                self.checked_expr(*condition)?;
                self.validate_tree(then)?;
                if let Some(otherwise) = otherwise {
                    self.validate_tree(otherwise)?;
                }
            }
            Tree::While { condition, body } => {
                self.checked_expr(*condition)?;
                self.validate_tree(body)?;
            }
        }
        Ok(())
    }

    fn checked_expr(&self, id: ExprId) -> Result<&Expr, IrError> {
        self.exprs
            .get(id.0 as usize)
            .ok_or_else(|| IrError::MalformedBody(format!("unknown expression id {}", id.0)))
    }
}
