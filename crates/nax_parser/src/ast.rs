use std::fmt::{self, Display};

use crate::token::Token;

/// An ordered sequence of top-level statements.
#[derive(Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Program {
        Program {
            statements: Vec::new(),
        }
    }
}

impl Default for Program {
    fn default() -> Program {
        Program::new()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .statements
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<String>>()
            .join(" ");

        write!(f, "{}", s)
    }
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Print(Expr),
    Var(VarStmt),
    Block(Vec<Stmt>),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Stmt::*;

        match self {
            Expression(expression) => write!(f, "{};", expression),
            Print(expression) => write!(f, "print {};", expression),
            Var(var) => write!(f, "{}", var),
            Block(statements) => {
                write!(f, "{{")?;
                for statement in statements {
                    write!(f, " {}", statement)?;
                }
                write!(f, " }}")
            }
            If(branch) => write!(f, "{}", branch),
            While(loop_) => write!(f, "{}", loop_),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct VarStmt {
    /// The name being declared
    pub name: Token,
    /// Declarations without an initializer start out as nil
    pub initializer: Option<Expr>,
}

impl Display for VarStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.initializer {
            Some(initializer) => write!(f, "var {} = {};", self.name.lexeme, initializer),
            None => write!(f, "var {};", self.name.lexeme),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Stmt,
    pub else_branch: Option<Stmt>,
}

impl Display for IfStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.then_branch)?;

        if let Some(else_branch) = &self.else_branch {
            write!(f, " else {}", else_branch)?;
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Stmt,
}

impl Display for WhileStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "while ({}) {}", self.condition, self.body)
    }
}

#[derive(Debug, PartialEq)]
pub enum Expr {
    Literal(LiteralValue),
    Grouping(Box<Expr>),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
    Logical(Box<LogicalExpr>),
    Variable(Token),
    Assign(Box<AssignExpr>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;

        match self {
            Literal(value) => write!(f, "{}", value),
            Grouping(inner) => write!(f, "({})", inner),
            Unary(unary) => write!(f, "{}", unary),
            Binary(binary) => write!(f, "{}", binary),
            Logical(logical) => write!(f, "{}", logical),
            Variable(name) => write!(f, "{}", name.lexeme),
            Assign(assign) => write!(f, "{}", assign),
        }
    }
}

/// A literal as it appears in the tree, before evaluation.
#[derive(Debug, PartialEq, Clone)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Nil,
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LiteralValue::*;

        match self {
            Number(value) => write!(f, "{}", value),
            String(value) => write!(f, "\"{}\"", value),
            Boolean(value) => write!(f, "{}", value),
            Nil => write!(f, "nil"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct UnaryExpr {
    pub operator: Token,
    pub right: Expr,
}

impl Display for UnaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({op}{r})", op = self.operator.lexeme, r = self.right)
    }
}

#[derive(Debug, PartialEq)]
pub struct BinaryExpr {
    pub left: Expr,
    pub operator: Token,
    pub right: Expr,
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({l} {op} {r})",
            l = self.left,
            op = self.operator.lexeme,
            r = self.right
        )
    }
}

/// `and`/`or`: kept separate from BinaryExpr because evaluation
/// short-circuits on the left operand.
#[derive(Debug, PartialEq)]
pub struct LogicalExpr {
    pub left: Expr,
    pub operator: Token,
    pub right: Expr,
}

impl Display for LogicalExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({l} {op} {r})",
            l = self.left,
            op = self.operator.lexeme,
            r = self.right
        )
    }
}

#[derive(Debug, PartialEq)]
pub struct AssignExpr {
    /// Only a bare variable reference is a legal target
    pub name: Token,
    pub value: Expr,
}

impl Display for AssignExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({l} = {r})", l = self.name.lexeme, r = self.value)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expr, LiteralValue, Program, Stmt, VarStmt};
    use crate::token::{Token, TokenKind};

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::Identifier, name.to_owned(), None, 1)
    }

    #[test]
    fn display_program() {
        let program = Program {
            statements: vec![
                Stmt::Var(VarStmt {
                    name: ident("answer"),
                    initializer: Some(Expr::Literal(LiteralValue::Number(42.0))),
                }),
                Stmt::Print(Expr::Variable(ident("answer"))),
            ],
        };

        assert_eq!(program.to_string(), "var answer = 42; print answer;");
    }

    #[test]
    fn display_block() {
        let block = Stmt::Block(vec![Stmt::Var(VarStmt {
            name: ident("a"),
            initializer: None,
        })]);

        assert_eq!(block.to_string(), "{ var a; }");
        assert_eq!(Stmt::Block(vec![]).to_string(), "{ }");
    }
}
