use std::{cell::RefCell, rc::Rc};

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::object::Object;
use crate::output::Output;

use nax_parser::ast::{Expr, LogicalExpr, Stmt};
use nax_parser::report::ErrorSink;
use nax_parser::token::{Token, TokenKind};

type EvalResult = Result<Rc<Object>, RuntimeError>;

/// Walks statement and expression trees directly. Control flow is plain
/// recursion; the call stack doubles as the control-flow stack.
pub struct Interpreter<'a> {
    env: Rc<RefCell<Environment>>,
    out: &'a mut dyn Output,
}

impl<'a> Interpreter<'a> {
    pub fn new(out: &'a mut dyn Output) -> Self {
        Self::with_env(Rc::new(RefCell::new(Environment::new())), out)
    }

    /// Run against an existing global scope, e.g. to keep one environment
    /// alive across REPL lines.
    pub fn with_env(env: Rc<RefCell<Environment>>, out: &'a mut dyn Output) -> Self {
        Interpreter { env, out }
    }

    /// Execute the statements in order. The first runtime error is reported
    /// once through the sink and returned; the remaining statements are
    /// abandoned. Everything printed before the failure stays printed.
    pub fn interpret(
        &mut self,
        statements: &[Stmt],
        errors: &mut dyn ErrorSink,
    ) -> Result<(), RuntimeError> {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                errors.runtime_error(error.token(), &error.to_string());
                return Err(error);
            }
        }

        Ok(())
    }

    fn execute(&mut self, statement: &Stmt) -> Result<(), RuntimeError> {
        match statement {
            Stmt::Expression(expression) => {
                self.evaluate(expression)?;
                Ok(())
            }
            Stmt::Print(expression) => {
                let value = self.evaluate(expression)?;
                self.out.print_line(&value.to_string());
                Ok(())
            }
            Stmt::Var(var) => {
                let value = match &var.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Rc::new(Object::Nil),
                };
                self.env.borrow_mut().define(var.name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(statements) => {
                let enclosed = Environment::new_enclosed(Rc::clone(&self.env));
                self.execute_block(statements, enclosed)
            }
            Stmt::If(branch) => {
                if self.evaluate(&branch.condition)?.is_truthy() {
                    self.execute(&branch.then_branch)
                } else if let Some(else_branch) = &branch.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While(loop_) => {
                while self.evaluate(&loop_.condition)?.is_truthy() {
                    self.execute(&loop_.body)?;
                }
                Ok(())
            }
        }
    }

    /// Swap in the block's child environment for the duration of its
    /// statements and restore the enclosing one on every exit path.
    fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Environment,
    ) -> Result<(), RuntimeError> {
        let previous = Rc::clone(&self.env);
        self.env = Rc::new(RefCell::new(environment));

        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        self.env = previous;
        result
    }

    fn evaluate(&mut self, expression: &Expr) -> EvalResult {
        match expression {
            Expr::Literal(value) => Ok(Rc::new(Object::from(value))),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Variable(name) => self.env.borrow().get(name),
            Expr::Assign(assign) => {
                let value = self.evaluate(&assign.value)?;
                self.env
                    .borrow_mut()
                    .assign(&assign.name, Rc::clone(&value))?;
                // An assignment expression evaluates to the assigned value
                Ok(value)
            }
            Expr::Unary(unary) => {
                let right = self.evaluate(&unary.right)?;
                eval_unary(&unary.operator, right)
            }
            Expr::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                eval_binary(&binary.operator, left, right)
            }
            Expr::Logical(logical) => self.eval_logical(logical),
        }
    }

    fn eval_logical(&mut self, logical: &LogicalExpr) -> EvalResult {
        let left = self.evaluate(&logical.left)?;

        // Short circuit: the left operand alone may decide the result, in
        // which case the right operand is never evaluated
        let decided = match logical.operator.kind {
            TokenKind::Or => left.is_truthy(),
            TokenKind::And => !left.is_truthy(),
            // NOTE: the parser only builds logical nodes for `and` and `or`
            _ => panic!("unknown logical operator {}", logical.operator.lexeme),
        };

        if decided {
            Ok(left)
        } else {
            self.evaluate(&logical.right)
        }
    }
}

fn eval_unary(operator: &Token, right: Rc<Object>) -> EvalResult {
    match operator.kind {
        TokenKind::Bang => Ok(Rc::new(Object::Boolean(!right.is_truthy()))),
        TokenKind::Minus => match *right {
            Object::Number(value) => Ok(Rc::new(Object::Number(-value))),
            _ => Err(RuntimeError::NumberOperand(operator.clone())),
        },
        // NOTE: the parser only builds unary nodes for ! and -
        _ => panic!("unknown unary operator {}", operator.lexeme),
    }
}

fn eval_binary(operator: &Token, left: Rc<Object>, right: Rc<Object>) -> EvalResult {
    match operator.kind {
        TokenKind::EqualEqual => Ok(Rc::new(Object::Boolean(left == right))),
        TokenKind::BangEqual => Ok(Rc::new(Object::Boolean(left != right))),

        // '+' is overloaded: numeric addition or string concatenation
        TokenKind::Plus => match (left.as_ref(), right.as_ref()) {
            (Object::Number(l), Object::Number(r)) => Ok(Rc::new(Object::Number(l + r))),
            (Object::String(l), Object::String(r)) => {
                Ok(Rc::new(Object::String(format!("{}{}", l, r))))
            }
            _ => Err(RuntimeError::AddOperands(operator.clone())),
        },

        // Everything else wants two numbers
        _ => {
            let (l, r) = match (left.as_ref(), right.as_ref()) {
                (Object::Number(l), Object::Number(r)) => (*l, *r),
                _ => return Err(RuntimeError::NumberOperands(operator.clone())),
            };

            let value = match operator.kind {
                TokenKind::Minus => Object::Number(l - r),
                TokenKind::Slash => Object::Number(l / r),
                TokenKind::Star => Object::Number(l * r),
                TokenKind::Greater => Object::Boolean(l > r),
                TokenKind::GreaterEqual => Object::Boolean(l >= r),
                TokenKind::Less => Object::Boolean(l < r),
                TokenKind::LessEqual => Object::Boolean(l <= r),
                // NOTE: the parser only builds binary nodes for the operators above
                _ => panic!("unknown binary operator {}", operator.lexeme),
            };

            Ok(Rc::new(value))
        }
    }
}
