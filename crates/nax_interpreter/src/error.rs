use std::fmt::Display;

use nax_parser::token::Token;

/// A fatal evaluation failure. Carries the offending token so the report
/// can name the line it happened on.
#[derive(Debug, PartialEq)]
pub enum RuntimeError {
    /// Unary '-' applied to something that is not a number
    NumberOperand(Token),
    /// A binary arithmetic or comparison operator applied to non-numbers
    NumberOperands(Token),
    /// '+' applied to anything but two numbers or two strings
    AddOperands(Token),
    /// A name bound in no reachable scope
    UndefinedVariable(Token),
}

impl RuntimeError {
    pub fn token(&self) -> &Token {
        match self {
            RuntimeError::NumberOperand(token) => token,
            RuntimeError::NumberOperands(token) => token,
            RuntimeError::AddOperands(token) => token,
            RuntimeError::UndefinedVariable(token) => token,
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::NumberOperand(_) => write!(f, "Operand must be a number."),
            RuntimeError::NumberOperands(_) => write!(f, "Operands must be numbers."),
            RuntimeError::AddOperands(_) => {
                write!(f, "Operand must be two numbers or two strings.")
            }
            RuntimeError::UndefinedVariable(token) => {
                write!(f, "Undefined variable '{}'.", token.lexeme)
            }
        }
    }
}
