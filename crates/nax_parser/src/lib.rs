pub mod ast;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod token;
