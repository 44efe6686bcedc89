mod environment;
mod error;
mod interpreter;
pub mod object;
pub mod output;

pub use environment::Environment;
pub use error::RuntimeError;
pub use interpreter::Interpreter;
pub use output::{BufferOutput, Output, StdoutOutput};
