pub mod environment;
pub mod error;
pub mod interpreter;

pub use error::RuntimeError;
pub use interpreter::{Interpreter, InterpreterOptions};
