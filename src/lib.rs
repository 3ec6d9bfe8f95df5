//! A tiny command-driven language for generating plausible-looking log noise.
//!
//! A line of words is lexed into tokens, compiled into a tree of
//! [`Command`]s and then executed, printing lines and pausing along the way:
//!
//! - `sleep 100` pauses for 100 milliseconds;
//! - `for i to 10 do ... end` repeats its body 10 times;
//! - `random` prints a random pronounceable word;
//! - `i` prints the value of `i` inside a loop over `i`;
//! - any other word is printed as is.
//!
//! Compilation resolves every loop variable up front, so a program that
//! compiles always runs to completion. The main entry point is [`Interpreter`];
//! [`parser::compile`] and [`Interpreter::execute`] expose the two stages
//! separately.

pub mod command;
pub mod env;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod parser;
pub mod random;

pub use command::{Command, Program};
pub use interpreter::{DEFAULT_PROGRAM, Interpreter, program_line};
pub use parser::{CompileError, compile};
