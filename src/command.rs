use std::fmt;

/// A compiled program node.
///
/// The tree is built once by [`crate::parser::compile`] and never changes
/// afterwards. Variable references are resolved while compiling: a
/// [`Command::PrintVariable`] always names a variable bound by an enclosing
/// [`Command::ForLoop`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Runs `body` once for every value `1..=bound` of `variable`.
    ForLoop {
        /// Name of the loop variable.
        variable: String,
        /// Inclusive upper bound. Zero runs the body zero times.
        bound: u64,
        /// Commands executed on each iteration.
        body: Vec<Command>,
    },
    /// Blocks for `seconds` of wall-clock time.
    Sleep {
        /// Non-negative, finite duration.
        seconds: f64,
    },
    /// Prints one random pseudo-word.
    PrintRandomWord,
    /// Prints the current value of a loop variable.
    PrintVariable {
        /// Name of a variable bound by an enclosing loop.
        variable: String,
    },
    /// Prints the text as is.
    PrintLiteral {
        /// Raw token text.
        text: String,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ForLoop {
                variable,
                bound,
                body,
            } => {
                write!(f, "(ForLoop {} {}", variable, bound)?;
                for command in body {
                    write!(f, " {}", command)?;
                }
                write!(f, ")")
            }
            Command::Sleep { seconds } => write!(f, "(Sleep {})", seconds),
            Command::PrintRandomWord => write!(f, "(PrintRandomWord)"),
            Command::PrintVariable { variable } => write!(f, "(PrintVariable {})", variable),
            Command::PrintLiteral { text } => write!(f, "(PrintLiteral {:?})", text),
        }
    }
}

/// The top-level command sequence of a compiled program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub commands: Vec<Command>,
}

impl Program {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Renders the structural dump printed before a program runs.
///
/// Top-level commands are separated by single spaces; an empty program is `()`.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.commands.is_empty() {
            return write!(f, "()");
        }
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}
