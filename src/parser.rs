use crate::command::{Command, Program};
use crate::lexer::{self, Keyword, Token};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Kind of numeric literal the compiler expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// A non-negative integer loop bound.
    Integer,
    /// A non-negative, finite sleep duration in milliseconds.
    Float,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Integer => write!(f, "a non-negative integer loop bound"),
            LiteralKind::Float => write!(f, "a non-negative duration in milliseconds"),
        }
    }
}

/// Errors that can occur while compiling tokens into a [`Program`].
///
/// Every error is fatal: nothing of the program has been executed when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A `for` loop binds a variable already bound by an enclosing loop.
    #[error("variable shadowing: `{0}` is already bound by an enclosing loop")]
    ShadowedVariable(String),
    /// A structurally required token is missing or wrong.
    #[error("expected {expected}, found `{found}`")]
    MalformedSyntax { expected: String, found: String },
    /// A loop bound or sleep duration is not a number of the required kind.
    #[error("cannot parse `{text}` as {kind}")]
    UnparsableLiteral { kind: LiteralKind, text: String },
    /// The token stream ended while more tokens were required.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String },
}

/// Recursive descent over a single forward cursor.
///
/// Nested loop bodies share the cursor; the loop variables in scope are
/// passed down each call instead.
struct Compiler {
    tokens: Vec<Token>,
    pos: usize,
}

impl Compiler {
    fn from(tokens: Vec<Token>) -> Self {
        Compiler { tokens, pos: 0 }
    }

    fn compile(mut self) -> Result<Program, CompileError> {
        // A stray top-level `end` stops compilation; whatever follows it is ignored.
        let commands = self.parse_block(&[])?;
        if self.pos < self.tokens.len() {
            debug!(ignored = self.tokens.len() - self.pos, "stopped at top-level `end`");
        }
        Ok(Program::new(commands))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token, failing when the input is exhausted.
    fn next(&mut self, expected: &str) -> Result<Token, CompileError> {
        self.consume()
            .ok_or_else(|| CompileError::UnexpectedEndOfInput {
                expected: expected.to_string(),
            })
    }

    fn expect(&mut self, keyword: Keyword) -> Result<(), CompileError> {
        let expected = format!("`{}`", keyword);
        match self.next(&expected)? {
            Token::Keyword(found) if found == keyword => Ok(()),
            token => Err(CompileError::MalformedSyntax {
                expected,
                found: token.to_string(),
            }),
        }
    }

    /// Parse commands until the input is exhausted or the next token is `end`.
    ///
    /// The `end` itself is left for the caller.
    fn parse_block(&mut self, scope: &[String]) -> Result<Vec<Command>, CompileError> {
        let mut commands = Vec::new();

        while let Some(token) = self.peek() {
            if *token == Token::Keyword(Keyword::End) {
                break;
            }
            commands.push(self.parse_command(scope)?);
        }

        Ok(commands)
    }

    fn parse_command(&mut self, scope: &[String]) -> Result<Command, CompileError> {
        match self.next("a command")? {
            Token::Keyword(Keyword::For) => self.parse_for(scope),
            Token::Keyword(Keyword::Sleep) => self.parse_sleep(),
            Token::Keyword(Keyword::Random) => Ok(Command::PrintRandomWord),
            Token::Keyword(keyword @ (Keyword::To | Keyword::Do)) => Ok(Command::PrintLiteral {
                text: keyword.as_str().to_string(),
            }),
            Token::Keyword(Keyword::End) => Err(CompileError::MalformedSyntax {
                expected: "a command".to_string(),
                found: Keyword::End.to_string(),
            }),
            Token::Word(word) => {
                if scope.contains(&word) {
                    Ok(Command::PrintVariable { variable: word })
                } else {
                    Ok(Command::PrintLiteral { text: word })
                }
            }
        }
    }

    /// Parse a loop: `for` (already consumed) var `to` bound `do` body `end`
    fn parse_for(&mut self, scope: &[String]) -> Result<Command, CompileError> {
        let variable = match self.next("a loop variable")? {
            Token::Word(word) => word,
            Token::Keyword(keyword) => {
                return Err(CompileError::MalformedSyntax {
                    expected: "a loop variable".to_string(),
                    found: keyword.to_string(),
                });
            }
        };
        if scope.contains(&variable) {
            return Err(CompileError::ShadowedVariable(variable));
        }

        self.expect(Keyword::To)?;
        let text = self.next("a loop bound")?;
        let bound = text
            .text()
            .parse::<u64>()
            .map_err(|_| CompileError::UnparsableLiteral {
                kind: LiteralKind::Integer,
                text: text.to_string(),
            })?;
        self.expect(Keyword::Do)?;

        let mut inner = scope.to_vec();
        inner.push(variable.clone());
        let body = self.parse_block(&inner)?;
        self.expect(Keyword::End)?;

        Ok(Command::ForLoop {
            variable,
            bound,
            body,
        })
    }

    /// Parse a pause: `sleep` (already consumed) milliseconds
    fn parse_sleep(&mut self) -> Result<Command, CompileError> {
        let text = self.next("a sleep duration")?;
        let unparsable = || CompileError::UnparsableLiteral {
            kind: LiteralKind::Float,
            text: text.to_string(),
        };

        let millis = text.text().parse::<f64>().map_err(|_| unparsable())?;
        if !millis.is_finite() || millis < 0.0 {
            return Err(unparsable());
        }
        // -0 renders as "-0"
        let millis = if millis == 0.0 { 0.0 } else { millis };
        let seconds = millis / 1000.0;
        if std::time::Duration::try_from_secs_f64(seconds).is_err() {
            return Err(unparsable());
        }

        Ok(Command::Sleep { seconds })
    }
}

/// Compiles a token sequence into a [`Program`].
///
/// Loop variables are resolved here, once: a word that names a variable bound
/// by an enclosing `for` becomes [`Command::PrintVariable`], any other word
/// becomes [`Command::PrintLiteral`].
///
/// Compilation stops at an `end` that closes no loop; the tokens after it are
/// not part of the program.
///
/// # Errors
///
/// Returns a [`CompileError`] on the first rule violation. No partial program
/// is produced.
pub fn compile(tokens: Vec<Token>) -> Result<Program, CompileError> {
    let program = Compiler::from(tokens).compile()?;
    debug!(commands = program.commands.len(), "compiled program");
    Ok(program)
}

/// Lexes and compiles one line of source text.
pub fn compile_line(line: &str) -> Result<Program, CompileError> {
    compile(lexer::split_into_tokens(line))
}
