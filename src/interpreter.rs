use crate::command::{Command, Program};
use crate::env::Environment;
use crate::io_adapters::{Sleeper, ThreadSleeper};
use crate::{lexer, parser};
use crate::random::random_word;
use anyhow::Context;
use rand::Rng;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::fmt::Display;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, trace};

/// Program run when no source words are given: one random word every 10 ms.
pub const DEFAULT_PROGRAM: &str = "for i to 10000 do random sleep 10 end";

/// Source line for command-line `words`.
///
/// The words are joined with spaces; when nothing but whitespace is left,
/// [`DEFAULT_PROGRAM`] runs instead.
pub fn program_line<S: AsRef<str>>(words: &[S]) -> String {
    let line = lexer::join_args(words);
    if line.trim().is_empty() {
        debug!("no program given, running the default one");
        DEFAULT_PROGRAM.to_string()
    } else {
        line
    }
}

/// A tree-walking interpreter for compiled programs.
///
/// The interpreter owns everything a program can touch: the random source
/// used by `random`, the output every line is written to, and the
/// [`Sleeper`] that carries out `sleep`. Evaluation is single-threaded and
/// strictly in program order; every line is flushed as soon as it is written.
///
/// Example
/// ```
/// use babble::Interpreter;
/// use babble::io_adapters::{MemWriter, RecordingSleeper};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let (out, handle) = MemWriter::with_handle();
/// let mut interp = Interpreter::new(ChaCha8Rng::seed_from_u64(1))
///     .with_output(out)
///     .with_sleeper(RecordingSleeper::new())
///     .show_tree(false);
/// interp.run("for i to 3 do i end").unwrap();
/// assert_eq!(MemWriter::lines(&handle), vec!["1", "2", "3"]);
/// ```
pub struct Interpreter<R> {
    rng: R,
    stdout: Box<dyn Write>,
    sleeper: Box<dyn Sleeper>,
    show_tree: bool,
}

impl<R: Rng> Interpreter<R> {
    /// Create an interpreter writing to standard output and sleeping on the current thread.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            stdout: Box::new(std::io::stdout()),
            sleeper: Box::new(ThreadSleeper),
            show_tree: true,
        }
    }

    /// Replace the output sink.
    pub fn with_output(mut self, stdout: impl Write + 'static) -> Self {
        self.stdout = Box::new(stdout);
        self
    }

    /// Replace the way pauses are carried out.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Whether the compiled tree is printed before a program runs. On by default.
    pub fn show_tree(mut self, show: bool) -> Self {
        self.show_tree = show;
        self
    }

    /// Compile and run one line of source text.
    ///
    /// Nothing is written when the line fails to compile; the returned error
    /// then wraps a [`parser::CompileError`].
    pub fn run(&mut self, line: &str) -> anyhow::Result<()> {
        let program = parser::compile_line(line)?;
        self.run_program(&program)
    }

    /// Print the tree (if enabled) and execute `program` in a fresh root environment.
    pub fn run_program(&mut self, program: &Program) -> anyhow::Result<()> {
        if self.show_tree {
            self.print_line(program)?;
        }
        self.execute(&program.commands, &Environment::new())
    }

    /// Execute `commands` in order against `env`.
    ///
    /// Loop bodies recurse with a child environment per iteration. Variables
    /// are not looked up defensively: the compiler only emits
    /// [`Command::PrintVariable`] for names bound by an enclosing loop.
    ///
    /// # Panics
    ///
    /// Trees from [`parser::compile`] never panic. A hand-built tree panics
    /// when a [`Command::PrintVariable`] names a variable no enclosing loop
    /// binds, or when a [`Command::Sleep`] holds a negative, non-finite or
    /// overflowing `seconds` value.
    pub fn execute(&mut self, commands: &[Command], env: &Environment) -> anyhow::Result<()> {
        for command in commands {
            match command {
                Command::ForLoop {
                    variable,
                    bound,
                    body,
                } => {
                    for iteration in 1..=*bound {
                        trace!(%variable, iteration, "loop iteration");
                        let frame = env.with_binding(variable.as_str(), iteration);
                        self.execute(body, &frame)?;
                    }
                }
                Command::Sleep { seconds } => {
                    trace!(seconds, "sleep");
                    self.sleeper.sleep(Duration::from_secs_f64(*seconds));
                }
                Command::PrintRandomWord => {
                    let word = random_word(&mut self.rng);
                    self.print_line(word)?;
                }
                Command::PrintVariable { variable } => {
                    self.print_line(env.resolved(variable))?;
                }
                Command::PrintLiteral { text } => {
                    self.print_line(text)?;
                }
            }
        }
        Ok(())
    }

    fn print_line(&mut self, line: impl Display) -> anyhow::Result<()> {
        writeln!(self.stdout, "{}", line).context("failed to write output")?;
        self.stdout.flush().context("failed to flush output")?;
        Ok(())
    }

    /// Read-Eval-Print Loop: every line entered is compiled and run on its own.
    ///
    /// Compile errors are reported and the loop goes on; Ctrl-C and Ctrl-D leave it.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline("babble> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    if let Err(err) = self.run(&line) {
                        eprintln!("error: {:#}", err);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::{MemWriter, RecordingSleeper};
    use crate::parser::CompileError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn interpreter() -> (Interpreter<ChaCha8Rng>, Rc<RefCell<Vec<u8>>>) {
        let (out, handle) = MemWriter::with_handle();
        let interp = Interpreter::new(ChaCha8Rng::seed_from_u64(0))
            .with_output(out)
            .with_sleeper(RecordingSleeper::sharing(handle.clone()));
        (interp, handle)
    }

    fn run_quiet(line: &str) -> Vec<String> {
        let (interp, handle) = interpreter();
        interp.show_tree(false).run(line).unwrap();
        MemWriter::lines(&handle)
    }

    #[test]
    fn test_literal_with_tree_dump() {
        let (mut interp, handle) = interpreter();
        interp.run("abc").unwrap();
        assert_eq!(MemWriter::lines(&handle), vec!["(PrintLiteral \"abc\")", "abc"]);
    }

    #[test]
    fn test_loop_prints_iterations() {
        assert_eq!(run_quiet("for i to 3 do i end"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_nested_loops_run_depth_first() {
        assert_eq!(
            run_quiet("for i to 2 do for j to 2 do i j end end"),
            vec!["1", "1", "1", "2", "2", "1", "2", "2"]
        );
    }

    #[test]
    fn test_zero_bound_skips_body() {
        assert_eq!(
            run_quiet("before for x to 0 do x random sleep 5 end after"),
            vec!["before", "after"]
        );
    }

    #[test]
    fn test_same_token_inside_and_outside_scope() {
        assert_eq!(run_quiet("i for i to 2 do i end i"), vec!["i", "1", "2", "i"]);
    }

    #[test]
    fn test_sibling_loops_reuse_name() {
        assert_eq!(
            run_quiet("for i to 1 do i end for i to 2 do i end"),
            vec!["1", "1", "2"]
        );
    }

    #[test]
    fn test_sleeps_are_interleaved_in_order() {
        let lines = run_quiet("for i to 2 do sleep 5 i end");
        assert_eq!(lines, vec!["sleep 0.005", "1", "sleep 0.005", "2"]);
    }

    #[test]
    fn test_random_words_use_the_rng() {
        let first = run_quiet("random random random");
        let second = run_quiet("random random random");
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let expected: Vec<String> = (0..3).map(|_| random_word(&mut rng)).collect();
        assert_eq!(first, expected);
    }

    #[test]
    fn test_compile_error_produces_no_output() {
        let (mut interp, handle) = interpreter();
        let err = interp.run("abc for i 3 do end").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CompileError>(),
            Some(CompileError::MalformedSyntax { .. })
        ));
        assert!(handle.borrow().is_empty());
    }

    #[test]
    fn test_resolved_variables_are_bound_at_run_time() {
        // every PrintVariable must find its name in the frame it runs in
        fn check(commands: &[Command], env: &Environment) {
            for command in commands {
                match command {
                    Command::ForLoop { variable, body, .. } => {
                        check(body, &env.with_binding(variable.as_str(), 1));
                    }
                    Command::PrintVariable { variable } => {
                        assert!(env.get_var(variable).is_some(), "unbound {}", variable);
                    }
                    _ => {}
                }
            }
        }

        let line = "for a to 1 do a for b to 1 do a b c end b for c to 1 do c a end end a";
        let program = parser::compile_line(line).unwrap();
        check(&program.commands, &Environment::new());
    }

    #[test]
    fn test_program_line_falls_back_to_default() {
        assert_eq!(program_line::<&str>(&[]), DEFAULT_PROGRAM);
        assert_eq!(program_line(&["", "  "]), DEFAULT_PROGRAM);
        assert_eq!(program_line(&["\t"]), DEFAULT_PROGRAM);
        assert_eq!(program_line(&["For", "i", "to", "2", "do", "i", "end"]), "For i to 2 do i end");
    }

    #[test]
    #[should_panic]
    fn test_hand_built_unbound_variable_panics() {
        let (mut interp, _) = interpreter();
        let commands = vec![Command::PrintVariable {
            variable: "i".to_string(),
        }];
        let _ = interp.execute(&commands, &Environment::new());
    }

    #[test]
    #[should_panic]
    fn test_hand_built_negative_sleep_panics() {
        let (mut interp, _) = interpreter();
        let commands = vec![Command::Sleep { seconds: -1.0 }];
        let _ = interp.execute(&commands, &Environment::new());
    }

    #[test]
    fn test_default_program_compiles() {
        let program = parser::compile_line(DEFAULT_PROGRAM).unwrap();
        assert_eq!(
            program.to_string(),
            "(ForLoop i 10000 (PrintRandomWord) (Sleep 0.01))"
        );
    }
}
