use argh::FromArgs;
use babble::{Interpreter, program_line};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::process::ExitCode;

#[derive(FromArgs)]
/// Compile a babble program from the command line and run it.
///
/// `sleep 100` pauses for 100 ms, `for i to 10 do ... end` repeats its body,
/// `random` prints a random word, anything else is printed as is.
struct Args {
    #[argh(option)]
    /// seed for the random word generator; random words differ on every run when omitted.
    seed: Option<u64>,

    #[argh(switch, short = 'q')]
    /// do not print the compiled tree before running.
    quiet: bool,

    #[argh(switch, short = 'i')]
    /// read programs line by line from an interactive prompt.
    interactive: bool,

    #[argh(positional, greedy)]
    /// program words; defaults to an endless-looking stream of random words.
    words: Vec<String>,
}

/// Log to stderr, and only when RUST_LOG is set, so program output stays clean.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args: Args = argh::from_env();

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut interp = Interpreter::new(rng).show_tree(!args.quiet);

    if args.interactive {
        return match interp.repl() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        };
    }

    match interp.run(&program_line(&args.words)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
