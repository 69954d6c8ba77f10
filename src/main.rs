use std::fs;
use std::path::PathBuf;

use clap::Parser;

use fvma::labels::populate;
use fvma::lexer::tokenize;
use fvma::parser::emit;

/// Assembler for the Fox Virtual Machine.
#[derive(Parser)]
#[command(name = "fvma", about = "Assemble Fox VM source into a ROM image")]
struct Cli {
    /// Source file to assemble (.fa)
    input: PathBuf,

    /// ROM image to write (defaults to a.fb)
    output: Option<PathBuf>,
}

const EXIT_BAD_ARGS: i32 = 1;
const EXIT_MISSING_INPUT: i32 = 2;
const EXIT_ALLOC_FAILURE: i32 = 3;

fn main() {
    env_logger::init();

    // clap's own arg-count diagnostics exit with code 2; the contract here
    // wants wrong-arg-count (and a bad output name) to exit 1, so parse
    // errors are handled by hand instead of letting clap call process::exit.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(EXIT_BAD_ARGS);
        }
    };

    let output = cli.output.unwrap_or_else(|| PathBuf::from("a.fb"));
    if output.extension().and_then(|ext| ext.to_str()) != Some("fb") {
        eprintln!("fvma: output filename must end with .fb");
        std::process::exit(EXIT_BAD_ARGS);
    }

    let source = fs::read_to_string(&cli.input).unwrap_or_else(|err| {
        eprintln!("fvma: cannot open {}: {}", cli.input.display(), err);
        std::process::exit(EXIT_MISSING_INPUT);
    });

    let mut lexed = tokenize(&source);
    let (table, label_errors) = populate(&mut lexed.tokens);
    let lex_errors = std::mem::take(&mut lexed.errors);
    let result = emit(&lexed.tokens, &table);

    let mut raised = false;
    for err in lex_errors.iter().chain(&label_errors).chain(&result.errors) {
        eprintln!("fvma: {err}");
        raised = true;
    }

    if raised {
        log::warn!("assembly raised errors; {} not written", output.display());
        return;
    }

    let bytes: Vec<u8> = result.words.iter().flat_map(|w| w.to_ne_bytes()).collect();
    if fs::write(&output, &bytes).is_err() {
        eprintln!("fvma: failed to write {}", output.display());
        std::process::exit(EXIT_ALLOC_FAILURE);
    }

    log::info!("wrote {} words to {}", result.words.len(), output.display());
}
