use clap::Parser;
use console::style;
use ember::builtin_functions::default_builtin_vars;
use ember::{eval_line, parse_program, run_program, Error};
use ember_eval::{Interpreter, InterpreterOptions};
use ember_parser::printer::print_decls;
use ember_value::Value;
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source file to run. Starts a REPL when omitted.
    file: Option<PathBuf>,

    /// Print the syntax tree of the file instead of running it
    #[arg(long)]
    ast: bool,

    /// Log parser and interpreter activity (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Maximum depth of nested function calls
    #[arg(long, default_value_t = InterpreterOptions::default().max_call_depth)]
    max_call_depth: usize,
}

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let options = InterpreterOptions {
        max_call_depth: args.max_call_depth,
    };
    let result = match &args.file {
        Some(path) => run_file(path, args.ast, options),
        None => repl(options),
    };

    if let Err(err) = result {
        report(&err);
        process::exit(1);
    }
}

fn run_file(path: &Path, ast: bool, options: InterpreterOptions) -> Result<(), Error> {
    info!("running {}", path.display());
    let source = fs::read_to_string(path)?;

    if ast {
        let decls = parse_program(&source)?;
        print!("{}", print_decls(&decls));
        return Ok(());
    }

    match run_program(&source, options)? {
        Value::Unit => {}
        value => println!("{}", value),
    }
    Ok(())
}

fn repl(options: InterpreterOptions) -> Result<(), Error> {
    info!("starting repl");
    let mut interpreter = Interpreter::new(&default_builtin_vars(), options);
    let mut stdout = io::stdout();
    let stdin = io::stdin();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            println!();
            return Ok(());
        }

        match eval_line(&mut interpreter, &input) {
            Ok(Value::Unit) => {}
            Ok(value) => println!("{}", value),
            Err(err) => report(&err),
        }
    }
}

fn report(err: &Error) {
    let label = style("ERROR:").red().bold();
    match err {
        Error::Syntax(errors) => {
            for err in errors {
                eprintln!("{} {}", label, err);
            }
        }
        err => eprintln!("{} {}", label, err),
    }
}
