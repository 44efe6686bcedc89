mod repl;

use std::{env, fs, process};

use nax_interpreter::{Interpreter, StdoutOutput};
use nax_parser::parser::Parser;
use nax_parser::report::ConsoleSink;
use nax_parser::scanner::Scanner;

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl::repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: nax [script]");
            process::exit(64);
        }
    }
}

fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Could not read {}: {}", path, error);
            process::exit(74);
        }
    };

    let mut sink = ConsoleSink::new();
    let tokens = Scanner::new(&source).scan_tokens(&mut sink);
    let program = Parser::new(&tokens, &mut sink).parse_program();

    // Never run a program that did not parse cleanly
    if sink.had_error() {
        process::exit(65);
    }

    let mut out = StdoutOutput;
    let mut interpreter = Interpreter::new(&mut out);
    if interpreter.interpret(&program.statements, &mut sink).is_err() {
        process::exit(70);
    }
}
