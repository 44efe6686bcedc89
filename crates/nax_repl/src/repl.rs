use std::cell::RefCell;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::Editor;

use nax_interpreter::{Environment, Interpreter, StdoutOutput};
use nax_parser::parser::Parser;
use nax_parser::report::ConsoleSink;
use nax_parser::scanner::Scanner;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn repl() {
    println!("nax v{}", VERSION);

    // One global scope shared across lines, so variables persist
    let env = Rc::new(RefCell::new(Environment::new()));
    let mut sink = ConsoleSink::new();
    let mut out = StdoutOutput;

    // `()` can be used when no completer is required
    let mut rl = Editor::<()>::new();
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                if line.trim() == "exit" || line.trim() == "quit" {
                    break;
                }
                // Skip empty lines
                else if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str());

                // A bad line must not poison the next one
                sink.reset();

                let tokens = Scanner::new(&line).scan_tokens(&mut sink);
                let program = Parser::new(&tokens, &mut sink).parse_program();
                if sink.had_error() {
                    continue;
                }

                let mut interpreter = Interpreter::with_env(Rc::clone(&env), &mut out);
                let _ = interpreter.interpret(&program.statements, &mut sink);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
}
