use crate::token::Token;

/// Where scan, parse, and runtime problems get reported.
///
/// The caller decides what reporting means: the console for the command line
/// driver, a list for tests and embedders.
pub trait ErrorSink {
    /// A lexical or syntax error at a known line.
    fn error(&mut self, line: usize, message: &str);

    /// A runtime error carrying the offending token.
    fn runtime_error(&mut self, token: &Token, message: &str);
}

/// Reports to stderr and remembers whether anything went wrong, so the
/// driver can pick an exit code without any process-wide mutable state.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    had_error: bool,
    had_runtime_error: bool,
}

impl ConsoleSink {
    pub fn new() -> ConsoleSink {
        ConsoleSink::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clear the flags, e.g. between REPL lines.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }
}

impl ErrorSink for ConsoleSink {
    fn error(&mut self, line: usize, message: &str) {
        eprintln!("[line {}] Error: {}", line, message);
        self.had_error = true;
    }

    fn runtime_error(&mut self, token: &Token, message: &str) {
        eprintln!("{}\n[line {}]", message, token.line);
        self.had_runtime_error = true;
    }
}

/// Collects reports as (line, message) pairs instead of printing them.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub errors: Vec<(usize, String)>,
    pub runtime_errors: Vec<(usize, String)>,
}

impl CollectSink {
    pub fn new() -> CollectSink {
        CollectSink::default()
    }
}

impl ErrorSink for CollectSink {
    fn error(&mut self, line: usize, message: &str) {
        self.errors.push((line, message.to_owned()));
    }

    fn runtime_error(&mut self, token: &Token, message: &str) {
        self.runtime_errors.push((token.line, message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use crate::report::{CollectSink, ConsoleSink, ErrorSink};
    use crate::token::{Token, TokenKind};

    #[test]
    fn console_sink_tracks_flags() {
        let mut sink = ConsoleSink::new();
        assert!(!sink.had_error());
        assert!(!sink.had_runtime_error());

        sink.error(3, "Expect expression.");
        assert!(sink.had_error());
        assert!(!sink.had_runtime_error());

        let token = Token::new(TokenKind::Identifier, "x".to_owned(), None, 7);
        sink.runtime_error(&token, "Undefined variable 'x'.");
        assert!(sink.had_runtime_error());

        sink.reset();
        assert!(!sink.had_error());
        assert!(!sink.had_runtime_error());
    }

    #[test]
    fn collect_sink_records_lines() {
        let mut sink = CollectSink::new();
        sink.error(1, "Unexpected character '@'.");
        sink.error(4, "Expect ';' after value.");

        let token = Token::new(TokenKind::Plus, "+".to_owned(), None, 2);
        sink.runtime_error(&token, "Operands must be numbers.");

        assert_eq!(
            sink.errors,
            vec![
                (1, "Unexpected character '@'.".to_owned()),
                (4, "Expect ';' after value.".to_owned()),
            ]
        );
        assert_eq!(
            sink.runtime_errors,
            vec![(2, "Operands must be numbers.".to_owned())]
        );
    }
}
