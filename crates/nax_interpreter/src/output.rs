/// Where `print` statements write: one call per statement, one line each.
pub trait Output {
    fn print_line(&mut self, text: &str);
}

/// Writes to standard out; what the driver and the REPL use.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn print_line(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Collects printed lines instead of writing them, for tests and embedders.
#[derive(Debug, Default)]
pub struct BufferOutput {
    pub lines: Vec<String>,
}

impl BufferOutput {
    pub fn new() -> BufferOutput {
        BufferOutput::default()
    }
}

impl Output for BufferOutput {
    fn print_line(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}
