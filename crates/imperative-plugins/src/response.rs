use std::io::Write;

/// Where a command writes user-facing text.
pub trait ConsoleResponse {
    fn log(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Writes messages to stdout and errors to stderr.
#[derive(Debug, Default)]
pub struct StdResponse;

impl ConsoleResponse for StdResponse {
    fn log(&mut self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout is not worth failing the command over.
        let _ = writeln!(stdout, "{message}");
    }

    fn error(&mut self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{message}");
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    pub logs: Vec<String>,
    pub errors: Vec<String>,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsoleResponse for BufferedResponse {
    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
