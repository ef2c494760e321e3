use std::io::{BufRead, Write};

/// Seam between the gate/executor and the operator's terminal, so tests
/// can script answers instead of driving a TTY.
pub trait Prompter {
    /// Ask a yes/no question. Only "y"/"yes" (any case) counts as yes;
    /// anything else, including EOF, is no.
    fn confirm(&mut self, question: &str) -> bool;

    /// Read one raw line after showing `prompt`. Only the trailing newline
    /// is stripped; the rest of the line is returned byte-for-byte.
    /// `None` on EOF.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Prompter backed by the real stdin/stdout.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        print!("  {} [y/N] ", question);
        let _ = std::io::stdout().flush();

        let mut input = String::new();
        match std::io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => false,
            Ok(_) => {
                let answer = input.trim();
                answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();

        let mut input = String::new();
        match std::io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                // Keyword comparison is byte-exact, so strip only the line
                // terminator.
                if input.ends_with('\n') {
                    input.pop();
                    if input.ends_with('\r') {
                        input.pop();
                    }
                }
                Some(input)
            }
        }
    }
}
