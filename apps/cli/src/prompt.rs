//! Line-oriented prompts for the operator.
//!
//! Generic over reader and writer so tests can script a whole session.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{CliError, CliResult};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Asks once and returns the trimmed answer.
    pub fn ask_text(&mut self, label: &str) -> CliResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed {
                field: label.trim().trim_end_matches(':').to_string(),
            });
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the answer parses as `T`.
    pub fn ask_parsed<T: FromStr>(&mut self, label: &str) -> CliResult<T> {
        loop {
            let answer = self.ask_text(label)?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => {
                    writeln!(self.output, "Valor inválido: {:?}. Intente nuevamente.", answer)?
                }
            }
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reprompts_until_number() {
        let mut prompter = Prompter::new(Cursor::new("abc\n\n5.25\n"), Vec::new());

        let value: f64 = prompter.ask_parsed("Cotización: ").unwrap();

        assert_eq!(value, 5.25);
        let shown = String::from_utf8(prompter.output().clone()).unwrap();
        assert_eq!(shown.matches("Cotización: ").count(), 3);
        assert!(shown.contains("Valor inválido: \"abc\""));
    }

    #[test]
    fn test_eof_is_input_closed() {
        let mut prompter = Prompter::new(Cursor::new(""), Vec::new());

        let err = prompter.ask_text("Apellido: ").unwrap_err();
        assert!(matches!(err, CliError::InputClosed { field } if field == "Apellido"));
    }
}
