//! The `adaptest run` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::engine::{Session, SessionOutcome, SessionState};
use adaptest_core::error::CatResult;
use adaptest_core::input::{
    parse_choice, AnswerInput, AnswerSource, InvalidAnswer, ValidatedAnswers,
};
use adaptest_core::model::{AdministeredRecord, Item};
use adaptest_core::traits::Presenter;

/// Prints the quiz transcript to stdout.
struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn present_item(&self, _round: usize, item: &Item) {
        println!("{}", item.prompt());
        for (idx, option) in item.options().iter().enumerate() {
            println!("  {}. {option}", idx + 1);
        }
    }

    fn theta_updated(
        &self,
        _round: usize,
        _record: &AdministeredRecord<'_>,
        theta: f64,
        _standard_error: Option<f64>,
    ) {
        println!("Updated ability estimate (theta): {theta:.3}\n");
    }

    fn finished(&self, outcome: &SessionOutcome) {
        if outcome.state == SessionState::Exhausted {
            println!("No more items to ask.");
        }
        println!(
            "Test finished. Final estimated ability (theta): {:.3}",
            outcome.theta
        );
    }
}

/// Reads one answer per line, prompting on `output`.
struct LineAnswers<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> AnswerSource for LineAnswers<R, W> {
    fn read_answer(&mut self, item: &Item) -> CatResult<Option<AnswerInput>> {
        let option_count = item.options().len();
        write!(self.output, "Your answer (1-{option_count}): ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // Keep the transcript tidy when stdin closes mid-prompt.
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(parse_choice(&line, option_count)))
    }

    fn reject(&mut self, _item: &Item, reason: &InvalidAnswer) {
        // A broken stdout surfaces on the next prompt.
        let _ = writeln!(self.output, "{reason}");
    }
}

pub fn execute(
    bank_path: Option<PathBuf>,
    max_items: Option<usize>,
    max_attempts: Option<u32>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let (config, bank) = super::prepare(config_path, bank_path, max_items, max_attempts)?;

    let stdin = std::io::stdin();
    let source = LineAnswers {
        input: stdin.lock(),
        output: std::io::stdout(),
    };
    let mut answers = ValidatedAnswers::new(source, config.retry_policy());

    let mut session = Session::new(&bank, config.session_config());
    session.run(&mut answers, &ConsolePresenter)?;

    if json {
        println!("{}", session.report().to_json()?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptest_core::parser::builtin_bank;

    #[test]
    fn line_answers_prompt_and_parse() {
        let bank = builtin_bank().unwrap();
        let item = bank.get(1).unwrap();
        let mut source = LineAnswers {
            input: "3\nabc\n".as_bytes(),
            output: Vec::new(),
        };

        assert_eq!(source.read_answer(item).unwrap(), Some(AnswerInput::Valid(2)));
        assert!(matches!(
            source.read_answer(item).unwrap(),
            Some(AnswerInput::Invalid(InvalidAnswer::NotANumber { .. }))
        ));
        assert_eq!(source.read_answer(item).unwrap(), None);

        let transcript = String::from_utf8(source.output).unwrap();
        assert_eq!(transcript.matches("Your answer (1-4): ").count(), 3);
    }

    #[test]
    fn rejection_message_is_written() {
        let bank = builtin_bank().unwrap();
        let item = bank.get(2).unwrap();
        let mut source = LineAnswers {
            input: "".as_bytes(),
            output: Vec::new(),
        };
        source.reject(
            item,
            &InvalidAnswer::OutOfRange {
                choice: 7,
                option_count: 4,
            },
        );
        let transcript = String::from_utf8(source.output).unwrap();
        assert_eq!(transcript, "Please enter a number from 1 to 4.\n");
    }
}
