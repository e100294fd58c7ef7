//! Command-line questionnaire for a single respondent.

use crate::classifier::{classify_answers, Answer, StressLevel};
use crate::records::INTERACTIVE_QUESTIONS;
use log::debug;
use std::io::{self, BufRead, Write};

pub static NAME_PROMPT: &str = "Please enter your name: ";
pub static INTRO: &str = "Please answer the following questions (Yes/No):";
pub static REPROMPT: &str = "Please enter 'Yes' or 'No' as your response.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub name: String,
    pub answers: Vec<Answer>,
    pub level: StressLevel,
}

impl Prediction {
    pub fn message(&self) -> String {
        format!("{}, your predicted stress level is: {}", self.name, self.level)
    }
}

/// Blocking prompt loop over any line source, so it runs on stdin or on a test buffer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before all questions were answered",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn ask_name(&mut self) -> io::Result<String> {
        write!(self.output, "{NAME_PROMPT}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Ask until the reply parses as Yes or No.
    pub fn ask_answer(&mut self, question: &str) -> io::Result<Answer> {
        loop {
            write!(self.output, "{question} ")?;
            self.output.flush()?;
            let reply = self.read_line()?;
            match reply.parse::<Answer>() {
                Ok(answer) => return Ok(answer),
                Err(err) => {
                    debug!("rejected answer: {err}");
                    writeln!(self.output, "{REPROMPT}")?;
                }
            }
        }
    }

    pub fn collect(&mut self, questions: &[&str]) -> io::Result<Vec<Answer>> {
        writeln!(self.output, "{INTRO}")?;
        questions.iter().map(|q| self.ask_answer(q)).collect()
    }

    /// Name, then every question, then the classification of those answers.
    pub fn predict(&mut self) -> io::Result<Prediction> {
        let name = self.ask_name()?;
        let answers = self.collect(&INTERACTIVE_QUESTIONS)?;
        let level = classify_answers(&answers);
        let prediction = Prediction {
            name,
            answers,
            level,
        };
        writeln!(self.output, "{}", prediction.message())?;
        Ok(prediction)
    }
}

/// Run the questionnaire on the process's stdin and stdout.
pub fn predict_stress_level() -> io::Result<Prediction> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Prompter::new(stdin.lock(), stdout.lock()).predict()
}
