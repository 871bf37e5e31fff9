//! Terminal answers for the expansion engine.
//!
//! With the `interactive` feature and a terminal on both stdin and stderr,
//! questions go through `dialoguer`; a choice question becomes a selection
//! list that `Esc` cancels. Otherwise questions are written to stderr and
//! answered line by line from stdin, which is what scripts and tests use.

use std::io::{self, BufRead, IsTerminal as _, Write};

use stencil_core::{
    application::{
        ApplicationError,
        ports::{Prompter, Question},
    },
    error::StencilResult,
};

/// [`Prompter`] reading from the process's stdin.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompter {
    #[cfg_attr(not(feature = "interactive"), allow(dead_code))]
    interactive: bool,
}

impl TerminalPrompter {
    /// Use the interactive front end when a terminal is attached.
    pub fn detect() -> Self {
        let interactive = cfg!(feature = "interactive")
            && io::stdin().is_terminal()
            && io::stderr().is_terminal();
        Self { interactive }
    }

    /// Always read plain lines from stdin.
    pub fn line_based() -> Self {
        Self { interactive: false }
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &Question) -> StencilResult<Option<String>> {
        #[cfg(feature = "interactive")]
        if self.interactive {
            return ask_interactive(question);
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stderr = io::stderr();
        ask_lines(question, &mut input, &mut stderr)
    }
}

/// Prompt text for line mode, e.g. `Project name [demo]: `.
fn prompt_text(question: &Question) -> String {
    let mut text = question.label.clone();
    if !question.choices.is_empty() {
        text.push_str(&format!(" ({})", question.choices.join(", ")));
    }
    if let Some(default) = &question.default {
        text.push_str(&format!(" [{default}]"));
    }
    text.push_str(": ");
    text
}

fn unavailable(question: &Question, reason: impl ToString) -> ApplicationError {
    ApplicationError::PromptUnavailable {
        question: question.key.clone(),
        reason: reason.to_string(),
    }
}

/// One question, one line. End of input is an error, not a cancel.
fn ask_lines(
    question: &Question,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> StencilResult<Option<String>> {
    output
        .write_all(prompt_text(question).as_bytes())
        .and_then(|()| output.flush())
        .map_err(|e| unavailable(question, e))?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| unavailable(question, e))?;
    if read == 0 {
        return Err(unavailable(question, "end of input").into());
    }

    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

#[cfg(feature = "interactive")]
fn ask_interactive(question: &Question) -> StencilResult<Option<String>> {
    use dialoguer::{Input, Select};

    if question.choices.is_empty() {
        let mut input = Input::<String>::new()
            .with_prompt(question.label.as_str())
            .allow_empty(true);
        if let Some(default) = &question.default {
            input = input.default(default.clone());
        }
        return input
            .interact_text()
            .map(Some)
            .map_err(|e| unavailable(question, e).into());
    }

    let default = question
        .default
        .as_ref()
        .and_then(|d| question.choices.iter().position(|c| c == d))
        .unwrap_or(0);

    let picked = Select::new()
        .with_prompt(question.label.as_str())
        .items(&question.choices)
        .default(default)
        .interact_opt()
        .map_err(|e| unavailable(question, e))?;

    Ok(picked.map(|index| question.choices[index].clone()))
}
