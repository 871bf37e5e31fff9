//! Non-interactive prompter.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use stencil_core::{
    application::{
        ApplicationError,
        ports::{Prompter, Question},
    },
    error::StencilResult,
};
use tracing::debug;

/// Answers questions from a fixed script.
///
/// Each question consumes one entry. `None` entries cancel. Once the script
/// is exhausted every question fails, so a missing answer can never loop.
/// Clones share the script and the record of asked questions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    state: Arc<Mutex<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    answers: VecDeque<Option<String>>,
    asked: Vec<Question>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompter = Self::default();
        for answer in answers {
            prompter.push(answer);
        }
        prompter
    }

    /// A prompter with no answers at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&self, answer: impl Into<String>) {
        self.lock().answers.push_back(Some(answer.into()));
    }

    /// Queue a cancellation.
    pub fn push_cancel(&self) {
        self.lock().answers.push_back(None);
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> Vec<Question> {
        self.lock().asked.clone()
    }

    pub fn remaining(&self) -> usize {
        self.lock().answers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &Question) -> StencilResult<Option<String>> {
        let mut state = self.lock();
        state.asked.push(question.clone());
        match state.answers.pop_front() {
            Some(answer) => {
                debug!(key = %question.key, ?answer, "scripted answer");
                Ok(answer)
            }
            None => Err(ApplicationError::PromptUnavailable {
                question: question.label.clone(),
                reason: "no scripted answer left".into(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_in_order_then_fails() {
        let prompter = ScriptedPrompter::new(["first", "second"]);
        let q = Question::new("k", "Key");

        assert_eq!(prompter.ask(&q).unwrap().as_deref(), Some("first"));
        assert_eq!(prompter.ask(&q).unwrap().as_deref(), Some("second"));
        assert!(prompter.ask(&q).is_err());
        assert_eq!(prompter.asked().len(), 3);
    }

    #[test]
    fn cancellation_is_scriptable() {
        let prompter = ScriptedPrompter::empty();
        prompter.push_cancel();
        assert_eq!(prompter.ask(&Question::new("k", "Key")).unwrap(), None);
    }
}
