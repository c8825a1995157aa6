//! Ordered rule chain that turns a message into a reply
//!
//! Rules are tried top to bottom and the first one that fires wins:
//! greeting, farewell, gratitude, help, time of day, knowledge lookup,
//! code analysis, arithmetic, follow-up, then the generative fallback.

mod prompt;
mod replies;
mod rules;

use serde::Serialize;

use crate::eval::{analyze, evaluate};
use crate::knowledge::KnowledgeBase;
use crate::model::{GenerationParams, Generator};
use crate::session::Turn;
use crate::utils::debug_enabled;

use prompt::{build_prompt, is_degenerate, strip_echo};
use replies::{
    CLARIFICATION, CODE_ANALYSIS_LABEL, FAREWELL, FOLLOW_UP, GOOD_DAY, GREETING, HELP, THANKS,
    good_period,
};
use rules::{
    FAREWELL_TOKENS, FOLLOW_UP_MARKER, GOOD_PREFIX, GRATITUDE_TOKENS, GREETING_TOKENS,
    HELP_PREFIX, QUESTION_PREFIXES, contains_any, day_period, extract_arithmetic,
    extract_code_block, starts_with_any,
};

/// Which rule produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Rule {
    Greeting,
    Farewell,
    Gratitude,
    Help,
    TimeOfDay,
    Knowledge,
    CodeAnalysis,
    Arithmetic,
    FollowUp,
    Fallback,
}

impl Rule {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Rule::Greeting => "greeting",
            Rule::Farewell => "farewell",
            Rule::Gratitude => "gratitude",
            Rule::Help => "help",
            Rule::TimeOfDay => "time_of_day",
            Rule::Knowledge => "knowledge",
            Rule::CodeAnalysis => "code_analysis",
            Rule::Arithmetic => "arithmetic",
            Rule::FollowUp => "follow_up",
            Rule::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub(crate) text: String,
    pub(crate) rule: Rule,
}

impl Reply {
    fn new(rule: Rule, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rule,
        }
    }
}

pub(crate) struct Responder<'a> {
    knowledge: &'a KnowledgeBase,
    generator: &'a dyn Generator,
    params: GenerationParams,
}

impl<'a> Responder<'a> {
    pub(crate) fn new(
        knowledge: &'a KnowledgeBase,
        generator: &'a dyn Generator,
        params: GenerationParams,
    ) -> Self {
        Self {
            knowledge,
            generator,
            params,
        }
    }

    /// Classify `message` and produce a reply. `history` is the session so
    /// far, not including `message`.
    pub(crate) fn respond(&self, message: &str, history: &[Turn]) -> Reply {
        let reply = self
            .match_rule(message, history)
            .unwrap_or_else(|| self.fallback(message, history));
        if debug_enabled() {
            eprintln!("Rule fired: {}", reply.rule.as_str());
        }
        reply
    }

    fn match_rule(&self, message: &str, history: &[Turn]) -> Option<Reply> {
        let text = message.trim();
        let lower = text.to_lowercase();

        if starts_with_any(&lower, &GREETING_TOKENS) {
            return Some(Reply::new(Rule::Greeting, GREETING));
        }
        if starts_with_any(&lower, &FAREWELL_TOKENS) {
            return Some(Reply::new(Rule::Farewell, FAREWELL));
        }
        if contains_any(&lower, &GRATITUDE_TOKENS) {
            return Some(Reply::new(Rule::Gratitude, THANKS));
        }
        if lower.starts_with(HELP_PREFIX) {
            return Some(Reply::new(Rule::Help, HELP));
        }
        if lower.starts_with(GOOD_PREFIX) {
            let reply = match day_period(&lower) {
                Some(period) => good_period(period),
                None => GOOD_DAY.to_string(),
            };
            return Some(Reply::new(Rule::TimeOfDay, reply));
        }
        // no keyword match falls through to the later rules
        if starts_with_any(&lower, &QUESTION_PREFIXES)
            && let Some(entry) = self.knowledge.lookup(&lower)
        {
            return Some(Reply::new(Rule::Knowledge, entry.explanation.as_str()));
        }
        if let Some(code) = extract_code_block(text) {
            return Some(Reply::new(Rule::CodeAnalysis, render_code_analysis(code)));
        }
        if let Some(expression) = extract_arithmetic(text) {
            let result = match evaluate(expression) {
                Ok(value) => value,
                Err(err) => err.to_string(),
            };
            return Some(Reply::new(
                Rule::Arithmetic,
                format!("The result of {expression} is {result}"),
            ));
        }
        // placeholder only: prior topic content is not consulted
        if history.len() >= 2 && lower.contains(FOLLOW_UP_MARKER) {
            return Some(Reply::new(Rule::FollowUp, FOLLOW_UP));
        }

        None
    }

    fn fallback(&self, message: &str, history: &[Turn]) -> Reply {
        let message = message.trim();
        let prompt = build_prompt(history, message);

        let text = match self.generator.generate(&prompt, &self.params) {
            Ok(generated) => {
                let reply = strip_echo(&generated, &prompt);
                if is_degenerate(&reply, message) {
                    CLARIFICATION.to_string()
                } else {
                    reply
                }
            }
            Err(err) => {
                if debug_enabled() {
                    eprintln!("Generator '{}' failed: {}", self.generator.name(), err);
                }
                CLARIFICATION.to_string()
            }
        };

        Reply::new(Rule::Fallback, text)
    }
}

fn render_code_analysis(code: &str) -> String {
    let body = match analyze(code) {
        Ok(analysis) => serde_json::to_string_pretty(&analysis)
            .unwrap_or_else(|e| format!("Failed to serialize analysis: {e}")),
        Err(err) => err.to_string(),
    };
    format!("{CODE_ANALYSIS_LABEL}\n{body}")
}
