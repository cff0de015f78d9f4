use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single questionnaire answer: free text or a set of option codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Text(String),
    Choices(Vec<String>),
}

impl ResponseValue {
    /// Blank text and empty selections carry no answer.
    pub fn is_blank(&self) -> bool {
        match self {
            ResponseValue::Text(text) => text.trim().is_empty(),
            ResponseValue::Choices(choices) => choices.is_empty(),
        }
    }
}

/// Pitch questionnaire answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchResponses(BTreeMap<String, ResponseValue>);

impl PitchResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, question: &str, value: &str) -> Self {
        self.insert(question, ResponseValue::Text(value.to_string()));
        self
    }

    pub fn with_choices(mut self, question: &str, values: &[&str]) -> Self {
        let values = values.iter().map(|value| value.to_string()).collect();
        self.insert(question, ResponseValue::Choices(values));
        self
    }

    pub fn insert(&mut self, question: &str, value: ResponseValue) {
        self.0.insert(question.to_string(), value);
    }

    pub fn get(&self, question: &str) -> Option<&ResponseValue> {
        self.0.get(question)
    }

    /// Non-blank text answer.
    pub fn text(&self, question: &str) -> Option<&str> {
        match self.0.get(question) {
            Some(ResponseValue::Text(text)) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn text_or<'a>(&'a self, question: &str, fallback: &'a str) -> &'a str {
        self.text(question).unwrap_or(fallback)
    }

    /// Selected option codes; empty when unanswered or answered with text.
    pub fn choices(&self, question: &str) -> &[String] {
        match self.0.get(question) {
            Some(ResponseValue::Choices(choices)) => choices.as_slice(),
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResponseValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
