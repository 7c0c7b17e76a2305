//! Row Agents
//!
//! Named prompt templates that run against individual rows. A template such as
//! `Explain order {{customer}} for ${{total}}` is filled from the row and handed to
//! an [`AgentResponder`]; results are kept per agent and row.

use crate::data::{Row, Value};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder pattern"));

/// Agent errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Agent '{0}' runs on a single row")]
    SingleRowAgent(String),

    #[error("Agent '{agent}' failed: {message}")]
    Responder { agent: String, message: String },
}

/// Whether an agent targets one row or a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentScope {
    #[default]
    Single,
    Multi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowAgent {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Prompt with `{{column}}` placeholders
    pub prompt_template: String,
    #[serde(default)]
    pub scope: AgentScope,
}

impl RowAgent {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            prompt_template: prompt_template.into(),
            scope: AgentScope::Single,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_scope(mut self, scope: AgentScope) -> Self {
        self.scope = scope;
        self
    }

    /// This agent's prompt filled in from `row`
    pub fn prompt_for(&self, row: &Row) -> String {
        interpolate_template(&self.prompt_template, row)
    }
}

/// Replace `{{key}}` placeholders with row values
///
/// Placeholders naming a field the row does not have are left as written.
pub fn interpolate_template(template: &str, row: &Row) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match row.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Produces the text answer for a filled-in prompt
///
/// Implement this to route agents to a language-model provider.
pub trait AgentResponder: Send + Sync {
    fn respond(&self, prompt: &str, agent: &RowAgent) -> Result<String, AgentError>;
}

/// Canned offline responses chosen by the agent's id
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResponder;

impl AgentResponder for LocalResponder {
    fn respond(&self, prompt: &str, agent: &RowAgent) -> Result<String, AgentError> {
        let id = agent.id.as_str();

        let text = if id.contains("explain") {
            format!(
                "This record shows: {}... This is a standard entry in the dataset.",
                truncate(prompt, 100)
            )
        } else if id.contains("predict") {
            "Based on the data, prediction: Likely to complete within 5-7 business days."
                .to_string()
        } else if id.contains("classify") || id.contains("categorize") {
            "Classification: Standard category based on the provided attributes.".to_string()
        } else if id.contains("email") || id.contains("draft") {
            "Dear Customer,\n\nThank you for your inquiry. We have reviewed your request and will process it shortly.\n\nBest regards,\nSupport Team".to_string()
        } else if id.contains("summarize") {
            format!("Summary: {}...", truncate(prompt, 150))
        } else {
            format!("AI Response for: {}...", truncate(prompt, 100))
        };

        Ok(text)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Output of one agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    pub agent_id: String,
    pub row_id: Value,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

/// Registry of agents plus the results they produced
pub struct AgentRunner<R = LocalResponder> {
    agents: Vec<RowAgent>,
    results: IndexMap<String, AgentResult>,
    responder: R,
}

impl AgentRunner<LocalResponder> {
    pub fn new(agents: Vec<RowAgent>) -> Self {
        Self::with_responder(agents, LocalResponder)
    }
}

impl<R: AgentResponder> AgentRunner<R> {
    pub fn with_responder(agents: Vec<RowAgent>, responder: R) -> Self {
        Self {
            agents,
            results: IndexMap::new(),
            responder,
        }
    }

    pub fn agents(&self) -> &[RowAgent] {
        &self.agents
    }

    pub fn agent(&self, id: &str) -> Option<&RowAgent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Add an agent, replacing any existing agent with the same id
    pub fn register(&mut self, agent: RowAgent) {
        self.agents.retain(|a| a.id != agent.id);
        self.agents.push(agent);
    }

    /// Remove an agent; returns whether it was registered
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.agents.len();
        self.agents.retain(|a| a.id != id);
        self.agents.len() != before
    }

    /// Run an agent on one row
    ///
    /// Without an explicit `row_id` the row's `id` field is used.
    pub fn execute(
        &mut self,
        agent_id: &str,
        row: &Row,
        row_id: Option<Value>,
    ) -> Result<AgentResult, AgentError> {
        let agent = self
            .agent(agent_id)
            .ok_or_else(|| AgentError::UnknownAgent(agent_id.to_string()))?;

        let prompt = agent.prompt_for(row);
        let text = self.responder.respond(&prompt, agent)?;

        let result = AgentResult {
            agent_id: agent.id.clone(),
            row_id: row_id.unwrap_or_else(|| row_id_of(row)),
            result: text,
            timestamp: Utc::now(),
        };

        tracing::debug!(agent = %result.agent_id, row = %result.row_id, "Agent completed");

        let key = format!("{}-{}", result.agent_id, result.row_id);
        self.results.insert(key, result.clone());
        Ok(result)
    }

    /// Run a multi-row agent on each row in turn, stopping at the first failure
    ///
    /// Rows without an `id` field are identified by their position.
    pub fn execute_batch(
        &mut self,
        agent_id: &str,
        rows: &[Row],
    ) -> Result<Vec<AgentResult>, AgentError> {
        let agent = self
            .agent(agent_id)
            .ok_or_else(|| AgentError::UnknownAgent(agent_id.to_string()))?;
        if agent.scope != AgentScope::Multi {
            return Err(AgentError::SingleRowAgent(agent_id.to_string()));
        }

        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                let row_id = match row.get("id") {
                    Some(id) if !id.is_null() => id.clone(),
                    _ => Value::Number(index as f64),
                };
                self.execute(agent_id, row, Some(row_id))
            })
            .collect()
    }

    /// Stored results, oldest first
    pub fn results(&self) -> impl Iterator<Item = &AgentResult> {
        self.results.values()
    }

    /// Results recorded for `row`, matched on its `id` field
    pub fn row_results(&self, row: &Row) -> Vec<&AgentResult> {
        let id = row_id_of(row);
        self.results.values().filter(|r| r.row_id == id).collect()
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
    }
}

fn row_id_of(row: &Row) -> Value {
    row.get("id").cloned().unwrap_or(Value::Null)
}
