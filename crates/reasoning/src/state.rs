use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable per-request record shared by the pipeline stages.
///
/// `original_query` is fixed at creation. The tool candidate finder fills
/// `suggested_tools`; later stages approve tools and set flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningState {
    original_query: String,
    suggested_tools: Vec<String>,
    approved_tools: Vec<String>,
    flags: BTreeMap<String, bool>,
}

impl ReasoningState {
    pub fn new(original_query: impl Into<String>) -> Self {
        Self {
            original_query: original_query.into(),
            ..Self::default()
        }
    }

    pub fn original_query(&self) -> &str {
        &self.original_query
    }

    pub fn suggested_tools(&self) -> &[String] {
        &self.suggested_tools
    }

    pub fn set_suggested_tools(&mut self, tools: Vec<String>) {
        self.suggested_tools = tools;
    }

    pub fn is_tool_suggested(&self, tool: &str) -> bool {
        self.suggested_tools.iter().any(|t| t == tool)
    }

    pub fn approved_tools(&self) -> &[String] {
        &self.approved_tools
    }

    /// Approve `tool`; returns `false` if it was already approved.
    pub fn approve_tool(&mut self, tool: impl Into<String>) -> bool {
        let tool = tool.into();
        if self.is_tool_approved(&tool) {
            return false;
        }
        self.approved_tools.push(tool);
        true
    }

    pub fn revoke_tool(&mut self, tool: &str) -> bool {
        let before = self.approved_tools.len();
        self.approved_tools.retain(|t| t != tool);
        before != self.approved_tools.len()
    }

    pub fn is_tool_approved(&self, tool: &str) -> bool {
        self.approved_tools.iter().any(|t| t == tool)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Flag value; unset flags read as `false`
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }
}
