//! Dataset Assistance
//!
//! Features layered on top of the query core:
//!
//! - **Insights**: local statistics, outliers and value distributions
//! - **Agents**: prompt templates run against individual rows
//! - **Transformations**: proposed column and row rewrites, applied on request

mod agents;
mod insights;
mod transform;

pub use agents::{
    interpolate_template, AgentError, AgentResponder, AgentResult, AgentRunner, AgentScope,
    LocalResponder, RowAgent,
};
pub use insights::{analyze, summarize, Insight, InsightCategory, DEFAULT_CATEGORIES};
pub use transform::{
    apply_changes, LocalTransformer, TransformError, TransformResponder, TransformScope,
    Transformation, TransformationChange, Transformer, MAX_UNIQUE_VALUES,
};
