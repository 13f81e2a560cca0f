use serde::{Deserialize, Serialize};

/// Everything the gate battery needs to judge one action request.
///
/// A `GateContext` is an ephemeral, per-request record: it carries no
/// identity of its own and is never stored as an entity (the persistence
/// collaborator receives a serialized copy for audit only). Incoming request
/// bodies deserialize straight into this shape; absent fields take their
/// defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateContext {
    /// The population the action concerns (e.g. "nz-smokers").
    pub subject_group: String,
    /// Declared purpose of the assessment; must sit inside the approved-scope
    /// whitelist to clear the boundary gate.
    pub purpose_scope: Option<String>,
    /// Who authorized the action. Case is significant.
    pub authorizer_id: String,
    /// Self-validating consent anchor covering the (group, scope, authorizer)
    /// triple.
    pub consent_token: Option<String>,
    /// Model confidence in the action's evidence, intended range [0, 1].
    pub confidence: f64,
    /// Categorical quality label for the underlying data.
    pub data_quality: String,
    /// Version of the model that produced the evidence.
    pub model_version: Option<String>,
    /// How many independent models were consulted.
    pub model_count: u32,
    /// Size of the affected population.
    pub population_size: u64,
    /// Whether the action's output is shown directly to patients.
    pub patient_facing: bool,
    /// What kind of assessment this is; checked against the forbidden set.
    pub action_category: String,
    /// Jurisdiction the action runs under, if declared.
    pub jurisdiction: Option<String>,
    /// Whether a minority/dissenting model view was explicitly acknowledged.
    pub dissent_acknowledged: bool,
    /// Free-text acknowledgement of equity impact for bulk actions.
    pub equity_acknowledgement: Option<String>,
}

impl GateContext {
    /// True when an optional string field is present and non-blank.
    pub fn has_value(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}
