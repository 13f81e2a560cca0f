use serde::{Deserialize, Serialize};

/// The governance constants the gate battery enforces.
///
/// These are policy, not runtime configuration: changing an entry is a
/// deliberate governance act, so the charter is an explicit versioned value
/// rather than literals scattered through the evaluators. Version 1 is the
/// only charter in force.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyCharter {
    pub version: u32,
    /// Assessment categories that are permanently excluded. No override
    /// path, no score floor.
    pub forbidden_categories: Vec<String>,
    /// Approved purpose scopes. Extending this list is an auditable
    /// governance act.
    pub approved_scopes: Vec<String>,
    /// Population size above which an equity acknowledgement is mandatory.
    pub bulk_population_threshold: u64,
}

impl PolicyCharter {
    /// Charter version 1.
    ///
    /// The forbidden categories name historically discriminatory assessment
    /// types; the approved scopes are the six population-health domains the
    /// governance board has signed off.
    pub fn v1() -> Self {
        Self {
            version: 1,
            forbidden_categories: vec![
                "eugenics_screening".into(),
                "racial_stratification".into(),
                "insurance_redlining".into(),
            ],
            approved_scopes: vec![
                "population_mortality".into(),
                "population_morbidity".into(),
                "clinical_risk".into(),
                "screening_eligibility".into(),
                "resource_planning".into(),
                "service_utilisation".into(),
            ],
            bulk_population_threshold: 10_000,
        }
    }

    pub fn is_forbidden_category(&self, category: &str) -> bool {
        self.forbidden_categories
            .iter()
            .any(|entry| entry == category)
    }

    pub fn is_approved_scope(&self, scope: &str) -> bool {
        self.approved_scopes.iter().any(|entry| entry == scope)
    }
}

impl Default for PolicyCharter {
    fn default() -> Self {
        Self::v1()
    }
}
