//! Platform knowledge schema for the semantic tier
//!
//! Slow-changing, platform-wide knowledge: how leads are qualified,
//! which specialist bots exist, and domain playbook material. Loaded
//! once per process; a compiled-in snapshot backs every failure path so
//! the tier always returns schema-valid data.

use serde::{Deserialize, Serialize};

/// A single weighted rule in the qualification methodology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationRule {
    pub id: String,
    pub description: String,
    /// Relative weight within the methodology, in [0, 1]
    pub weight: f32,
}

/// How the platform scores and qualifies leads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationMethodology {
    pub name: String,
    pub rules: Vec<QualificationRule>,
}

/// What one specialist bot handles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCapability {
    pub bot: String,
    pub description: String,
    /// Intents this bot should receive handoffs for
    pub intents: Vec<String>,
}

/// One rehearsed answer to a common objection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectionResponse {
    pub objection: String,
    pub response: String,
}

/// Domain playbook material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainKnowledge {
    pub process_steps: Vec<String>,
    pub objections: Vec<ObjectionResponse>,
    pub best_practices: Vec<String>,
}

/// The full semantic-tier snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformKnowledge {
    pub qualification: QualificationMethodology,
    pub agents: Vec<AgentCapability>,
    pub domain: DomainKnowledge,
}

impl PlatformKnowledge {
    /// The compiled-in fallback snapshot. Always schema-valid; used
    /// whenever no remote source is configured or the fetch fails.
    pub fn default_snapshot() -> Self {
        Self {
            qualification: QualificationMethodology {
                name: "Standard lead qualification".to_string(),
                rules: vec![
                    QualificationRule {
                        id: "intent".to_string(),
                        description: "Lead has a concrete buying or selling intent".to_string(),
                        weight: 0.35,
                    },
                    QualificationRule {
                        id: "timeline".to_string(),
                        description: "Lead intends to transact within six months".to_string(),
                        weight: 0.25,
                    },
                    QualificationRule {
                        id: "budget".to_string(),
                        description: "Lead has stated a budget or preapproval".to_string(),
                        weight: 0.25,
                    },
                    QualificationRule {
                        id: "responsiveness".to_string(),
                        description: "Lead responds within one business day".to_string(),
                        weight: 0.15,
                    },
                ],
            },
            agents: vec![
                AgentCapability {
                    bot: "qualifier".to_string(),
                    description: "Initial intake and lead qualification".to_string(),
                    intents: vec!["qualify".to_string(), "intake".to_string()],
                },
                AgentCapability {
                    bot: "listing".to_string(),
                    description: "Seller-side listing preparation and pricing".to_string(),
                    intents: vec!["sell".to_string(), "list".to_string(), "price".to_string()],
                },
                AgentCapability {
                    bot: "scheduler".to_string(),
                    description: "Showing and appointment scheduling".to_string(),
                    intents: vec!["showing".to_string(), "schedule".to_string()],
                },
            ],
            domain: DomainKnowledge {
                process_steps: vec![
                    "Qualify the lead".to_string(),
                    "Assess the property".to_string(),
                    "Agree on pricing".to_string(),
                    "List and market".to_string(),
                    "Negotiate offers".to_string(),
                    "Close".to_string(),
                ],
                objections: vec![
                    ObjectionResponse {
                        objection: "The commission is too high".to_string(),
                        response: "Walk through the marketing plan and net-proceeds comparison"
                            .to_string(),
                    },
                    ObjectionResponse {
                        objection: "I want to wait for the market to improve".to_string(),
                        response: "Review local absorption data and carrying costs together"
                            .to_string(),
                    },
                ],
                best_practices: vec![
                    "Confirm timeline and budget before any showing".to_string(),
                    "Summarize agreed next steps at the end of every conversation".to_string(),
                ],
            },
        }
    }
}
