//! Goal assistant replies

use serde::{Deserialize, Serialize};

/// One of the three read-only assistant queries; also names the active tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantAction {
    #[default]
    Review,
    Advice,
    Scenario,
}

impl AssistantAction {
    pub fn all() -> &'static [AssistantAction] {
        &[
            AssistantAction::Review,
            AssistantAction::Advice,
            AssistantAction::Scenario,
        ]
    }

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            AssistantAction::Review => "Review",
            AssistantAction::Advice => "Advice",
            AssistantAction::Scenario => "Scenario",
        }
    }

    /// Alert shown when the query fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            AssistantAction::Review => "Failed to get goal review",
            AssistantAction::Advice => "Failed to get goal advice",
            AssistantAction::Scenario => "Failed to analyze scenario",
        }
    }
}

impl std::fmt::Display for AssistantAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantAction::Review => write!(f, "review"),
            AssistantAction::Advice => write!(f, "advice"),
            AssistantAction::Scenario => write!(f, "scenario"),
        }
    }
}

/// Raw body returned by the assistant endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentReply {
    pub email: Option<String>,
    pub question_asked: Option<String>,
    pub answer: Option<String>,
    pub advice: Option<String>,
    pub scenario_description: Option<String>,
    pub analysis: Option<String>,
}

/// An assistant reply, tagged by the action that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum AgentResponse {
    Review {
        question_asked: Option<String>,
        answer: String,
    },
    Advice {
        advice: String,
    },
    Scenario {
        scenario_description: Option<String>,
        analysis: String,
    },
}

impl AgentResponse {
    /// Pick the fields belonging to `action`; `None` when its text is missing
    pub fn from_reply(action: AssistantAction, reply: AgentReply) -> Option<Self> {
        match action {
            AssistantAction::Review => reply.answer.map(|answer| AgentResponse::Review {
                question_asked: reply.question_asked,
                answer,
            }),
            AssistantAction::Advice => reply.advice.map(|advice| AgentResponse::Advice { advice }),
            AssistantAction::Scenario => reply.analysis.map(|analysis| AgentResponse::Scenario {
                scenario_description: reply.scenario_description,
                analysis,
            }),
        }
    }

    pub fn action(&self) -> AssistantAction {
        match self {
            AgentResponse::Review { .. } => AssistantAction::Review,
            AgentResponse::Advice { .. } => AssistantAction::Advice,
            AgentResponse::Scenario { .. } => AssistantAction::Scenario,
        }
    }

    /// The free text to be formatted
    pub fn text(&self) -> &str {
        match self {
            AgentResponse::Review { answer, .. } => answer,
            AgentResponse::Advice { advice } => advice,
            AgentResponse::Scenario { analysis, .. } => analysis,
        }
    }
}
