//! Backend route paths
//!
//! Paths are relative to the configured base URL. Goal names and free-text
//! query parameters are percent-encoded; the identity is sent as-is.

use urlencoding::encode;

use crate::models::Identity;

pub const ASK: &str = "/user/ask-ai";
pub const GOALS: &str = "/users/goals";

/// Join a base URL and a route path
pub fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub fn goals(identity: &Identity) -> String {
    format!("{}/{}", GOALS, identity)
}

pub fn goal(identity: &Identity, goal_name: &str) -> String {
    format!("{}/{}/{}", GOALS, identity, encode(goal_name))
}

pub fn goal_review(identity: &Identity, question: &str) -> String {
    format!(
        "{}/agent/review/{}?user_question={}",
        GOALS,
        identity,
        encode(question)
    )
}

pub fn goal_advice(identity: &Identity) -> String {
    format!("{}/agent/advice/{}", GOALS, identity)
}

pub fn goal_scenario(identity: &Identity, description: &str) -> String {
    format!(
        "{}/agent/scenario/{}?scenario_description={}",
        GOALS,
        identity,
        encode(description)
    )
}

pub fn loans(identity: &Identity) -> String {
    format!("/user/loans/{}", identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Identity {
        Identity::new("ana@example.com").unwrap()
    }

    #[test]
    fn test_goal_routes() {
        assert_eq!(goals(&ana()), "/users/goals/ana@example.com");
        assert_eq!(
            goal(&ana(), "New Car & Trip"),
            "/users/goals/ana@example.com/New%20Car%20%26%20Trip"
        );
    }

    #[test]
    fn test_agent_routes_encode_query() {
        assert_eq!(
            goal_review(&ana(), ""),
            "/users/goals/agent/review/ana@example.com?user_question="
        );
        assert_eq!(
            goal_scenario(&ana(), "save $200/month"),
            "/users/goals/agent/scenario/ana@example.com?scenario_description=save%20%24200%2Fmonth"
        );
        assert_eq!(goal_advice(&ana()), "/users/goals/agent/advice/ana@example.com");
    }

    #[test]
    fn test_join() {
        assert_eq!(
            join("http://localhost:8000/", &loans(&ana())),
            "http://localhost:8000/user/loans/ana@example.com"
        );
        assert_eq!(join("http://host", ASK), "http://host/user/ask-ai");
    }
}
