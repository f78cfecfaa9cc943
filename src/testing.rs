//! In-memory backend for controller tests

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{BackendError, FinanceBackend};
use crate::models::{AgentReply, Goal, GoalPayload, Identity, Loan};

/// Records every call and serves goals from a vector
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    pub ask_reply: Mutex<String>,
    pub goals: Mutex<Vec<Goal>>,
    pub agent_reply: Mutex<AgentReply>,
    pub loans: Mutex<Vec<Loan>>,
}

impl FakeBackend {
    pub fn with_goals(goals: Vec<Goal>) -> Self {
        let backend = Self::default();
        *backend.goals.lock().unwrap() = goals;
        backend
    }

    /// Make every call of `op` fail with [`BackendError::Unavailable`]
    pub fn fail_on(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .count()
    }

    fn record(&self, op: &'static str, target: &str) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(format!("{} {}", op, target));
        if self.failing.lock().unwrap().contains(op) {
            return Err(BackendError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl FinanceBackend for FakeBackend {
    async fn ask(&self, _identity: &Identity, query: &str) -> Result<String, BackendError> {
        self.record("ask", query)?;
        Ok(self.ask_reply.lock().unwrap().clone())
    }

    async fn list_goals(&self, identity: &Identity) -> Result<Vec<Goal>, BackendError> {
        self.record("list_goals", identity.as_str())?;
        Ok(self.goals.lock().unwrap().clone())
    }

    async fn create_goal(&self, payload: &GoalPayload) -> Result<(), BackendError> {
        self.record("create_goal", &payload.goal.goal_name)?;
        self.goals.lock().unwrap().push(payload.goal.clone());
        Ok(())
    }

    async fn update_goal(
        &self,
        _identity: &Identity,
        goal_name: &str,
        payload: &GoalPayload,
    ) -> Result<(), BackendError> {
        self.record("update_goal", goal_name)?;
        let mut goals = self.goals.lock().unwrap();
        match goals.iter_mut().find(|g| g.goal_name == goal_name) {
            Some(goal) => {
                *goal = payload.goal.clone();
                Ok(())
            }
            None => Err(BackendError::Status {
                status: 404,
                detail: Some("Goal not found".into()),
            }),
        }
    }

    async fn delete_goal(&self, _identity: &Identity, goal_name: &str) -> Result<(), BackendError> {
        self.record("delete_goal", goal_name)?;
        self.goals.lock().unwrap().retain(|g| g.goal_name != goal_name);
        Ok(())
    }

    async fn goal_review(
        &self,
        _identity: &Identity,
        question: &str,
    ) -> Result<AgentReply, BackendError> {
        self.record("goal_review", question)?;
        Ok(self.agent_reply.lock().unwrap().clone())
    }

    async fn goal_advice(&self, identity: &Identity) -> Result<AgentReply, BackendError> {
        self.record("goal_advice", identity.as_str())?;
        Ok(self.agent_reply.lock().unwrap().clone())
    }

    async fn goal_scenario(
        &self,
        _identity: &Identity,
        description: &str,
    ) -> Result<AgentReply, BackendError> {
        self.record("goal_scenario", description)?;
        Ok(self.agent_reply.lock().unwrap().clone())
    }

    async fn list_loans(&self, identity: &Identity) -> Result<Vec<Loan>, BackendError> {
        self.record("list_loans", identity.as_str())?;
        Ok(self.loans.lock().unwrap().clone())
    }
}

pub fn ana() -> Identity {
    Identity::new("ana@example.com").unwrap()
}
