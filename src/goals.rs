//! Goal Tracker
//!
//! State and actions of the Goals page: the goal list, the create form,
//! the single edit slot and the goal assistant panel.
//!
//! ## Reconciliation
//!
//! The list is never patched locally. Every mutation is followed by a
//! full refetch, and a failed fetch leaves the list empty.
//!
//! ## Assistant
//!
//! [`AssistantPanel`] holds the last successful assistant response and the
//! active tab. A response is only shown while its tab is active.

use chrono::{NaiveDate, Utc};

use crate::backend::{BackendError, FinanceBackend};
use crate::error::{AppError, AppResult};
use crate::format::{format_response, Block};
use crate::models::{
    AgentReply, AgentResponse, AssistantAction, Goal, GoalDraft, GoalPayload, Identity,
};

/// Confirmation shown before a goal is deleted
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this goal?";

/// Shortest scenario description the assistant accepts, in characters
pub const MIN_SCENARIO_CHARS: usize = 10;

pub const LOAD_FAILED: &str = "Failed to load goals.";
pub const ADD_FAILED: &str = "Failed to add goal";
pub const UPDATE_FAILED: &str = "Failed to update goal";
pub const DELETE_FAILED: &str = "Failed to delete goal";

// ============================================
// Edit Slot
// ============================================

/// The goal currently being edited
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    /// Position in the list when editing began
    pub index: usize,
    /// Name the goal is stored under; the update is addressed to it
    pub original_name: String,
    pub draft: Goal,
}

// ============================================
// Assistant Panel
// ============================================

/// Review / advice / scenario panel
#[derive(Debug, Clone, Default)]
pub struct AssistantPanel {
    active_tab: AssistantAction,
    response: Option<AgentResponse>,
    /// Optional question sent with a review
    pub question: String,
    /// What-if description sent with a scenario analysis
    pub scenario_description: String,
}

impl AssistantPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> AssistantAction {
        self.active_tab
    }

    /// Switch tabs; the held response is kept
    pub fn select_tab(&mut self, tab: AssistantAction) {
        self.active_tab = tab;
    }

    pub fn response(&self) -> Option<&AgentResponse> {
        self.response.as_ref()
    }

    /// Reject an action before any request is made
    pub fn check(&self, action: AssistantAction) -> AppResult<()> {
        if action == AssistantAction::Scenario
            && self.scenario_description.chars().count() < MIN_SCENARIO_CHARS
        {
            return Err(AppError::Validation(format!(
                "Please provide a more detailed scenario description (minimum {} characters)",
                MIN_SCENARIO_CHARS
            )));
        }
        Ok(())
    }

    /// Store the outcome of an assistant query
    ///
    /// On failure, including a reply without the action's text, nothing
    /// changes.
    pub fn apply(
        &mut self,
        action: AssistantAction,
        result: Result<AgentReply, BackendError>,
    ) -> AppResult<&AgentResponse> {
        let reply = result.map_err(|e| {
            tracing::error!(%action, error = %e, "{}", action.failure_message());
            AppError::backend(action.failure_message(), e)
        })?;

        let response = AgentResponse::from_reply(action, reply).ok_or_else(|| {
            tracing::error!(%action, "Assistant reply has no {} text", action);
            AppError::backend(
                action.failure_message(),
                BackendError::Malformed(format!("reply has no {} text", action)),
            )
        })?;

        self.active_tab = action;
        let response = self.response.insert(response);
        Ok(&*response)
    }

    /// Validate, query the backend and store the response
    pub async fn run(
        &mut self,
        backend: &dyn FinanceBackend,
        identity: &Identity,
        action: AssistantAction,
    ) -> AppResult<&AgentResponse> {
        self.check(action)?;

        let result = match action {
            AssistantAction::Review => backend.goal_review(identity, &self.question).await,
            AssistantAction::Advice => backend.goal_advice(identity).await,
            AssistantAction::Scenario => {
                backend
                    .goal_scenario(identity, &self.scenario_description)
                    .await
            }
        };

        self.apply(action, result)
    }

    /// Blocks of the held response, if it belongs to the active tab
    pub fn visible_blocks(&self) -> Vec<Block> {
        match &self.response {
            Some(response) if response.action() == self.active_tab => format_response(response),
            _ => Vec::new(),
        }
    }
}

// ============================================
// Goal Tracker
// ============================================

/// State of the Goals page
#[derive(Debug, Clone, Default)]
pub struct GoalTracker {
    identity: Option<Identity>,
    goals: Vec<Goal>,
    /// The create form
    pub new_goal: GoalDraft,
    edit: Option<EditSession>,
    pub assistant: AssistantPanel,
}

impl GoalTracker {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity,
            ..Default::default()
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    fn require_identity(&self) -> AppResult<&Identity> {
        self.identity.as_ref().ok_or(AppError::MissingIdentity)
    }

    /// Goals from the last successful fetch
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Replace the list with a fetch result
    pub fn apply_goals(&mut self, result: Result<Vec<Goal>, BackendError>) -> AppResult<&[Goal]> {
        match result {
            Ok(goals) => {
                tracing::debug!(count = goals.len(), "Goals loaded");
                self.goals = goals;
                Ok(&self.goals)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch goals");
                self.goals.clear();
                Err(AppError::backend(LOAD_FAILED, e))
            }
        }
    }

    /// Fetch the full goal list
    pub async fn refresh(&mut self, backend: &dyn FinanceBackend) -> AppResult<&[Goal]> {
        let result = backend.list_goals(self.require_identity()?).await;
        self.apply_goals(result)
    }

    /// Build the create request from the form
    pub fn prepare_create(&self, today: NaiveDate) -> AppResult<GoalPayload> {
        let goal = self.new_goal.build(today)?;
        Ok(GoalPayload::new(self.require_identity()?, goal))
    }

    /// Create a goal from the form, then refetch
    ///
    /// The form is cleared only when the backend accepted the goal.
    pub async fn create(&mut self, backend: &dyn FinanceBackend) -> AppResult<()> {
        let payload = self.prepare_create(Utc::now().date_naive())?;

        tracing::info!(
            goal = %payload.goal.goal_name,
            progress = payload.goal.progress_percent,
            on_track = payload.goal.on_track,
            "Adding goal"
        );
        let created = backend.create_goal(&payload).await;
        let refreshed = self.refresh(backend).await.map(|_| ());

        match created {
            Ok(()) => {
                self.new_goal = GoalDraft::default();
                refreshed
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to add goal");
                Err(AppError::backend(ADD_FAILED, e))
            }
        }
    }

    /// Load the goal at `index` into the edit slot
    pub fn begin_edit(&mut self, index: usize) -> AppResult<&mut Goal> {
        let goal = self
            .goals
            .get(index)
            .cloned()
            .ok_or(AppError::GoalNotFound(index))?;

        let edit = self.edit.insert(EditSession {
            index,
            original_name: goal.goal_name.clone(),
            draft: goal,
        });
        Ok(&mut edit.draft)
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut Goal> {
        self.edit.as_mut().map(|edit| &mut edit.draft)
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// The original name and request body for the open edit slot
    ///
    /// `None` when nothing is being edited.
    pub fn prepare_update(&self) -> AppResult<Option<(String, GoalPayload)>> {
        let Some(edit) = &self.edit else {
            return Ok(None);
        };
        if edit.draft.goal_name.is_empty() {
            return Err(AppError::Validation(
                "Please fill in required fields".to_string(),
            ));
        }

        let mut draft = edit.draft.clone();
        draft.recompute_progress();
        let payload = GoalPayload::new(self.require_identity()?, draft);
        Ok(Some((edit.original_name.clone(), payload)))
    }

    /// Send the edit draft to the goal's original name, then refetch
    ///
    /// Without an open edit slot this does nothing. On failure the slot
    /// stays open.
    pub async fn save_edit(&mut self, backend: &dyn FinanceBackend) -> AppResult<()> {
        let Some((original_name, payload)) = self.prepare_update()? else {
            return Ok(());
        };

        tracing::info!(
            original = %original_name,
            goal = %payload.goal.goal_name,
            "Updating goal"
        );
        if let Err(e) = backend
            .update_goal(&payload.customer_email, &original_name, &payload)
            .await
        {
            tracing::error!(error = %e, "Failed to update goal");
            return Err(AppError::backend(UPDATE_FAILED, e));
        }

        self.edit = None;
        self.refresh(backend).await.map(|_| ())
    }

    /// Delete a goal by its current name after confirmation
    ///
    /// Returns `Ok(false)` when the user declined; no request is made.
    pub async fn delete(
        &mut self,
        backend: &dyn FinanceBackend,
        goal_name: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> AppResult<bool> {
        let identity = self.require_identity()?;
        if !confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        tracing::info!(goal = %goal_name, "Deleting goal");
        if let Err(e) = backend.delete_goal(identity, goal_name).await {
            tracing::error!(error = %e, "Failed to delete goal");
            return Err(AppError::backend(DELETE_FAILED, e));
        }

        self.refresh(backend).await.map(|_| true)
    }

    /// Run an assistant action for this user
    pub async fn ask_assistant(
        &mut self,
        backend: &dyn FinanceBackend,
        action: AssistantAction,
    ) -> AppResult<&AgentResponse> {
        let identity = self.identity.as_ref().ok_or(AppError::MissingIdentity)?;
        self.assistant.run(backend, identity, action).await
    }

    pub async fn review(&mut self, backend: &dyn FinanceBackend) -> AppResult<&AgentResponse> {
        self.ask_assistant(backend, AssistantAction::Review).await
    }

    pub async fn advice(&mut self, backend: &dyn FinanceBackend) -> AppResult<&AgentResponse> {
        self.ask_assistant(backend, AssistantAction::Advice).await
    }

    pub async fn scenario(&mut self, backend: &dyn FinanceBackend) -> AppResult<&AgentResponse> {
        self.ask_assistant(backend, AssistantAction::Scenario).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::progress_percent;
    use crate::testing::{ana, FakeBackend};

    fn goal(name: &str, current: f64, target: f64) -> Goal {
        Goal {
            goal_name: name.to_string(),
            current_amount: current,
            target_amount: target,
            progress_percent: progress_percent(current, target),
            ..Default::default()
        }
    }

    fn tracker() -> GoalTracker {
        GoalTracker::new(Some(ana()))
    }

    #[tokio::test]
    async fn test_refresh_replaces_list() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();

        let goals = tracker.refresh(&backend).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(backend.calls(), vec!["list_goals ana@example.com"]);
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_list() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();
        tracker.refresh(&backend).await.unwrap();

        backend.fail_on("list_goals");
        let err = tracker.refresh(&backend).await.unwrap_err();
        assert_eq!(err.alert_message(), "Failed to load goals.");
        assert!(tracker.goals().is_empty());
    }

    #[tokio::test]
    async fn test_missing_identity() {
        let backend = FakeBackend::default();
        let mut tracker = GoalTracker::new(None);

        let err = tracker.refresh(&backend).await.unwrap_err();
        assert!(matches!(err, AppError::MissingIdentity));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_computes_progress() {
        let backend = FakeBackend::default();
        let mut tracker = tracker();

        tracker.new_goal = GoalDraft::new("Trip", 100.0).current_amount(30.0);
        tracker.create(&backend).await.unwrap();
        tracker.new_goal = GoalDraft::new("Car", 100.0).current_amount(60.0);
        tracker.create(&backend).await.unwrap();

        let goals = tracker.goals();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].progress_percent, 30.0);
        assert!(!goals[0].on_track);
        assert_eq!(goals[1].progress_percent, 60.0);
        assert!(goals[1].on_track);

        assert_eq!(goals[0].status, "Active");
        assert_eq!(goals[0].priority, "Medium");
        assert_eq!(goals[0].goal_type, "General");
        assert_eq!(goals[0].target_date, goals[0].last_updated);
        assert_eq!(goals[0].target_date.len(), 10);

        assert_eq!(tracker.new_goal, GoalDraft::default());
        assert_eq!(
            backend.calls(),
            vec![
                "create_goal Trip",
                "list_goals ana@example.com",
                "create_goal Car",
                "list_goals ana@example.com",
            ]
        );
    }

    #[test]
    fn test_prepare_create_fills_dates() {
        let mut tracker = tracker();
        tracker.new_goal = GoalDraft::new("Trip", 100.0).target_date("2026-06-01");

        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let payload = tracker.prepare_create(today).unwrap();
        assert_eq!(payload.customer_email, ana());
        assert_eq!(payload.goal.target_date, "2026-06-01");
        assert_eq!(payload.goal.last_updated, "2025-01-15");

        assert!(matches!(
            GoalTracker::new(None).prepare_create(today),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_requires_name_and_target() {
        let backend = FakeBackend::default();
        let mut tracker = tracker();

        tracker.new_goal = GoalDraft::new("", 100.0);
        let err = tracker.create(&backend).await.unwrap_err();
        assert_eq!(err.alert_message(), "Please fill in required fields");

        tracker.new_goal = GoalDraft::new("Car", 0.0);
        assert!(tracker.create(&backend).await.is_err());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_keeps_draft_and_refetches() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        backend.fail_on("create_goal");
        let mut tracker = tracker();

        tracker.new_goal = GoalDraft::new("Trip", 500.0);
        let err = tracker.create(&backend).await.unwrap_err();

        assert_eq!(err.alert_message(), "Failed to add goal");
        assert_eq!(tracker.new_goal.goal_name, "Trip");
        assert_eq!(tracker.goals().len(), 1);
        assert_eq!(backend.calls_to("list_goals"), 1);
    }

    #[tokio::test]
    async fn test_rename_targets_original_name() {
        let backend =
            FakeBackend::with_goals(vec![goal("House", 0.0, 1000.0), goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();
        tracker.refresh(&backend).await.unwrap();

        let draft = tracker.begin_edit(1).unwrap();
        draft.goal_name = "New Car".to_string();
        draft.current_amount = 50.0;
        tracker.save_edit(&backend).await.unwrap();

        assert!(backend.calls().contains(&"update_goal Car".to_string()));
        assert!(tracker.edit().is_none());
        let names: Vec<&str> = tracker.goals().iter().map(|g| g.goal_name.as_str()).collect();
        assert_eq!(names, vec!["House", "New Car"]);
        assert_eq!(tracker.goals()[1].progress_percent, 50.0);
    }

    #[tokio::test]
    async fn test_update_payload_progress_matches_on_track() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();
        tracker.refresh(&backend).await.unwrap();
        assert!(!tracker.goals()[0].on_track);

        tracker.begin_edit(0).unwrap().current_amount = 80.0;
        let (original_name, payload) = tracker.prepare_update().unwrap().unwrap();

        assert_eq!(original_name, "Car");
        assert_eq!(payload.goal.progress_percent, 80.0);
        assert!(payload.goal.on_track);

        tracker.edit_draft_mut().unwrap().current_amount = 20.0;
        let (_, payload) = tracker.prepare_update().unwrap().unwrap();
        assert_eq!(payload.goal.progress_percent, 20.0);
        assert!(!payload.goal.on_track);
    }

    #[tokio::test]
    async fn test_save_edit_failure_keeps_slot() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();
        tracker.refresh(&backend).await.unwrap();
        tracker.begin_edit(0).unwrap().priority = "High".into();

        backend.fail_on("update_goal");
        let err = tracker.save_edit(&backend).await.unwrap_err();
        assert_eq!(err.alert_message(), "Failed to update goal");

        let edit = tracker.edit().unwrap();
        assert_eq!(edit.original_name, "Car");
        assert_eq!(edit.draft.priority, "High");
        assert_eq!(backend.calls_to("list_goals"), 1);
    }

    #[tokio::test]
    async fn test_save_edit_requires_name() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();
        tracker.refresh(&backend).await.unwrap();
        tracker.begin_edit(0).unwrap().goal_name.clear();

        assert!(matches!(
            tracker.save_edit(&backend).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(backend.calls_to("update_goal"), 0);
    }

    #[test]
    fn test_edit_slot() {
        let mut tracker = tracker();
        assert!(matches!(tracker.begin_edit(0), Err(AppError::GoalNotFound(0))));
        assert!(tracker.edit_draft_mut().is_none());

        tracker.goals = vec![goal("Car", 10.0, 100.0)];
        tracker.new_goal = GoalDraft::new("Trip", 50.0);
        tracker.begin_edit(0).unwrap();
        tracker.edit_draft_mut().unwrap().goal_name = "Bike".into();
        assert_eq!(tracker.edit().unwrap().original_name, "Car");

        tracker.cancel_edit();
        assert!(tracker.edit().is_none());
        assert_eq!(tracker.new_goal.goal_name, "Trip");
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();
        tracker.refresh(&backend).await.unwrap();

        let mut prompt = String::new();
        let deleted = tracker
            .delete(&backend, "Car", |p| {
                prompt = p.to_string();
                false
            })
            .await
            .unwrap();

        assert!(!deleted);
        assert_eq!(prompt, DELETE_PROMPT);
        assert_eq!(tracker.goals().len(), 1);
        assert_eq!(backend.calls(), vec!["list_goals ana@example.com"]);
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches() {
        let backend = FakeBackend::with_goals(vec![goal("Car", 10.0, 100.0)]);
        let mut tracker = tracker();
        tracker.refresh(&backend).await.unwrap();

        assert!(tracker.delete(&backend, "Car", |_| true).await.unwrap());
        assert!(tracker.goals().is_empty());

        backend.fail_on("delete_goal");
        let err = tracker.delete(&backend, "Car", |_| true).await.unwrap_err();
        assert_eq!(err.alert_message(), "Failed to delete goal");
    }

    #[tokio::test]
    async fn test_short_scenario_sends_nothing() {
        let backend = FakeBackend::default();
        let mut tracker = tracker();
        tracker.assistant.scenario_description = "lose job".into();

        let err = tracker.scenario(&backend).await.unwrap_err();
        assert_eq!(
            err.alert_message(),
            "Please provide a more detailed scenario description (minimum 10 characters)"
        );
        assert!(backend.calls().is_empty());
        assert!(tracker.assistant.response().is_none());
    }

    #[tokio::test]
    async fn test_scenario_switches_tab_and_formats() {
        let backend = FakeBackend::default();
        backend.agent_reply.lock().unwrap().analysis =
            Some("**Overview**\nYou are on track.\n\n**Risks**\n*Inflation\n*Job loss".into());
        let mut tracker = tracker();
        tracker.assistant.scenario_description = "I lose my job next year".into();

        tracker.scenario(&backend).await.unwrap();
        assert_eq!(tracker.assistant.active_tab(), AssistantAction::Scenario);
        assert_eq!(tracker.assistant.visible_blocks().len(), 4);
        assert_eq!(
            backend.calls(),
            vec!["goal_scenario I lose my job next year"]
        );

        // Switching tabs hides the response without refetching
        tracker.assistant.select_tab(AssistantAction::Advice);
        assert!(tracker.assistant.visible_blocks().is_empty());
        tracker.assistant.select_tab(AssistantAction::Scenario);
        assert_eq!(tracker.assistant.visible_blocks().len(), 4);
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_review_allows_empty_question() {
        let backend = FakeBackend::default();
        backend.agent_reply.lock().unwrap().answer = Some("Looking good".into());
        let mut tracker = tracker();

        let response = tracker.review(&backend).await.unwrap();
        assert_eq!(response.text(), "Looking good");
        assert_eq!(backend.calls(), vec!["goal_review "]);
        assert_eq!(
            tracker.assistant.visible_blocks(),
            vec![Block::Prose("Looking good".into())]
        );
    }

    #[tokio::test]
    async fn test_assistant_failure_leaves_state() {
        let backend = FakeBackend::default();
        backend.agent_reply.lock().unwrap().answer = Some("Looking good".into());
        let mut tracker = tracker();
        tracker.review(&backend).await.unwrap();

        backend.fail_on("goal_advice");
        let err = tracker.advice(&backend).await.unwrap_err();
        assert_eq!(err.alert_message(), "Failed to get goal advice");
        assert_eq!(tracker.assistant.active_tab(), AssistantAction::Review);
        assert_eq!(tracker.assistant.response().unwrap().text(), "Looking good");

        // The reply carries an answer but no advice text
        backend.recover("goal_advice");
        let err = tracker.advice(&backend).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Backend {
                source: BackendError::Malformed(_),
                ..
            }
        ));
        assert_eq!(tracker.assistant.active_tab(), AssistantAction::Review);
    }
}
