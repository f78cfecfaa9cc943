//! Credalysis REST API Client
//!
//! HTTP client for the Credalysis backend, built on reqwest.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::{routes, AskRequest, BackendError, ErrorDetail, FinanceBackend};
use crate::models::{
    decode_goals, decode_loans, AgentReply, AskReply, Goal, GoalPayload, Identity, Loan,
};

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout; `None` keeps the transport default
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Credalysis REST API client
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a new client with the given configuration
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        routes::join(&self.config.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl FinanceBackend for BackendClient {
    async fn ask(&self, identity: &Identity, query: &str) -> Result<String, BackendError> {
        let body = AskRequest {
            email: identity.to_string(),
            query: query.to_string(),
        };

        let response = self
            .client
            .post(self.url(routes::ASK))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let reply: AskReply = response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        Ok(reply.into_text())
    }

    async fn list_goals(&self, identity: &Identity) -> Result<Vec<Goal>, BackendError> {
        let body: serde_json::Value = self.get_json(&routes::goals(identity)).await?;
        Ok(decode_goals(body))
    }

    async fn create_goal(&self, payload: &GoalPayload) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(routes::GOALS))
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update_goal(
        &self,
        identity: &Identity,
        goal_name: &str,
        payload: &GoalPayload,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .put(self.url(&routes::goal(identity, goal_name)))
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_goal(&self, identity: &Identity, goal_name: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url(&routes::goal(identity, goal_name)))
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn goal_review(
        &self,
        identity: &Identity,
        question: &str,
    ) -> Result<AgentReply, BackendError> {
        self.get_json(&routes::goal_review(identity, question)).await
    }

    async fn goal_advice(&self, identity: &Identity) -> Result<AgentReply, BackendError> {
        self.get_json(&routes::goal_advice(identity)).await
    }

    async fn goal_scenario(
        &self,
        identity: &Identity,
        description: &str,
    ) -> Result<AgentReply, BackendError> {
        self.get_json(&routes::goal_scenario(identity, description))
            .await
    }

    async fn list_loans(&self, identity: &Identity) -> Result<Vec<Loan>, BackendError> {
        let body: serde_json::Value = self.get_json(&routes::loans(identity)).await?;
        Ok(decode_loans(body))
    }
}

fn transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::Unavailable
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// Turn a non-2xx response into `BackendError::Status`
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorDetail>(&text)
        .ok()
        .and_then(ErrorDetail::into_message);

    tracing::warn!(status = status.as_u16(), detail = ?detail, "Backend returned an error");

    Err(BackendError::Status {
        status: status.as_u16(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalDraft;
    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        routing::{get, post, put},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<String>>>;

    async fn ask(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        match body["query"].as_str().unwrap_or_default() {
            "nested" => (StatusCode::OK, Json(json!({"response": {"response": "deep"}}))),
            "fail" => (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "User not found"})),
            ),
            q => (
                StatusCode::OK,
                Json(json!({"response": format!("{} asked {}", body["email"].as_str().unwrap(), q)})),
            ),
        }
    }

    async fn list_goals(Path(email): Path<String>) -> Json<Value> {
        if email == "empty@example.com" {
            return Json(json!({"goals": "nothing"}));
        }
        Json(json!({"goals": [{"goal_name": "Car", "target_amount": 100.0, "current_amount": 30.0}]}))
    }

    async fn create_goal(State(calls): State<Calls>, Json(body): Json<Value>) -> StatusCode {
        calls.lock().unwrap().push(format!(
            "POST {} {}",
            body["customer_email"].as_str().unwrap(),
            body["goal_name"].as_str().unwrap()
        ));
        StatusCode::CREATED
    }

    async fn update_goal(
        State(calls): State<Calls>,
        Path((email, name)): Path<(String, String)>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        calls.lock().unwrap().push(format!(
            "PUT {} {} -> {}",
            email,
            name,
            body["goal_name"].as_str().unwrap()
        ));
        StatusCode::OK
    }

    async fn delete_goal(
        State(calls): State<Calls>,
        Path((email, name)): Path<(String, String)>,
    ) -> StatusCode {
        calls.lock().unwrap().push(format!("DELETE {} {}", email, name));
        StatusCode::OK
    }

    async fn review(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let question = params.get("user_question").cloned().unwrap_or_default();
        Json(json!({"question_asked": question, "answer": "Looks good"}))
    }

    async fn scenario(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        Json(json!({
            "scenario_description": params.get("scenario_description"),
            "analysis": "**Overview**\nFine."
        }))
    }

    async fn loans(Path(email): Path<String>) -> Json<Value> {
        if email == "empty@example.com" {
            return Json(json!({"loans": {"oops": true}}));
        }
        Json(json!({"loans": [{"product_id": 1, "product_name": "Card", "status": "Active"}]}))
    }

    async fn spawn_backend() -> (BackendClient, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/user/ask-ai", post(ask))
            .route("/users/goals", post(create_goal))
            .route("/users/goals/:email", get(list_goals))
            .route("/users/goals/:email/:name", put(update_goal).delete(delete_goal))
            .route("/users/goals/agent/review/:email", get(review))
            .route(
                "/users/goals/agent/advice/:email",
                get(|| async { Json(json!({"advice": "Hi Ana\n\n*Save"})) }),
            )
            .route("/users/goals/agent/scenario/:email", get(scenario))
            .route("/user/loans/:email", get(loans))
            .with_state(calls.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = BackendClient::new(BackendConfig {
            base_url: format!("http://{}/", addr),
            request_timeout_secs: Some(5),
        })
        .unwrap();
        (client, calls)
    }

    fn ana() -> Identity {
        Identity::new("ana@example.com").unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, None);
    }

    #[tokio::test]
    async fn test_ask_reply_forms() {
        let (client, _) = spawn_backend().await;

        let text = client.ask(&ana(), "budget?").await.unwrap();
        assert_eq!(text, "ana@example.com asked budget?");

        let text = client.ask(&ana(), "nested").await.unwrap();
        assert_eq!(text, "deep");
    }

    #[tokio::test]
    async fn test_ask_error_carries_detail() {
        let (client, _) = spawn_backend().await;

        let err = client.ask(&ana(), "fail").await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Status {
                status: 404,
                detail: Some("User not found".into())
            }
        );
        assert_eq!(err.user_message(), "User not found");
    }

    #[tokio::test]
    async fn test_list_goals() {
        let (client, _) = spawn_backend().await;

        let goals = client.list_goals(&ana()).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal_name, "Car");

        let empty = Identity::new("empty@example.com").unwrap();
        assert!(client.list_goals(&empty).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_goal_mutations_hit_encoded_paths() {
        let (client, calls) = spawn_backend().await;
        let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let goal = GoalDraft::new("Car", 100.0).build(today).unwrap();
        client.create_goal(&GoalPayload::new(&ana(), goal.clone())).await.unwrap();

        let renamed = Goal {
            goal_name: "New Car".into(),
            ..goal
        };
        client
            .update_goal(&ana(), "Car", &GoalPayload::new(&ana(), renamed))
            .await
            .unwrap();
        client.delete_goal(&ana(), "New Car").await.unwrap();

        let calls = calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "POST ana@example.com Car".to_string(),
                "PUT ana@example.com Car -> New Car".to_string(),
                "DELETE ana@example.com New Car".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_assistant_queries() {
        let (client, _) = spawn_backend().await;

        let reply = client.goal_review(&ana(), "Am I on track?").await.unwrap();
        assert_eq!(reply.question_asked.as_deref(), Some("Am I on track?"));
        assert_eq!(reply.answer.as_deref(), Some("Looks good"));

        let reply = client.goal_advice(&ana()).await.unwrap();
        assert_eq!(reply.advice.as_deref(), Some("Hi Ana\n\n*Save"));

        let reply = client
            .goal_scenario(&ana(), "What if I save $200 more?")
            .await
            .unwrap();
        assert_eq!(
            reply.scenario_description.as_deref(),
            Some("What if I save $200 more?")
        );
        assert!(reply.analysis.is_some());
    }

    #[tokio::test]
    async fn test_loans_non_array_is_empty() {
        let (client, _) = spawn_backend().await;

        let loans = client.list_loans(&ana()).await.unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].product_name, "Card");

        let empty = Identity::new("empty@example.com").unwrap();
        assert!(client.list_loans(&empty).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BackendClient::new(BackendConfig {
            base_url: format!("http://{}", addr),
            request_timeout_secs: None,
        })
        .unwrap();

        let err = client.list_goals(&ana()).await.unwrap_err();
        assert_eq!(err, BackendError::Unavailable);
    }
}
