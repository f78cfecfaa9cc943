//! HTTP API Client
//!
//! Functions for communicating with the Credalysis REST backend. Routes and
//! wire types come from the `credalysis` crate so the browser and the CLI
//! address the same endpoints.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use credalysis::backend::{routes, AskRequest, BackendError, ErrorDetail};
use credalysis::models::{
    decode_goals, decode_loans, AgentReply, AskReply, Goal, GoalPayload, Identity, Loan,
};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const API_BASE_KEY: &str = "credalysis_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

fn url(path: &str) -> String {
    routes::join(&get_api_base(), path)
}

fn network_error(e: gloo_net::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

/// Map a non-2xx response to a status error carrying the `detail` text
async fn ensure_ok(response: Response) -> Result<Response, BackendError> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let detail = response
        .json::<ErrorDetail>()
        .await
        .ok()
        .and_then(ErrorDetail::into_message);
    Err(BackendError::Status { status, detail })
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json()
        .await
        .map_err(|e| BackendError::Malformed(e.to_string()))
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, BackendError> {
    let response = Request::get(&url(path))
        .send()
        .await
        .map_err(network_error)?;
    parse(ensure_ok(response).await?).await
}

// ============ API Functions ============

/// Ask the AI assistant; resolves the reply text
pub async fn ask(identity: &Identity, query: &str) -> Result<String, BackendError> {
    let body = AskRequest {
        email: identity.to_string(),
        query: query.to_string(),
    };

    let response = Request::post(&url(routes::ASK))
        .json(&body)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;

    let reply: AskReply = parse(ensure_ok(response).await?).await?;
    Ok(reply.into_text())
}

/// Fetch every goal of the user
pub async fn list_goals(identity: &Identity) -> Result<Vec<Goal>, BackendError> {
    let body: serde_json::Value = get(&routes::goals(identity)).await?;
    Ok(decode_goals(body))
}

pub async fn create_goal(payload: &GoalPayload) -> Result<(), BackendError> {
    let response = Request::post(&url(routes::GOALS))
        .json(payload)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;
    ensure_ok(response).await.map(|_| ())
}

/// Update the goal stored under `goal_name`
pub async fn update_goal(
    identity: &Identity,
    goal_name: &str,
    payload: &GoalPayload,
) -> Result<(), BackendError> {
    let response = Request::put(&url(&routes::goal(identity, goal_name)))
        .json(payload)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;
    ensure_ok(response).await.map(|_| ())
}

pub async fn delete_goal(identity: &Identity, goal_name: &str) -> Result<(), BackendError> {
    let response = Request::delete(&url(&routes::goal(identity, goal_name)))
        .send()
        .await
        .map_err(network_error)?;
    ensure_ok(response).await.map(|_| ())
}

pub async fn goal_review(identity: &Identity, question: &str) -> Result<AgentReply, BackendError> {
    get(&routes::goal_review(identity, question)).await
}

pub async fn goal_advice(identity: &Identity) -> Result<AgentReply, BackendError> {
    get(&routes::goal_advice(identity)).await
}

pub async fn goal_scenario(
    identity: &Identity,
    description: &str,
) -> Result<AgentReply, BackendError> {
    get(&routes::goal_scenario(identity, description)).await
}

/// Fetch the user's loans
pub async fn list_loans(identity: &Identity) -> Result<Vec<Loan>, BackendError> {
    let body: serde_json::Value = get(&routes::loans(identity)).await?;
    Ok(decode_loans(body))
}
