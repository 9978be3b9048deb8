use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::{err, ErrorCode};

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::schedule::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::form::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::bundle::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        ErrorCode::NotImplemented,
        format!("unknown method: {}", req.method),
        None,
    )
}
