use crate::controller::{Controller, UuidGenerator};
use crate::db::{self, SqliteSlot};
use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::types::{AppState, Request};
use crate::render::NumberFormat;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Open (or create) a workspace and load its schedule into a fresh session.
pub fn select_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    let slot = SqliteSlot::new(conn, state.settings.storage_key.clone());
    let format = NumberFormat::for_locale(&state.settings.locale);

    state.session = Some(Controller::open(slot, UuidGenerator, format));
    state.workspace = Some(path.to_path_buf());
    info!(workspace = %path.to_string_lossy(), "workspace selected");
    Ok(())
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, ErrorCode::BadParams, "missing params.path", None);
    };

    if let Err(e) = select_workspace(state, &path) {
        return err(&req.id, ErrorCode::DbOpenFailed, format!("{e:#}"), None);
    }

    let view = state.session.as_ref().map(|s| s.view());
    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "view": view,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
