use crate::backup;
use crate::ipc::error::{err, no_workspace, ok, ErrorCode};
use crate::ipc::types::{AppState, Request};
use crate::store;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

fn path_param(req: &Request, key: &str) -> Option<PathBuf> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn handle_export_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return no_workspace(&req.id);
    };
    let Some(out_path) = path_param(req, "outPath") else {
        return err(&req.id, ErrorCode::BadParams, "missing outPath", None);
    };

    let entries_json = match serde_json::to_string(session.entries()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, ErrorCode::ExportFailed, e.to_string(), None),
    };

    match backup::export_schedule_bundle(&entries_json, session.entries().len(), &out_path) {
        Ok(summary) => {
            info!(path = %out_path.to_string_lossy(), entries = summary.entry_count, "schedule exported");
            ok(
                &req.id,
                json!({
                    "bundleFormat": summary.bundle_format,
                    "entryCount": summary.entry_count,
                    "sha256": summary.sha256,
                    "outPath": out_path.to_string_lossy(),
                }),
            )
        }
        Err(e) => err(&req.id, ErrorCode::ExportFailed, format!("{e:#}"), None),
    }
}

fn handle_import_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(in_path) = path_param(req, "inPath") else {
        return err(&req.id, ErrorCode::BadParams, "missing inPath", None);
    };

    let bundle = match backup::import_schedule_bundle(&in_path) {
        Ok(v) => v,
        Err(e) => return err(&req.id, ErrorCode::ImportFailed, format!("{e:#}"), None),
    };
    let entries = match store::parse_entries(&bundle.entries_json) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                ErrorCode::ImportFailed,
                format!("entries.json is not a schedule: {e}"),
                None,
            )
        }
    };

    let imported = entries.len();
    let persisted = session.replace_all(entries);
    info!(path = %in_path.to_string_lossy(), entries = imported, "schedule imported");
    ok(
        &req.id,
        json!({
            "bundleFormat": bundle.bundle_format,
            "imported": imported,
            "persisted": persisted,
            "view": session.view(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schedule.exportBundle" => Some(handle_export_bundle(state, req)),
        "schedule.importBundle" => Some(handle_import_bundle(state, req)),
        _ => None,
    }
}
