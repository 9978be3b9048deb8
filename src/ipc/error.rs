use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadParams,
    NoWorkspace,
    DbOpenFailed,
    ExportFailed,
    ImportFailed,
    NotImplemented,
}

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Reply for schedule methods called before `workspace.select`.
pub fn no_workspace(id: &str) -> serde_json::Value {
    err(id, ErrorCode::NoWorkspace, "select a workspace first", None)
}
