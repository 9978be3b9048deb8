use crate::controller::{ClearOutcome, SubmitOutcome, CLEAR_ALL_PROMPT};
use crate::ipc::error::{err, no_workspace, ok, ErrorCode};
use crate::ipc::types::{AppState, Request};
use crate::validate::Field;
use serde_json::json;

/// Form values may arrive as strings, or as a number for `duration`.
fn param_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn handle_schedule_view(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return no_workspace(&req.id);
    };
    ok(&req.id, json!({ "view": session.view() }))
}

fn handle_schedule_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return no_workspace(&req.id);
    };

    for field in Field::ALL {
        if let Some(v) = req.params.get(field.name()) {
            session.edit_field(field, param_text(v));
        }
    }

    match session.submit() {
        SubmitOutcome::Rejected(errors) => ok(&req.id, json!({ "errors": errors })),
        SubmitOutcome::Added { entry, persisted } => ok(
            &req.id,
            json!({
                "entry": entry,
                "persisted": persisted,
                "view": session.view(),
                "form": session.form(),
            }),
        ),
    }
}

fn handle_schedule_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return no_workspace(&req.id);
    };

    let id = match req.params.get("id").and_then(|v| v.as_str()) {
        Some(v) => v.to_string(),
        None => return err(&req.id, ErrorCode::BadParams, "missing id", None),
    };

    let outcome = session.delete(&id);
    ok(
        &req.id,
        json!({
            "removed": outcome.removed,
            "persisted": outcome.persisted,
            "view": session.view(),
        }),
    )
}

fn handle_schedule_clear_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return no_workspace(&req.id);
    };

    // The UI prompts the user and resends with `confirmed` set.
    let confirmed = req.params.get("confirmed").and_then(|v| v.as_bool());
    let mut answer = |_: &str| confirmed.unwrap_or(false);

    let mut result = match session.clear_all(&mut answer) {
        ClearOutcome::AlreadyEmpty => json!({ "cleared": false }),
        ClearOutcome::Declined => json!({
            "cleared": false,
            "needsConfirmation": confirmed.is_none(),
            "confirmationMessage": CLEAR_ALL_PROMPT,
        }),
        ClearOutcome::Cleared { persisted } => json!({
            "cleared": true,
            "persisted": persisted,
        }),
    };

    result["view"] = json!(session.view());
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schedule.view" => Some(handle_schedule_view(state, req)),
        "schedule.submit" => Some(handle_schedule_submit(state, req)),
        "schedule.delete" => Some(handle_schedule_delete(state, req)),
        "schedule.clearAll" => Some(handle_schedule_clear_all(state, req)),
        _ => None,
    }
}
