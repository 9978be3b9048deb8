use crate::ipc::error::{err, no_workspace, ok, ErrorCode};
use crate::ipc::types::{AppState, Request};
use crate::validate::Field;
use serde_json::json;

fn handle_form_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return no_workspace(&req.id);
    };

    let Some(name) = req.params.get("field").and_then(|v| v.as_str()) else {
        return err(&req.id, ErrorCode::BadParams, "missing field", None);
    };
    let Some(field) = Field::from_name(name) else {
        return err(
            &req.id,
            ErrorCode::BadParams,
            format!("unknown field: {name}"),
            Some(json!({ "fields": Field::ALL.map(Field::name) })),
        );
    };
    let value = req
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    session.edit_field(field, value);
    ok(&req.id, json!({ "form": session.form() }))
}

fn handle_form_state(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return no_workspace(&req.id);
    };
    ok(&req.id, json!({ "form": session.form() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "form.edit" => Some(handle_form_edit(state, req)),
        "form.state" => Some(handle_form_state(state, req)),
        _ => None,
    }
}
