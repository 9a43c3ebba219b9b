//! RPC method handler for the eztag JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the [`App`] controller and
//! shapes its result as JSON.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::navigation_manager::NavigationManagerTrait;
use crate::managers::repository_manager::SortKey;
use crate::managers::session_manager::SessionManagerTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::tag_creator::NewTag;
use crate::types::navigation::NavigationState;

fn str_param<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(|v| v.as_str())
}

fn required<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    str_param(params, name).ok_or_else(|| format!("missing {}", name))
}

fn sort_key(params: &Value) -> Result<SortKey, String> {
    required(params, "key")?.parse()
}

fn screen(state: &NavigationState) -> Result<Value, String> {
    let mut value = serde_json::to_value(state).map_err(|e| e.to_string())?;
    if let Value::Object(map) = &mut value {
        map.insert("fragment".to_string(), json!(state.fragment()));
    }
    Ok(value)
}

fn detail(app: &App) -> Result<Value, String> {
    Ok(json!({
        "screen": screen(app.current_screen())?,
        "branches": app.repositories.branches(),
        "tags": app.repositories.tags(),
    }))
}

fn auth_status(app: &App) -> Value {
    let session = app.session_manager.snapshot();
    json!({
        "authenticated": session.is_authenticated(),
        "user": session.user(),
        "sign_in_available": app.client_id().is_some(),
    })
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with a displayable message.
pub async fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Lifecycle / auth ───
        "app.init" => {
            let callback = match (str_param(params, "code"), str_param(params, "state")) {
                (Some(code), Some(state)) => Some((code, state)),
                _ => None,
            };
            app.initialize(callback).await.map_err(|e| e.to_string())?;
            Ok(json!({"screen": screen(app.current_screen())?, "auth": auth_status(app)}))
        }
        "auth.sign_in" => {
            let url = app.begin_sign_in().map_err(|e| e.to_string())?;
            Ok(json!({"url": url}))
        }
        "auth.callback" => {
            let code = required(params, "code")?;
            let state = required(params, "state")?;
            app.complete_sign_in(code, state).await.map_err(|e| e.to_string())?;
            Ok(json!({"screen": screen(app.current_screen())?, "auth": auth_status(app)}))
        }
        "auth.sign_out" => {
            app.sign_out().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "auth.status" => Ok(auth_status(app)),

        // ─── Repositories ───
        "repos.list" => {
            if params.get("refresh").and_then(|v| v.as_bool()).unwrap_or(false) {
                app.load_repositories().await.map_err(|e| e.to_string())?;
            }
            Ok(json!(app.repositories.repositories()))
        }
        "repos.filter" => {
            let query = str_param(params, "query").unwrap_or("");
            Ok(json!(app.repositories.filter(query)))
        }
        "repos.sort" => {
            app.sort_repositories(sort_key(params)?);
            Ok(json!(app.repositories.repositories()))
        }
        "repo.open" => {
            let full_name = required(params, "full_name")?;
            let skip_history = params
                .get("skip_history")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            app.open_repository(full_name, skip_history)
                .await
                .map_err(|e| e.to_string())?;
            detail(app)
        }
        "branches.sort" => {
            app.sort_branches(sort_key(params)?);
            Ok(json!(app.repositories.branches()))
        }
        "tags.sort" => {
            app.sort_tags(sort_key(params)?);
            Ok(json!(app.repositories.tags()))
        }
        "tag.create" => {
            let input = NewTag {
                name: str_param(params, "name").unwrap_or("").to_string(),
                message: str_param(params, "message").map(str::to_string),
                branch: str_param(params, "branch").map(str::to_string),
            };
            let created = app.create_tag(input).await.map_err(|e| e.to_string())?;
            Ok(json!({
                "name": created.name,
                "sha": created.sha,
                "ref": created.ref_name,
                "tags": app.repositories.tags(),
            }))
        }

        // ─── Navigation ───
        "nav.back" => {
            app.go_back().await.map_err(|e| e.to_string())?;
            detail(app)
        }
        "nav.forward" => {
            app.go_forward().await.map_err(|e| e.to_string())?;
            detail(app)
        }
        "nav.current" => Ok(json!({
            "screen": screen(app.current_screen())?,
            "cursor": app.navigation.cursor(),
            "depth": app.navigation.history().len(),
        })),

        // ─── Settings ───
        "settings.get" => {
            serde_json::to_value(app.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = required(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            // Saved immediately; clients pick up new endpoints on next start.
            app.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
