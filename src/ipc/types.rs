use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Settings;
use crate::controller::{Controller, UuidGenerator};
use crate::db::SqliteSlot;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub type Session = Controller<SqliteSlot, UuidGenerator>;

pub struct AppState {
    pub settings: Settings,
    pub workspace: Option<PathBuf>,
    pub session: Option<Session>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            workspace: None,
            session: None,
        }
    }
}
