// src/handlers/mod.rs

use axum::Json;
use serde::Serialize;
use serde_json::{Value, json};

pub mod admin;
pub mod assignments;
pub mod leaderboard;
pub mod scores;

/// Wraps a payload in the `{"success": true, "data": ...}` envelope.
pub fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
    }))
}
