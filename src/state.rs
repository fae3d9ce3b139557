// src/state.rs

use axum::extract::FromRef;

use crate::{config::Config, scoring::ScoreService};

#[derive(Clone)]
pub struct AppState {
    pub scores: ScoreService,
    pub config: Config,
}

impl FromRef<AppState> for ScoreService {
    fn from_ref(state: &AppState) -> Self {
        state.scores.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
