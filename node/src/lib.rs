//! HTTP node for the snackquest portal.
//!
//! The engine never sees cookies; this crate is the web-transport
//! adapter that turns cookies into token strings and engine errors into
//! status codes.

use axum::{
    http::{header, Method},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use snackquest_execution::{RewardSchedule, SessionAuthority, Store};
use tower_http::cors::{Any, CorsLayer};

mod api;
mod cookies;


/// Node configuration, loadable from a YAML file. Every field has a
/// development default; deployments must override both secrets.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub session_secret: String,
    pub admin_password: String,
    pub log_level: String,
    pub rewards: RewardSchedule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: "sqlite://snackquest.db".to_string(),
            session_secret: "dev-session-secret".to_string(),
            admin_password: "dev-admin-password".to_string(),
            log_level: "info".to_string(),
            rewards: RewardSchedule::default(),
        }
    }
}

impl Config {
    pub fn uses_default_secrets(&self) -> bool {
        let defaults = Config::default();
        self.session_secret == defaults.session_secret
            || self.admin_password == defaults.admin_password
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub authority: SessionAuthority,
    pub rewards: RewardSchedule,
}

impl AppState {
    pub fn new(store: Store, config: &Config) -> Self {
        // Re-sort the step table in case a config file listed it out of order.
        let rewards = RewardSchedule::new(
            config.rewards.steps.clone(),
            config.rewards.total_required,
            config.rewards.victory_bonus_packs,
        );
        Self {
            store,
            authority: SessionAuthority::new(&config.session_secret, &config.admin_password),
            rewards,
        }
    }
}

/// Build the portal router. Rate limiting is layered on by `main` so
/// in-process callers (tests included) get the bare routes.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/register", post(api::register))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .route("/api/me", get(api::me))
        .route("/api/resources", get(api::resources))
        .route("/api/characters", get(api::characters))
        .route("/api/characters/select", post(api::select_character))
        .route("/api/game/reward", post(api::game_reward))
        .route("/api/admin/login", post(api::admin_login))
        .route("/api/admin/users", get(api::admin_list_users))
        .route(
            "/api/admin/users/:id/authorization",
            put(api::admin_set_authorization),
        )
        .route("/api/admin/users/:id", delete(api::admin_delete_user))
        .route(
            "/api/admin/users/:id/resources",
            delete(api::admin_reset_resources),
        )
        .layer(cors)
        .with_state(state)
}
