//! Request handlers for the portal surface.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use snackquest_execution::resolve_outcome;
use snackquest_types::{
    api::{
        AdminLoginRequest, ErrorResponse, LoginRequest, RewardRequest, RewardResponse,
        SelectCharacterRequest,
    },
    Balances, Character, EngineError, NewUser, User, UserSummary,
};
use tracing::{error, info};

use crate::{cookies, AppState};

/// Engine errors rendered as HTTP responses. Storage and internal
/// failures are logged here and surfaced as generic retryable errors.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            EngineError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid credentials"),
            EngineError::InvalidAdminPassword => {
                (StatusCode::UNAUTHORIZED, "invalid admin password")
            }
            EngineError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            EngineError::NotFound => (StatusCode::NOT_FOUND, "user not found"),
            EngineError::Validation(message) => (StatusCode::BAD_REQUEST, message.as_str()),
            EngineError::Persistence(err) => {
                error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage unavailable, please retry",
                )
            }
            EngineError::Internal(message) => {
                error!(message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

/// Resolve the session cookie to a user id, or fail `Unauthorized`.
fn session_user(state: &AppState, jar: &CookieJar) -> Result<i64, EngineError> {
    jar.get(cookies::SESSION_COOKIE)
        .and_then(|cookie| state.authority.validate_session(cookie.value()))
        .ok_or(EngineError::Unauthorized)
}

/// Resolve the session cookie to the account it names. A structurally
/// valid token whose account has since been deleted is just an invalid
/// session, not a storage error.
async fn session_account(state: &AppState, jar: &CookieJar) -> Result<User, EngineError> {
    let user_id = session_user(state, jar)?;
    state
        .store
        .user_by_id(user_id)
        .await?
        .ok_or(EngineError::Unauthorized)
}

/// Unwrap a deferred body extraction after the auth gate has passed, so
/// an unauthenticated request with a bad body still reads as 401.
fn request_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, EngineError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => Err(EngineError::Validation(rejection.body_text())),
    }
}

/// Check the elevated-access cookie, or fail `Unauthorized` before any
/// directory operation touches storage.
fn require_admin(state: &AppState, jar: &CookieJar) -> Result<(), EngineError> {
    let valid = jar
        .get(cookies::ADMIN_COOKIE)
        .is_some_and(|cookie| state.authority.validate_admin_access(cookie.value()));
    if valid {
        Ok(())
    } else {
        Err(EngineError::Unauthorized)
    }
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(new_user): Json<NewUser>,
) -> Result<(CookieJar, Json<UserSummary>), ApiError> {
    let user = state.store.register(&new_user).await?;
    let token = state.authority.issue_session(user.id);
    Ok((jar.add(cookies::session(token)), Json(user.summary())))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserSummary>), ApiError> {
    let user = state
        .authority
        .authenticate(&state.store, &request.identifier, &request.password)
        .await?;
    info!(user_id = user.id, "login");
    let token = state.authority.issue_session(user.id);
    Ok((jar.add(cookies::session(token)), Json(user.summary())))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (cookies::clear_all(jar), StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UserSummary>, ApiError> {
    let user = session_account(&state, &jar).await?;
    Ok(Json(user.summary()))
}

pub async fn resources(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Balances>, ApiError> {
    let user = session_account(&state, &jar).await?;
    Ok(Json(state.store.balances(user.id).await?))
}

pub async fn characters(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<Character>>, ApiError> {
    let user = session_account(&state, &jar).await?;
    Ok(Json(state.store.owned_characters(user.id).await?))
}

pub async fn select_character(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<SelectCharacterRequest>, JsonRejection>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let user = session_account(&state, &jar).await?;
    let request = request_body(body)?;
    if !state
        .store
        .owns_character(user.id, request.character_id)
        .await?
    {
        return Err(EngineError::Validation("character not owned".into()).into());
    }
    Ok((
        jar.add(cookies::character(request.character_id)),
        StatusCode::NO_CONTENT,
    ))
}

pub async fn game_reward(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<RewardRequest>, JsonRejection>,
) -> Result<Json<RewardResponse>, ApiError> {
    let user = session_account(&state, &jar).await?;
    let request = request_body(body)?;

    // Scoped so the thread-local rng is dropped before any await.
    let outcome = {
        let mut rng = rand::thread_rng();
        resolve_outcome(
            &state.rewards,
            request.defeated_monsters,
            request.victory,
            &mut rng,
        )
    };

    // A zero grant is a valid no-op; skip the ledger write entirely.
    if outcome.is_zero() {
        return Ok(Json(RewardResponse {
            success: true,
            granted: false,
            skipped: Some(true),
            obtained_snack: outcome.kill_grant,
            win_bonus: outcome.bonus_grant,
            defeated_monsters: outcome.defeated_monsters,
            kill_reward_packs: outcome.kill_packs,
            victory_bonus: outcome.bonus_packs,
            resources: None,
        }));
    }

    let balances = state.store.grant(user.id, &outcome.total_grant()).await?;
    info!(
        user_id = user.id,
        defeated = outcome.defeated_monsters,
        packs = outcome.kill_packs + outcome.bonus_packs,
        "reward granted"
    );
    Ok(Json(RewardResponse {
        success: true,
        granted: true,
        skipped: None,
        obtained_snack: outcome.kill_grant,
        win_bonus: outcome.bonus_grant,
        defeated_monsters: outcome.defeated_monsters,
        kill_reward_packs: outcome.kill_packs,
        victory_bonus: outcome.bonus_packs,
        resources: Some(balances),
    }))
}

pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<AdminLoginRequest>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let token = state.authority.issue_admin_access(&request.password)?;
    Ok((jar.add(cookies::admin(token)), StatusCode::NO_CONTENT))
}

pub async fn admin_list_users(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    require_admin(&state, &jar)?;
    Ok(Json(state.store.list_users().await?))
}

pub async fn admin_set_authorization(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<i64>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<UserSummary>, ApiError> {
    require_admin(&state, &jar)?;
    // The flag must be a real boolean; "true" the string is a 400.
    let authorized = request_body(body)?
        .get("authorized")
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| EngineError::Validation("authorized must be a boolean".into()))?;
    Ok(Json(state.store.set_authorization(user_id, authorized).await?))
}

pub async fn admin_reset_resources(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<i64>,
) -> Result<Json<Balances>, ApiError> {
    require_admin(&state, &jar)?;
    // Resetting a missing account is a 404, not a silent no-op.
    state
        .store
        .user_by_id(user_id)
        .await?
        .ok_or(EngineError::NotFound)?;
    let balances = state.store.reset_resources(user_id).await?;
    info!(user_id, "resources reset");
    Ok(Json(balances))
}

pub async fn admin_delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&state, &jar)?;
    let deleted = state.store.delete_user(user_id).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
