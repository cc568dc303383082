use axum::{
    Json, RequestPartsExt,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use platform_api::{ApiError, ApiResult, Envelope};
use platform_authn::{
    AuthnError, Credentials, Registration, UserProfile, decode_token, issue_token,
};
use serde::Serialize;
use tracing::debug;

use crate::{http::AppState, payload::JsonBody};

/// Account resolved from a verified bearer token.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserProfile);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::unauthorized())?;

        let claims = decode_token(bearer.token(), &state.config.auth).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            ApiError::unauthorized()
        })?;

        // Tokens outlive deleted accounts; the account must still exist.
        let profile = state
            .accounts
            .find(claims.sub)
            .await
            .map_err(ApiError::internal)?
            .ok_or_else(ApiError::unauthorized)?;
        Ok(CurrentUser(profile))
    }
}

/// Login and registration body. Clients read `user` and `token` at the top level.
#[derive(Serialize)]
pub struct Session {
    success: bool,
    message: &'static str,
    user: UserProfile,
    token: String,
}

fn session_for(user: UserProfile, message: &'static str, state: &AppState) -> ApiResult<Session> {
    let token = issue_token(user.id, &user.email, &state.config.auth).map_err(ApiError::internal)?;
    Ok(Session {
        success: true,
        message,
        user,
        token,
    })
}

fn auth_error(err: AuthnError) -> ApiError {
    match err {
        AuthnError::InvalidRegistration(errors) => {
            ApiError::validation("Registration failed", errors)
        }
        AuthnError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".into()),
        AuthnError::InvalidToken(_) | AuthnError::TokenExpired => ApiError::unauthorized(),
        other => ApiError::internal(other),
    }
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<Registration>,
) -> ApiResult<Response> {
    let user = state.accounts.register(input).await.map_err(auth_error)?;
    let session = session_for(user, "User registered successfully", &state)?;
    Ok((StatusCode::CREATED, Json(session)).into_response())
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> ApiResult<Json<Session>> {
    let user = state.accounts.login(credentials).await.map_err(auth_error)?;
    Ok(Json(session_for(user, "Logged in successfully", &state)?))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<Envelope<UserProfile>> {
    Json(Envelope::data(user))
}
