use crate::{errors::ApiError, AppState};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use registrar_core::NewUser;
use serde::Serialize;
use std::sync::Arc;

const ALLOWED_HEADERS: &str = "Content-Type";
const ALLOWED_METHODS: &str = "OPTIONS,POST,GET";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserResponse {
    message: &'static str,
    user_id: String,
}

/// Single entry point for every path; requests are routed by method only.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    match method {
        Method::OPTIONS => preflight(&state).into_response(),
        Method::POST => create_user(&state, &body).await.into_response(),
        other => {
            tracing::debug!(method = %other, "Rejecting unsupported method");
            ApiError::MethodNotAllowed.into_response()
        }
    }
}

fn preflight(state: &AppState) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            ),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, state.allow_origin.clone()),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            ),
        ],
        (),
    )
}

async fn create_user(
    state: &AppState,
    body: &[u8],
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let candidate = NewUser::from_json(body)?;
    let record = state.registrar.register_user(candidate).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully",
            user_id: record.user_id,
        }),
    ))
}
