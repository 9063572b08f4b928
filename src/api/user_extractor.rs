use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};

use crate::model::{Actor, ErrorResponse, Role};

/// Axum extractor for the acting user.
///
/// The actor is supplied by the authentication layer in front of this
/// service through request headers:
/// - X-User-Name: display name of the verified user
/// - X-User-Role: one of `admin`, `faculty`, `student`
///
/// Requests without a name or with an unknown role are rejected with 401.
#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_headers(&parts.headers).map_err(|message| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(&message)),
            )
        })
    }
}

fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, String> {
    let name = extract_header_value(headers, "x-user-name")
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| "Missing X-User-Name header".to_string())?;
    let role = extract_header_value(headers, "x-user-role")
        .ok_or_else(|| "Missing X-User-Role header".to_string())?
        .parse::<Role>()?;

    Ok(Actor {
        name: name.trim().to_string(),
        role,
    })
}

/// Extract header value as string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}
