use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, Response, StatusCode},
    middleware::Next,
};
use base64::{engine::general_purpose::STANDARD as base64, Engine};

use crate::AppState;

fn unauthorized() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        header::HeaderValue::from_static("Basic realm=\"Please enter your credentials\""),
    );
    response
}

/// Decodes `Authorization: Basic ...` into a username and password.
pub fn parse_basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))?;

    let decoded = base64.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (username, password) = credentials.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

pub async fn basic_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    match parse_basic_credentials(&headers) {
        Some((username, password))
            if username == state.config.dashboard_username
                && password == state.config.dashboard_password =>
        {
            next.run(request).await
        }
        _ => unauthorized(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn decodes_basic_credentials() {
        let encoded = base64.encode("admin:s3cr:et");
        let headers = headers_with(&format!("Basic {encoded}"));

        assert_eq!(
            parse_basic_credentials(&headers),
            Some(("admin".to_string(), "s3cr:et".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(parse_basic_credentials(&HeaderMap::new()), None);
        assert_eq!(parse_basic_credentials(&headers_with("Bearer abc")), None);
        assert_eq!(parse_basic_credentials(&headers_with("Basic !!!")), None);
        let no_colon = base64.encode("admin");
        assert_eq!(
            parse_basic_credentials(&headers_with(&format!("Basic {no_colon}"))),
            None
        );
    }

    #[test]
    fn unauthorized_response_asks_for_credentials() {
        let response = unauthorized();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
