//! Pre-connection credential and identity check.
//!
//! Runs inside the WebSocket upgrade: the connection is accepted only if
//! the shared-secret header matches the configured value and a non-blank
//! participant name is supplied. Rejections happen at the HTTP layer,
//! before any protocol message is exchanged.

use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request};
use tokio_tungstenite::tungstenite::http::StatusCode;

/// Header carrying the shared network secret.
pub const SECRET_HEADER: &str = "NetworkSecret";
/// Header carrying the participant's display name.
pub const PLAYER_NAME_HEADER: &str = "PlayerName";

/// Validates the upgrade request against the configured secret.
///
/// Returns the supplied player name on success. Missing or blank headers
/// are a 400; a wrong secret is a 401.
pub fn check_handshake(request: &Request, secret: &str) -> Result<String, ErrorResponse> {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    let Some(supplied_secret) = header(SECRET_HEADER) else {
        return Err(reject(StatusCode::BAD_REQUEST));
    };
    let Some(player_name) = header(PLAYER_NAME_HEADER) else {
        return Err(reject(StatusCode::BAD_REQUEST));
    };
    if player_name.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST));
    }
    if supplied_secret != secret {
        return Err(reject(StatusCode::UNAUTHORIZED));
    }

    Ok(player_name.to_string())
}

fn reject(status: StatusCode) -> ErrorResponse {
    let mut response = ErrorResponse::new(None);
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = Request::builder().uri("ws://localhost/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn accepts_matching_secret_and_name() {
        let req = request(&[(SECRET_HEADER, "s3cret"), (PLAYER_NAME_HEADER, "alice")]);
        assert_eq!(check_handshake(&req, "s3cret").unwrap(), "alice");
    }

    #[test]
    fn rejects_missing_headers_with_bad_request() {
        let req = request(&[(SECRET_HEADER, "s3cret")]);
        let rejection = check_handshake(&req, "s3cret").unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);

        let req = request(&[(PLAYER_NAME_HEADER, "alice")]);
        let rejection = check_handshake(&req, "s3cret").unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejects_blank_name_with_bad_request() {
        let req = request(&[(SECRET_HEADER, "s3cret"), (PLAYER_NAME_HEADER, "   ")]);
        let rejection = check_handshake(&req, "s3cret").unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejects_wrong_secret_with_unauthorized() {
        let req = request(&[(SECRET_HEADER, "wrong"), (PLAYER_NAME_HEADER, "alice")]);
        let rejection = check_handshake(&req, "s3cret").unwrap_err();
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }
}
