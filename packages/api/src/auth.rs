// ABOUTME: Token authentication middleware for the card sync endpoints
// ABOUTME: Resolves X-Token-Username/X-Token-Secret to a token before handlers run

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use catima_security::AuthToken;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the token name
pub const TOKEN_USERNAME_HEADER: &str = "X-Token-Username";

/// Header carrying the plaintext token secret
pub const TOKEN_SECRET_HEADER: &str = "X-Token-Secret";

/// The verified token, available to handlers as a request extension
#[derive(Debug, Clone)]
pub struct AuthenticatedToken(pub AuthToken);

impl AuthenticatedToken {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }
}

/// Non-UTF-8 values count as absent
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

pub async fn token_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = {
        let headers = request.headers();
        let name = header_value(headers, TOKEN_USERNAME_HEADER);
        let secret = header_value(headers, TOKEN_SECRET_HEADER);
        state.authenticator.authenticate(name, secret).await?
    };

    debug!(
        path = %request.uri().path(),
        token_name = %token.token_name,
        "Token validated successfully"
    );

    request.extensions_mut().insert(AuthenticatedToken(token));
    Ok(next.run(request).await)
}
