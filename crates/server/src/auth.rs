//! Session tokens and the authentication endpoints.
//!
//! A successful register or login returns an HS256 JWT in the body and in
//! the `access_token` cookie. Protected routes accept either the cookie or an
//! `Authorization: Bearer` header.

use api_types::{
    auth::{Login, Register, Session},
    user::UserView,
};
use axum::{
    Extension, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use engine::{Role, User, UserNew};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, server::ServerState, users::map_user};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Token settings, read from the `auth` section of the configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    /// Mark the session cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_token_ttl_minutes() -> i64 {
    24 * 60
}

/// Claims carried by an access token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated caller, inserted into request extensions by
/// [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = ServerError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = Role::try_from(claims.role.as_str())
            .map_err(|_| ServerError::Unauthorized("malformed token claims".to_string()))?;
        Ok(Self {
            id: claims.sub,
            email: claims.email,
            role,
        })
    }
}

pub struct JwtService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a token for `user`, returning it with its lifetime in seconds.
    pub fn issue(&self, user: &User) -> Result<(String, i64), ServerError> {
        let now = Utc::now();
        let ttl = Duration::minutes(self.config.token_ttl_minutes);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| {
                tracing::error!("failed to sign access token: {err}");
                ServerError::Internal
            })?;
        Ok((token, ttl.num_seconds()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, ServerError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => {
                    ServerError::Unauthorized("token expired".to_string())
                }
                _ => ServerError::Unauthorized("invalid token".to_string()),
            })
    }

    fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((ACCESS_TOKEN_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.config.cookie_secure)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// Middleware guarding protected routes.
pub async fn require_auth(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = match (&bearer, jar.get(ACCESS_TOKEN_COOKIE)) {
        (Some(TypedHeader(header)), _) => header.token().to_string(),
        (None, Some(cookie)) => cookie.value().to_string(),
        (None, None) => {
            tracing::warn!(uri = %request.uri(), "missing access token");
            return Err(ServerError::Unauthorized(
                "missing access token".to_string(),
            ));
        }
    };

    let claims = state.jwt.validate(&token).inspect_err(|err| {
        tracing::warn!(uri = %request.uri(), "rejected access token: {err}");
    })?;
    let user = CurrentUser::try_from(claims)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn session(
    state: &ServerState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Json<Session>), ServerError> {
    let (token, expires_in) = state.jwt.issue(&user)?;
    let jar = jar.add(state.jwt.session_cookie(token.clone()));
    Ok((
        jar,
        Json(Session {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: map_user(user),
        }),
    ))
}

pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, CookieJar, Json<Session>), ServerError> {
    payload.validate()?;

    let user = state
        .engine
        .register_user(UserNew::new(payload.email, payload.name, payload.password))
        .await?;
    let (jar, body) = session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, body))
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<Login>,
) -> Result<(CookieJar, Json<Session>), ServerError> {
    payload.validate()?;

    let user = state
        .engine
        .authenticate(&payload.email, &payload.password)
        .await
        .inspect_err(|_| tracing::warn!("failed login attempt"))?;
    session(&state, jar, user)
}

pub async fn me(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(user.id, user.id).await?;
    Ok(Json(map_user(user)))
}

/// Drop the session cookie. Bearer tokens stay valid until they expire.
pub async fn logout(
    Extension(_user): Extension<CurrentUser>,
    jar: CookieJar,
) -> (StatusCode, CookieJar) {
    let jar = jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"));
    (StatusCode::NO_CONTENT, jar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(ttl: i64) -> JwtService {
        JwtService::new(AuthConfig {
            jwt_secret: "test-secret-with-enough-entropy-0123456789".to_string(),
            token_ttl_minutes: ttl,
            cookie_secure: false,
        })
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_validates() {
        let jwt = service(60);
        let user = user();
        let (token, expires_in) = jwt.issue(&user).unwrap();
        assert_eq!(expires_in, 3600);

        let current = CurrentUser::try_from(jwt.validate(&token).unwrap()).unwrap();
        assert_eq!(current.id, user.id);
        assert_eq!(current.role, Role::Admin);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service(-10);
        let (token, _) = jwt.issue(&user()).unwrap();
        assert!(matches!(
            jwt.validate(&token),
            Err(ServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let (token, _) = service(60).issue(&user()).unwrap();
        let other = JwtService::new(AuthConfig {
            jwt_secret: "a-completely-different-secret-9876543210".to_string(),
            token_ttl_minutes: 60,
            cookie_secure: false,
        });
        assert!(other.validate(&token).is_err());
    }
}
