//! Identity: registration, login, JWT issuing and refresh tokens

use super::repository::RepositoryManager;
use super::validation::{password_policy_violations, validate_registration};
use crate::config::JwtConfig;
use crate::contract::error::internal;
use crate::contract::{FieldErrors, Principal, Registration, ServiceError, TokenPair, User};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const REFRESH_TOKEN_BYTES: usize = 32;
const SALT_BYTES: usize = 16;

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    roles: Vec<String>,
    iss: String,
    aud: String,
    iat: u64,
    exp: u64,
}

/// Authentication and token management
#[derive(Clone)]
pub struct AuthenticationService {
    repos: RepositoryManager,
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthenticationService {
    pub fn new(repos: RepositoryManager, config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            repos,
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Register a user and grant the requested roles
    pub async fn register_user(&self, registration: Registration) -> Result<(), ServiceError> {
        validate_registration(&registration)?;

        let user_name = registration
            .user_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let password = registration.password.clone().unwrap_or_default();
        let email = registration.email.clone().filter(|e| !e.is_empty());

        let mut rejected = FieldErrors::new();
        let policy = password_policy_violations(&password);
        if !policy.is_empty() {
            rejected.insert("PasswordTooShort".to_string(), policy);
        }

        let users = self.repos.user();
        if users
            .find_by_user_name(&user_name)
            .await
            .map_err(internal)?
            .is_some()
        {
            rejected.insert(
                "DuplicateUserName".to_string(),
                vec![format!("Username '{user_name}' is already taken.")],
            );
        }
        if let Some(email) = email.as_deref() {
            if users.find_by_email(email).await.map_err(internal)?.is_some() {
                rejected.insert(
                    "DuplicateEmail".to_string(),
                    vec![format!("Email '{email}' is already taken.")],
                );
            }
        }

        let existing = users
            .existing_roles(&registration.roles)
            .await
            .map_err(internal)?;
        let unknown: Vec<String> = registration
            .roles
            .iter()
            .filter(|role| !existing.contains(role))
            .map(|role| format!("Role {role} does not exist."))
            .collect();
        if !unknown.is_empty() {
            rejected.insert("InvalidRole".to_string(), unknown);
        }

        if !rejected.is_empty() {
            tracing::warn!(user_name = %user_name, "registration rejected");
            return Err(ServiceError::Registration { errors: rejected });
        }

        let user = User {
            id: Uuid::new_v4(),
            first_name: registration.first_name,
            last_name: registration.last_name,
            user_name,
            email,
            phone_number: registration.phone_number,
            password_hash: hash_password(password).await?,
            refresh_token: None,
            refresh_token_expiry: None,
        };

        users
            .create(&user, &registration.roles)
            .await
            .map_err(internal)?;

        tracing::info!(user_id = %user.id, user_name = %user.user_name, "user registered");
        Ok(())
    }

    /// Check credentials and return the stored user
    pub async fn validate_user(&self, user_name: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .repos
            .user()
            .find_by_user_name(user_name)
            .await
            .map_err(internal)?;

        let verified = match &user {
            Some(user) => verify_password(password.to_string(), user.password_hash.clone()).await?,
            None => false,
        };

        match user {
            Some(user) if verified => Ok(user),
            _ => {
                tracing::warn!(user_name = %user_name, "authentication failed");
                Err(ServiceError::Unauthorized {
                    message: "Authentication failed. Wrong user name or password.".to_string(),
                })
            }
        }
    }

    /// Validate credentials and issue a fresh token pair
    pub async fn login(&self, user_name: &str, password: &str) -> Result<TokenPair, ServiceError> {
        let user = self.validate_user(user_name, password).await?;
        self.create_token(&user, true).await
    }

    /// Issue an access token and rotate the refresh token.
    ///
    /// `populate_expiry` restarts the refresh token lifetime (login); a refresh
    /// keeps the original expiry.
    pub async fn create_token(
        &self,
        user: &User,
        populate_expiry: bool,
    ) -> Result<TokenPair, ServiceError> {
        let roles = self.repos.user().roles_of(user.id).await.map_err(internal)?;

        let now = Utc::now();
        let expires = now + Duration::minutes(self.config.expires_minutes);
        let claims = Claims {
            sub: user.user_name.clone(),
            roles,
            iss: self.config.valid_issuer.clone(),
            aud: self.config.valid_audience.clone(),
            iat: unix_seconds(now.timestamp()),
            exp: unix_seconds(expires.timestamp()),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| internal(err.into()))?;
        let refresh_token = generate_refresh_token();

        let expiry =
            populate_expiry.then(|| now + Duration::days(self.config.refresh_token_days));
        self.repos
            .user()
            .save_refresh_token(user.id, &refresh_token, expiry)
            .await
            .map_err(internal)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange an expired access token plus its refresh token for a new pair
    pub async fn refresh_token(&self, pair: &TokenPair) -> Result<TokenPair, ServiceError> {
        let invalid = || {
            ServiceError::bad_request(
                "Invalid client request. The token pair has some invalid values.",
            )
        };

        let claims = self
            .decode_claims(&pair.access_token, false)
            .map_err(|_| invalid())?;

        let user = self
            .repos
            .user()
            .find_by_user_name(&claims.sub)
            .await
            .map_err(internal)?
            .ok_or_else(invalid)?;

        let matches = user.refresh_token.as_deref() == Some(pair.refresh_token.as_str());
        let alive = user
            .refresh_token_expiry
            .is_some_and(|expiry| expiry > Utc::now());
        if !matches || !alive {
            tracing::warn!(user_name = %user.user_name, "refresh token rejected");
            return Err(invalid());
        }

        self.create_token(&user, false).await
    }

    /// Resolve a bearer token into the calling principal
    pub fn authenticate(&self, token: &str) -> Result<Principal, ServiceError> {
        let claims = self.decode_claims(token, true).map_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
            ServiceError::Unauthorized {
                message: "Bearer token is missing, expired or invalid.".to_string(),
            }
        })?;

        Ok(Principal {
            user_name: claims.sub,
            roles: claims.roles,
        })
    }

    fn decode_claims(
        &self,
        token: &str,
        validate_lifetime: bool,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.valid_issuer.as_str()]);
        validation.set_audience(&[self.config.valid_audience.as_str()]);
        validation.validate_exp = validate_lifetime;

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

fn unix_seconds(timestamp: i64) -> u64 {
    u64::try_from(timestamp).unwrap_or_default()
}

fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Hash on the blocking pool
async fn hash_password(password: String) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || {
        let mut salt = [0u8; SALT_BYTES];
        rand::rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt)
            .map_err(|err| anyhow::anyhow!("salt encoding failed: {err}"))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))
    })
    .await
    .map_err(|err| internal(err.into()))?
    .map_err(internal)
}

async fn verify_password(password: String, stored: String) -> Result<bool, ServiceError> {
    tokio::task::spawn_blocking(move || match PasswordHash::new(&stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            tracing::error!(error = %err, "stored password hash is unreadable");
            false
        }
    })
    .await
    .map_err(|err| internal(err.into()))
}
