//! `/auth/*` endpoints. The session itself travels as an HTTP-only cookie set
//! by the server; no token ever appears in request bodies.

use serde_json::json;

use super::api::ApiClient;
use super::error::ApiError;
use super::transport::Method;
use super::types::{Ack, Envelope, User, UserPayload};

impl ApiClient {
    /// `POST /auth/signup`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Envelope<UserPayload>, ApiError> {
        self.send_json(
            Method::Post,
            "/auth/signup",
            &json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn login(&self, email: &str, password: &str) -> Result<Envelope<UserPayload>, ApiError> {
        self.send_json(Method::Post, "/auth/login", &json!({ "email": email, "password": password }))
            .await
    }

    /// `POST /auth/logout`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn logout(&self) -> Result<Envelope<Ack>, ApiError> {
        self.send_empty(Method::Post, "/auth/logout").await
    }

    /// `GET /auth/me`: the user behind the current session cookie, if any.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; an expired or missing session is a 401.
    pub async fn me(&self) -> Result<Option<User>, ApiError> {
        let env: Envelope<UserPayload> = self.get("/auth/me").await?;
        Ok(env.payload.user)
    }

    /// `POST /auth/verify-email`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn verify_email(&self, code: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_json(Method::Post, "/auth/verify-email", &json!({ "code": code }))
            .await
    }

    /// `POST /auth/forgot-password`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn forgot_password(&self, email: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_json(Method::Post, "/auth/forgot-password", &json!({ "email": email }))
            .await
    }

    /// `POST /auth/reset-password`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<Envelope<Ack>, ApiError> {
        self.send_json(
            Method::Post,
            "/auth/reset-password",
            &json!({ "token": token, "password": password }),
        )
        .await
    }
}
