//! POST /token - exchange administrator credentials for a bearer token.

use axum::extract::rejection::FormRejection;
use axum::{Extension, Form, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub async fn issue_token(
    Extension(auth): Extension<AuthConfig>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Form(form) = form.map_err(|e| AppError::Validation(e.body_text()))?;
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Err(AppError::Validation(
            "form fields 'username' and 'password' are required".into(),
        ));
    };

    if !auth.admin().matches(&username, &password) {
        tracing::info!(username = username.as_str(), "token request rejected");
        return Err(AppError::Unauthorized(
            "Incorrect username or password".into(),
        ));
    }

    let access_token = auth
        .issue_token(&username, Utc::now())
        .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
