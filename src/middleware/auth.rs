use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Employer-side user id.
    pub sub: String,
    /// Company the user acts for.
    pub company: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// The acting employer user, resolved once by the auth middleware and passed
/// explicitly into every component operation. There is no ambient
/// current-user state anywhere below this layer.
#[derive(Debug, Clone, Copy)]
pub struct ActorContext {
    pub user_id: Uuid,
    pub company_id: Uuid,
}

pub async fn require_employer_auth(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_authorization"})),
        )
            .into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"bad_authorization"})),
        )
            .into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unsupported_scheme"})),
        )
            .into_response();
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            let (Ok(user_id), Ok(company_id)) = (
                Uuid::parse_str(&data.claims.sub),
                Uuid::parse_str(&data.claims.company),
            ) else {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error":"invalid_claims"})),
                )
                    .into_response();
            };
            req.extensions_mut().insert(ActorContext {
                user_id,
                company_id,
            });
            req.extensions_mut().insert(data.claims);
            next.run(req).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_token"})),
        )
            .into_response(),
    }
}
