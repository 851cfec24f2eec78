//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value.
//! On validation failure it returns an automatic 422 response with
//! structured field-level error details.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

/// An extractor that deserializes JSON and validates it.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateBookingRequest {
///     #[validate(length(min = 1, max = 100))]
///     name: String,
///     #[validate(range(min = 1))]
///     guests: i32,
/// }
///
/// async fn handler(ValidatedJson(body): ValidatedJson<CreateBookingRequest>) { ... }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Error type for `ValidatedJson` extraction failures.
pub enum ValidatedJsonRejection {
    /// JSON parsing failed.
    JsonError(JsonRejection),
    /// Validation failed.
    ValidationError(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error_with_code(
                    "invalid_json",
                    format!("Invalid JSON: {}", rejection.body_text()),
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
                fields.sort_by(|a, b| a.0.cmp(&b.0));
                let field_errors: Vec<String> = fields
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| {
                            let msg = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{:?}", e.code));
                            format!("{}: {}", field, msg)
                        })
                    })
                    .collect();

                let message = if field_errors.is_empty() {
                    "Validation failed".to_string()
                } else {
                    field_errors.join("; ")
                };

                let body = ApiResponse::<()>::error_with_code("validation_failed", message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct GuestForm {
        #[validate(length(min = 1, max = 100))]
        name: String,
        #[validate(range(min = 1, max = 20))]
        guests: i32,
    }

    async fn handler(ValidatedJson(form): ValidatedJson<GuestForm>) -> String {
        format!("{}:{}", form.name, form.guests)
    }

    async fn send(body: Body) -> axum::http::Response<Body> {
        use tower::Service;
        let req = Request::builder()
            .method("POST")
            .uri("/guests")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let mut svc = Router::new().route("/guests", post(handler)).into_service();
        svc.call(req).await.unwrap()
    }

    async fn envelope(resp: axum::http::Response<Body>) -> ApiResponse<()> {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let body = serde_json::json!({"name": "Rina", "guests": 2});
        let resp = send(Body::from(serde_json::to_vec(&body).unwrap())).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = send(Body::from("{\"name\": ")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope(resp).await.code.as_deref(), Some("invalid_json"));
    }

    #[tokio::test]
    async fn failed_rules_are_422_with_field_names() {
        let body = serde_json::json!({"name": "", "guests": 0});
        let resp = send(Body::from(serde_json::to_vec(&body).unwrap())).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let env = envelope(resp).await;
        assert_eq!(env.code.as_deref(), Some("validation_failed"));
        let message = env.error.unwrap();
        assert!(message.starts_with("guests: "));
        assert!(message.contains("name: "));
    }
}
