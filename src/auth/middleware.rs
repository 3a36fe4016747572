use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::models::TokenType;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;
use tracing::debug;

fn unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<BoxBody> {
    let resp = HttpResponse::Unauthorized().json(json!({ "message": message }));
    req.into_response(resp.map_into_boxed_body())
}

/// Verifies the bearer token and injects the caller as an [`AuthUser`].
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => match h.to_str() {
            Ok(v) => v,
            Err(_) => return Ok(unauthorized(req, "Invalid Authorization header encoding")),
        },
        None => return Ok(unauthorized(req, "Missing Authorization header")),
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            return Ok(unauthorized(
                req,
                "Authorization header must start with Bearer",
            ));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return Ok(unauthorized(req, "Invalid or expired token"));
        }
    };

    if claims.token_type != TokenType::Access {
        return Ok(unauthorized(req, "Access token required"));
    }

    let auth_user = AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{TestApp, init_test_service};
    use crate::auth::jwt::generate_token;
    use crate::models::TokenType;
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn refresh_tokens_cannot_call_the_api() {
        let app = TestApp::new();
        let token = generate_token(1, "ana", TokenType::Refresh, &app.config.jwt_secret, 60);
        let svc = init_test_service!(app);

        let req = test::TestRequest::get()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access token required");
    }

    #[actix_web::test]
    async fn rejects_malformed_headers_and_foreign_tokens() {
        let app = TestApp::new();
        let foreign = generate_token(1, "ana", TokenType::Access, "not-our-secret", 60);
        let svc = init_test_service!(app);

        for header in ["Token abc".to_string(), format!("Bearer {foreign}")] {
            let req = test::TestRequest::get()
                .uri("/api/v1/jobs/stats")
                .insert_header(("Authorization", header))
                .to_request();
            let resp = test::call_service(&svc, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
