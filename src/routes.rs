use crate::{
    api::{job, stats},
    auth::middleware::auth_middleware,
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web,
};

// Helper to build the per-IP limiter config; `None` when the builder rejects it
fn limiter_config(
    requests_per_min: u32,
) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = 60_000 / u64::from(requests_per_min.max(1));
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

/// Mounts the job routes under `config.api_prefix`.
///
/// `RATE_PROTECTED_PER_MIN=0` disables rate limiting.
pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let governor_cfg = limiter_config(config.rate_protected_per_min);
    if config.rate_protected_per_min > 0 && governor_cfg.is_none() {
        tracing::warn!(
            rate = config.rate_protected_per_min,
            "Invalid rate limit configuration, rate limiting disabled"
        );
    }
    let limit_enabled = config.rate_protected_per_min > 0 && governor_cfg.is_some();
    let limiter = Governor::new(&governor_cfg.unwrap_or_default());

    let json_cfg = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());
    let query_cfg = web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(json_cfg)
            .app_data(query_cfg)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Condition::new(limit_enabled, limiter)) // rate limiting
            .service(
                web::scope("/jobs")
                    // /jobs
                    .service(
                        web::resource("")
                            .route(web::get().to(job::list_jobs))
                            .route(web::post().to(job::create_job)),
                    )
                    // /jobs/stats, registered before /jobs/{id}
                    .service(web::resource("/stats").route(web::get().to(stats::show_stats)))
                    // /jobs/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(job::get_job))
                            .route(web::patch().to(job::update_job))
                            .route(web::put().to(job::update_job))
                            .route(web::delete().to(job::delete_job)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{TestApp, bearer, init_test_service};
    use actix_web::{dev::Service, http::StatusCode, test as actix_test};
    use std::net::SocketAddr;

    #[test]
    fn limiter_config_accepts_any_rate() {
        assert!(limiter_config(0).is_some());
        assert!(limiter_config(1000).is_some());
        assert!(limiter_config(u32::MAX).is_some());
    }

    #[actix_web::test]
    async fn protected_routes_are_rate_limited_per_ip() {
        let config = Config {
            rate_protected_per_min: 2,
            ..Config::for_tests()
        };
        let app = TestApp::new().with_config(config);
        let svc = init_test_service!(app);
        let peer: SocketAddr = "10.0.0.7:4000".parse().unwrap();

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = actix_test::TestRequest::get()
                .uri("/api/v1/jobs/stats")
                .peer_addr(peer)
                .insert_header(bearer(1))
                .to_request();
            // the governor rejects through the error path
            let status = match svc.call(req).await {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            statuses.push(status);
        }

        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }
}
