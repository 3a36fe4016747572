pub mod job;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use actix_web::http::header;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::{
        auth::jwt::generate_token,
        config::Config,
        model::job::{DEFAULT_JOB_LOCATION, Job, JobStatus, JobType},
        models::TokenType,
        store::MemoryJobStore,
    };

    pub struct TestApp {
        pub store: Arc<MemoryJobStore>,
        pub config: Config,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self {
                store: Arc::new(MemoryJobStore::new()),
                config: Config::for_tests(),
            }
        }

        pub fn with_config(self, config: Config) -> Self {
            Self { config, ..self }
        }
    }

    /// Wires the full app (auth, routes, error handlers) over the memory store.
    macro_rules! init_test_service {
        ($app:expr) => {{
            let app = &$app;
            let store: std::sync::Arc<dyn crate::store::JobStore> = app.store.clone();
            let config = app.config.clone();
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new(config.clone()))
                    .app_data(actix_web::web::Data::from(store))
                    .configure(|cfg| crate::routes::configure(cfg, &config)),
            )
            .await
        }};
    }
    pub(crate) use init_test_service;

    pub fn bearer(user_id: u64) -> (header::HeaderName, String) {
        let token = generate_token(
            user_id,
            &format!("user{user_id}"),
            TokenType::Access,
            &Config::for_tests().jwt_secret,
            3600,
        );
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    pub fn job_at(owner: u64, position: &str, year: i32, month: u32, day: u32) -> Job {
        let at = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .unwrap();
        Job {
            id: Uuid::new_v4().to_string(),
            company: "Acme".to_string(),
            position: position.to_string(),
            status: JobStatus::Pending,
            job_type: JobType::FullTime,
            job_location: DEFAULT_JOB_LOCATION.to_string(),
            created_by: owner,
            created_at: at,
            updated_at: at,
        }
    }
}
