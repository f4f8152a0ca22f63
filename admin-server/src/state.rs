//! Shared server state

use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{AuthorizationPolicy, JwtConfig, JwtService, RolePolicy};
use crate::config::{BoxError, Config};
use crate::payment::{OpenpayGateway, PaymentGateway};
use crate::storage::ObjectStorage;

#[derive(Clone)]
pub struct ServerState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    /// Consulted on every protected route
    pub policy: Arc<dyn AuthorizationPolicy>,
    pub storage: ObjectStorage,
    pub payments: Arc<dyn PaymentGateway>,
}

impl ServerState {
    pub fn new(
        pool: PgPool,
        jwt_service: JwtService,
        storage: ObjectStorage,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            pool,
            jwt_service: Arc::new(jwt_service),
            policy: Arc::new(RolePolicy),
            storage,
            payments,
        }
    }

    /// Connect to PostgreSQL, run migrations and build the AWS / payment clients
    pub async fn initialize(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let storage = ObjectStorage::new(S3Client::new(&aws_config), &config.s3_bucket);

        let jwt_service = JwtService::with_config(JwtConfig::new(
            &config.jwt_secret,
            config.jwt_expiration_minutes,
        ));

        let payments = Arc::new(OpenpayGateway::new(
            &config.openpay_merchant_id,
            &config.openpay_private_key,
            config.openpay_sandbox,
        ));

        Ok(Self::new(pool, jwt_service, storage, payments))
    }
}
