//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in a binary. Migrations run
//! once on first use. Tests isolate themselves with unique titles and emails
//! rather than truncating tables, so they can run in parallel.

use anyhow::{Context, Result};
use axum::Router;
use events_core::kernel::test_dependencies::{MockImageHost, MockMailer, TestDependencies};
use events_core::server::build_app;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        pool.close().await;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let deps = ctx.deps();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for fixtures and assertions.
    pub db_pool: PgPool,
    pub db_url: String,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            db_url: infra.db_url.clone(),
        })
    }

    /// ServerDeps backed by this pool and recording mocks.
    pub fn deps(&self) -> TestDependencies {
        TestDependencies::new(self.db_pool.clone())
    }

    pub fn deps_with_mailer(&self, mailer: MockMailer) -> TestDependencies {
        TestDependencies::with_mailer(self.db_pool.clone(), mailer)
    }

    pub fn deps_with_image_host(&self, image_host: MockImageHost) -> TestDependencies {
        TestDependencies::with_image_host(self.db_pool.clone(), image_host)
    }

    /// Router wired to `deps`, allowing any origin.
    pub fn app(&self, deps: &TestDependencies) -> Router {
        build_app(deps.deps.clone(), &[])
    }
}
