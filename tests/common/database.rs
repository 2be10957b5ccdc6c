//! Test database helpers.
//!
//! Connects to the database named by `TEST_DATABASE_URL` (falling back
//! to `DATABASE_URL`), runs the migrations, and hands out a pool.
//! Suites using this are marked `#[ignore]` so the default test run
//! does not require a PostgreSQL instance.

use sqlx::PgPool;
use uuid::Uuid;

use studyhub::auth::users::{create_user, User};

pub struct TestDatabase {
    pub pool: PgPool,
}

impl TestDatabase {
    /// Connect and migrate. Panics if the database is unreachable;
    /// callers are `#[ignore]`d tests that opted into needing one.
    pub async fn new() -> Self {
        let url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("TEST_DATABASE_URL or DATABASE_URL must be set for database tests");

        let pool = PgPool::connect(&url)
            .await
            .expect("failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        Self { pool }
    }

    /// Create a user with a unique name; the cheap bcrypt cost keeps
    /// test setup fast.
    pub async fn create_test_user(&self, prefix: &str) -> User {
        let suffix = Uuid::new_v4().simple().to_string();
        let username = format!("{prefix}{}", &suffix[..12]);
        let email = format!("{username}@test.invalid");
        let hash = bcrypt::hash("password123", 4).expect("bcrypt hash failed");

        create_user(&self.pool, username.clone(), email, hash, format!("کاربر {prefix}"))
            .await
            .expect("failed to create test user")
    }
}
