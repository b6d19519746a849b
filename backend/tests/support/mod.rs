//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each suite pulls this module in with `mod support;`.

#![allow(dead_code, reason = "each suite uses a different subset")]

use std::sync::OnceLock;

use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_migrations::MigrationHarness;

use food_api::outbound::persistence::{DbPool, MIGRATIONS, PoolConfig};

/// Environment variable naming the PostgreSQL database used by the Diesel
/// adapter suites.
pub const TEST_DATABASE_URL: &str = "FOOD_TEST_DATABASE_URL";

/// Return the test database URL, or print a skip marker when unset.
pub fn database_url_or_skip() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-CLUSTER: {TEST_DATABASE_URL} is not set");
            None
        }
    }
}

static MIGRATED: OnceLock<()> = OnceLock::new();

/// Apply migrations once per test binary; tests in a binary run
/// concurrently.
fn migrate_once(url: &str) {
    MIGRATED.get_or_init(|| {
        let mut conn = PgConnection::establish(url).expect("connect for migrations");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("apply migrations");
    });
}

/// Migrate the test database and open a small pool against it.
pub async fn migrated_pool(url: &str) -> DbPool {
    migrate_once(url);
    DbPool::new(PoolConfig::new(url).with_max_size(4))
        .await
        .expect("build pool")
}

/// Name unique across concurrently running tests.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

#[derive(QueryableByName)]
struct Count {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

/// Number of ingredient rows referencing `recipe_id`, read outside the
/// repository.
pub fn ingredient_rows_for(url: &str, recipe_id: i64) -> i64 {
    let mut conn = PgConnection::establish(url).expect("connect");
    diesel::sql_query("SELECT COUNT(*) AS n FROM ingredients WHERE recipe_id = $1")
        .bind::<BigInt, _>(recipe_id)
        .get_result::<Count>(&mut conn)
        .expect("count ingredients")
        .n
}
