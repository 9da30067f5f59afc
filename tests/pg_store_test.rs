//! Listing store tests against a live Postgres. Run with
//! `DATABASE_URL=... cargo test --test pg_store_test -- --ignored`.

use std::env;

use chrono::NaiveDate;
use uuid::Uuid;

use job_agent_backend::{
    database::{
        pool::{create_pool, run_migrations},
        postgres::PgStore,
        ListingStore,
    },
    models::job_posting::NewJobPosting,
};

async fn setup_store() -> (PgStore, sqlx::PgPool) {
    dotenvy::dotenv().ok();
    let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set for Postgres tests");
    let pool = create_pool(&url).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    (PgStore::new(pool.clone()), pool)
}

fn new_posting(title: &str, company: &str) -> NewJobPosting {
    NewJobPosting {
        title: title.to_string(),
        company: company.to_string(),
        location: "Remote".into(),
        description: "Build things".into(),
        url: "https://example.com/job".into(),
        application_url: "https://example.com/apply".into(),
        salary_range: "Not specified".into(),
        job_type: "Full-time".into(),
        experience_level: "Mid".into(),
        posted_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

async fn count_for_company(pool: &sqlx::PgPool, company: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_listings WHERE company = $1")
        .bind(company)
        .fetch_one(pool)
        .await
        .expect("count")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn failed_batch_leaves_no_rows_behind() {
    let (store, pool) = setup_store().await;
    let company = format!("rollback-{}", Uuid::new_v4());

    // Postgres refuses NUL bytes in text, so the second insert fails after
    // the first has already run inside the transaction.
    let batch = vec![
        new_posting("Backend Engineer", &company),
        new_posting("Broken\0Title", &company),
    ];
    let result = store.append_batch(&batch).await;

    assert!(result.is_err());
    assert_eq!(count_for_company(&pool, &company).await, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn appended_batch_reads_back_newest_first() {
    let (store, pool) = setup_store().await;
    let company = format!("append-{}", Uuid::new_v4());

    let stored = store
        .append_batch(&[
            new_posting("First", &company),
            new_posting("Second", &company),
        ])
        .await
        .expect("append");

    assert_eq!(stored.len(), 2);
    assert!(stored[0].id < stored[1].id);
    assert_eq!(count_for_company(&pool, &company).await, 2);

    let recent = store.recent(2).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, stored[1].id);
    assert_eq!(recent[1].id, stored[0].id);
}
