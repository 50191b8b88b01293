//! Integration tests for the build repository.
//!
//! These run against a real Postgres database provisioned per test by
//! `#[sqlx::test]`.

use chrono::{Duration, Utc};
use kyarafit_db::models::build::{Build, BuildFilter, BuildStatus, CreateBuildRequest};
use kyarafit_db::repositories::BuildRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_build(user_id: &str, name: &str) -> Build {
    CreateBuildRequest {
        name: name.to_string(),
        ..Default::default()
    }
    .into_build(user_id, Utc::now())
    .unwrap()
}

fn due_in(user_id: &str, name: &str, days: i64, status: &str) -> Build {
    let target = (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string();
    CreateBuildRequest {
        name: name.to_string(),
        status: Some(status.to_string()),
        target_date: Some(target),
        ..Default::default()
    }
    .into_build(user_id, Utc::now())
    .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_round_trips_all_columns(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    let build = CreateBuildRequest {
        name: "Nezuko".into(),
        character: Some("Nezuko Kamado".into()),
        series: Some("Demon Slayer".into()),
        status: Some("wip".into()),
        priority: Some(2),
        budget: Some(150.0),
        tags: Some(vec!["kimono".into(), "wig".into()]),
        ..Default::default()
    }
    .into_build("user-a", Utc::now())
    .unwrap();

    let created = repo.create(&build).await.unwrap();
    assert_eq!(created.id, build.id);
    assert_eq!(created.status, BuildStatus::Wip);
    assert_eq!(created.character.as_deref(), Some("Nezuko Kamado"));
    assert_eq!(created.tags, vec!["kimono", "wig"]);

    let found = repo.find_by_id(build.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Nezuko");
    assert_eq!(found.priority, Some(2));
}

#[sqlx::test(migrations = "./migrations")]
async fn find_missing_returns_none(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    assert!(repo.find_by_id(uuid::Uuid::new_v4()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_is_scoped_to_owner(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    repo.create(&new_build("user-a", "Mine")).await.unwrap();
    repo.create(&new_build("user-b", "Theirs")).await.unwrap();

    let mine = repo
        .list_by_owner("user-a", &BuildFilter::All, 20, 0)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Mine");
    assert_eq!(repo.count("user-a").await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn offset_past_total_returns_empty_page(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    for i in 0..3 {
        repo.create(&new_build("user-a", &format!("Build {i}")))
            .await
            .unwrap();
    }
    let page = repo
        .list_by_owner("user-a", &BuildFilter::All, 20, 10)
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(repo.count("user-a").await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_text_fields_and_exact_tags(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    let mut tagged = new_build("user-a", "Tanjiro");
    tagged.tags = vec!["haori".into()];
    repo.create(&tagged).await.unwrap();
    let mut by_series = new_build("user-a", "Shinobu");
    by_series.series = Some("Demon Slayer".into());
    repo.create(&by_series).await.unwrap();

    let hits = repo.search("user-a", "slayer", 20, 0).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Shinobu");

    let hits = repo.search("user-a", "haori", 20, 0).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Tanjiro");

    // Partial tag text does not match.
    assert!(repo.search("user-a", "hao", 20, 0).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn search_treats_wildcards_literally(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    repo.create(&new_build("user-a", "100% accurate")).await.unwrap();
    repo.create(&new_build("user-a", "Plain")).await.unwrap();

    let hits = repo.search("user-a", "%", 20, 0).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% accurate");
}

#[sqlx::test(migrations = "./migrations")]
async fn upcoming_excludes_finished_and_orders_by_target_date(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    repo.create(&due_in("user-a", "Later", 20, "wip")).await.unwrap();
    repo.create(&due_in("user-a", "Sooner", 5, "sourcing"))
        .await
        .unwrap();
    repo.create(&due_in("user-a", "Done", 3, "complete"))
        .await
        .unwrap();
    repo.create(&due_in("user-a", "Dropped", 3, "cancelled"))
        .await
        .unwrap();
    repo.create(&due_in("user-a", "Far", 90, "wip")).await.unwrap();

    let upcoming = repo
        .list_by_owner("user-a", &BuildFilter::Upcoming(30), 20, 0)
        .await
        .unwrap();
    let names: Vec<&str> = upcoming.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Sooner", "Later"]);
    assert_eq!(repo.count_upcoming("user-a", 30).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn filters_by_status_and_priority(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    let mut wip = new_build("user-a", "In progress");
    wip.status = BuildStatus::Wip;
    wip.priority = Some(1);
    repo.create(&wip).await.unwrap();
    repo.create(&new_build("user-a", "Just an idea")).await.unwrap();

    let by_status = repo
        .list_by_owner("user-a", &BuildFilter::Status(BuildStatus::Wip), 20, 0)
        .await
        .unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].name, "In progress");

    let by_priority = repo
        .list_by_owner("user-a", &BuildFilter::Priority(1), 20, 0)
        .await
        .unwrap();
    assert_eq!(by_priority.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_requires_matching_owner(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    let created = repo.create(&new_build("user-a", "Original")).await.unwrap();

    let mut foreign = created.clone();
    foreign.user_id = "user-b".into();
    foreign.name = "Hijacked".into();
    assert!(repo.update(&foreign).await.unwrap().is_none());

    let mut renamed = created.clone();
    renamed.name = "Renamed".into();
    let updated = repo.update(&renamed).await.unwrap().unwrap();
    assert_eq!(updated.name, "Renamed");
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_requires_matching_owner(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    let created = repo.create(&new_build("user-a", "Keep")).await.unwrap();

    assert!(!repo.delete(created.id, "user-b").await.unwrap());
    assert!(repo.delete(created.id, "user-a").await.unwrap());
    assert!(!repo.delete(created.id, "user-a").await.unwrap());
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn count_by_status_groups_owner_rows(pool: PgPool) {
    let repo = BuildRepo::new(&pool);
    repo.create(&new_build("user-a", "One")).await.unwrap();
    repo.create(&new_build("user-a", "Two")).await.unwrap();
    repo.create(&due_in("user-a", "Three", 1, "complete"))
        .await
        .unwrap();
    repo.create(&new_build("user-b", "Other")).await.unwrap();

    let mut counts = repo.count_by_status("user-a").await.unwrap();
    counts.sort();
    assert_eq!(
        counts,
        vec![(BuildStatus::Idea, 2), (BuildStatus::Complete, 1)]
    );
}
