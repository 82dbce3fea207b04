//! Integration tests for entity persistence.
//!
//! - Defaults and blank-to-NULL normalization on create
//! - Unique tax identifier
//! - Partial updates through the field set
//! - Delete refused while accounts or tasks reference the entity

use assert_matches::assert_matches;
use lawmox_core::crypto::PasswordCipher;
use lawmox_core::error::CoreError;
use lawmox_core::patch::Patch;
use lawmox_db::models::account::CreateAccount;
use lawmox_db::models::entity::{CreateEntity, UpdateEntity};
use lawmox_db::models::task::CreateTask;
use lawmox_db::repositories::{AccountRepo, EntityRepo, TaskRepo};
use lawmox_db::DbError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_entity(name: &str, ein: Option<&str>) -> CreateEntity {
    CreateEntity {
        entity_name: name.to_string(),
        ein: ein.map(str::to_string),
        date_of_formation: None,
        registered_address: None,
        state_of_formation: None,
        entity_type: None,
        status: None,
    }
}

async fn entity_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM entities")
        .fetch_one(pool)
        .await
        .unwrap()
}

fn new_task(entity_id: uuid::Uuid, title: &str) -> CreateTask {
    CreateTask {
        entity_id,
        account_id: None,
        task_title: title.to_string(),
        description: None,
        deadline: None,
        priority: None,
        status: None,
        completion_date: None,
        steps: vec![],
    }
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let mut input = new_entity("Acme Holdings LLC", Some(""));
    input.state_of_formation = Some("   ".into());

    let entity = EntityRepo::create(&pool, &input).await.unwrap();
    assert_eq!(entity.entity_name, "Acme Holdings LLC");
    assert_eq!(entity.status, "active");
    assert_eq!(entity.ein, None);
    assert_eq!(entity.state_of_formation, None);

    let found = EntityRepo::find_by_id(&pool, entity.id).await.unwrap().unwrap();
    assert_eq!(found.id, entity.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_blank_name(pool: PgPool) {
    let err = EntityRepo::create(&pool, &new_entity("  ", None))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_ein_is_a_unique_violation(pool: PgPool) {
    EntityRepo::create(&pool, &new_entity("First", Some("12-3456789")))
        .await
        .unwrap();
    let err = EntityRepo::create(&pool, &new_entity("Second", Some("12-3456789")))
        .await
        .unwrap_err();
    assert_eq!(err.unique_violation(), Some("uq_entities_ein"));
    assert_eq!(entity_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ein_differing_only_in_whitespace_collides(pool: PgPool) {
    let first = EntityRepo::create(&pool, &new_entity("First", Some("12-3456789")))
        .await
        .unwrap();
    let err = EntityRepo::create(&pool, &new_entity("Second", Some(" 12-3456789 ")))
        .await
        .unwrap_err();
    assert_eq!(err.unique_violation(), Some("uq_entities_ein"));
    assert_eq!(entity_count(&pool).await, 1);

    let other = EntityRepo::create(&pool, &new_entity("Third", None)).await.unwrap();
    let update = UpdateEntity {
        ein: Patch::Value("12-3456789\t".into()),
        ..Default::default()
    };
    let err = EntityRepo::update(&pool, other.id, &update).await.unwrap_err();
    assert_eq!(err.unique_violation(), Some("uq_entities_ein"));
    assert_eq!(
        EntityRepo::find_by_id(&pool, first.id).await.unwrap().unwrap().ein.as_deref(),
        Some("12-3456789")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entities_without_ein_do_not_collide(pool: PgPool) {
    EntityRepo::create(&pool, &new_entity("One", None)).await.unwrap();
    EntityRepo::create(&pool, &new_entity("Two", Some(""))).await.unwrap();
    assert_eq!(EntityRepo::list(&pool).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_newest_first(pool: PgPool) {
    let older = EntityRepo::create(&pool, &new_entity("Older", None)).await.unwrap();
    let newer = EntityRepo::create(&pool, &new_entity("Newer", None)).await.unwrap();
    sqlx::query("UPDATE entities SET created_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(older.id)
        .execute(&pool)
        .await
        .unwrap();

    let ids: Vec<_> = EntityRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_changes_only_supplied_fields(pool: PgPool) {
    let mut input = new_entity("Acme", Some("11-1111111"));
    input.entity_type = Some("LLC".into());
    let created = EntityRepo::create(&pool, &input).await.unwrap();

    let update = UpdateEntity {
        status: Patch::Value("dissolved".into()),
        entity_type: Patch::Null,
        ..Default::default()
    };
    let updated = EntityRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, "dissolved");
    assert_eq!(updated.entity_type, None);
    assert_eq!(updated.entity_name, "Acme");
    assert_eq!(updated.ein.as_deref(), Some("11-1111111"));
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeating_an_update_changes_nothing_further(pool: PgPool) {
    let mut input = new_entity("Acme", Some("22-2222222"));
    input.registered_address = Some("1 Main St".into());
    let created = EntityRepo::create(&pool, &input).await.unwrap();

    let update = UpdateEntity {
        entity_type: Patch::Value("LLC".into()),
        registered_address: Patch::Null,
        ..Default::default()
    };
    let once = EntityRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();
    let twice = EntityRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();

    let strip = |entity: &lawmox_db::models::entity::Entity| {
        let mut json = serde_json::to_value(entity).unwrap();
        json.as_object_mut().unwrap().remove("updated_at");
        json
    };
    assert_eq!(strip(&once), strip(&twice));
    assert_eq!(twice.entity_type.as_deref(), Some("LLC"));
    assert_eq!(twice.registered_address, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_update_is_rejected(pool: PgPool) {
    let created = EntityRepo::create(&pool, &new_entity("Acme", None)).await.unwrap();
    let err = EntityRepo::update(&pool, created.id, &UpdateEntity::default())
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_entity_returns_none(pool: PgPool) {
    let update = UpdateEntity {
        entity_name: Patch::Value("Ghost".into()),
        ..Default::default()
    };
    let result = EntityRepo::update(&pool, uuid::Uuid::new_v4(), &update)
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_missing_entity_returns_false(pool: PgPool) {
    assert!(!EntityRepo::delete(&pool, uuid::Uuid::new_v4()).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_is_refused_while_referenced(pool: PgPool) {
    let cipher = PasswordCipher::new(&[7u8; 32]);
    let entity = EntityRepo::create(&pool, &new_entity("Acme", None)).await.unwrap();
    let account = AccountRepo::create(
        &pool,
        &cipher,
        &CreateAccount {
            entity_id: entity.id,
            account_name: "State portal".into(),
            username: "acme-admin".into(),
            password: "s3cret".into(),
            login_url: None,
            account_type: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    let task = TaskRepo::create(&pool, &new_task(entity.id, "Annual report"))
        .await
        .unwrap();

    let err = EntityRepo::delete(&pool, entity.id).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Conflict(_)));
    assert!(EntityRepo::find_by_id(&pool, entity.id).await.unwrap().is_some());

    AccountRepo::delete(&pool, account.id).await.unwrap();
    TaskRepo::delete(&pool, task.task.id).await.unwrap();

    assert!(EntityRepo::delete(&pool, entity.id).await.unwrap());
    assert!(EntityRepo::find_by_id(&pool, entity.id).await.unwrap().is_none());
}
