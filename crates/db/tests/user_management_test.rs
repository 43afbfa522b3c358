//! Integration tests for account and user profile management.

mod common;

use carlot_core::audit::{AccountSnapshot, UserSnapshot, entity};
use carlot_core::users::{AccountInput, AccountRole, UserChange, UserInput};
use carlot_db::entities::{account, audit_log, user};
use carlot_db::{AuditLogRepository, UserManagementRepository};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use common::{seed_account, seed_admin, seed_employee, setup_db};

fn account_input(email: &str, role: AccountRole) -> AccountInput {
    AccountInput {
        email: email.to_string(),
        role,
        is_active: true,
    }
}

fn user_input(username: &str) -> UserInput {
    UserInput {
        username: username.to_string(),
        full_name: "Maria Lopez".to_string(),
        phone: "(228) 555-0101".to_string(),
    }
}

async fn row_counts(db: &DatabaseConnection) -> (u64, u64, u64) {
    (
        account::Entity::find().count(db).await.unwrap(),
        user::Entity::find().count(db).await.unwrap(),
        audit_log::Entity::find().count(db).await.unwrap(),
    )
}

#[tokio::test]
async fn test_create_assigns_sequential_personnel_numbers() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;
    let repo = UserManagementRepository::new(db.clone());

    let first = repo
        .create_user_with_account(
            &admin,
            user_input("mlopez"),
            account_input(" MLopez@Carlot.test ", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap();
    let second = repo
        .create_user_with_account(
            &admin,
            user_input("jperez"),
            account_input("jperez@carlot.test", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap();
    let boss = repo
        .create_user_with_account(
            &admin,
            user_input("boss"),
            account_input("boss@carlot.test", AccountRole::Administrator),
            "S3cure!pw",
        )
        .await
        .unwrap();

    assert_eq!(first, "V000000000");
    assert_eq!(second, "V000000001");
    assert_eq!(boss, "A000000001");

    let created = repo.find_by_personnel_number(&first).await.unwrap().unwrap();
    assert_eq!(created.email, "mlopez@carlot.test");
    assert_eq!(created.phone, "2285550101");
}

#[tokio::test]
async fn test_create_writes_account_and_user_audits() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;
    let repo = UserManagementRepository::new(db.clone());

    let number = repo
        .create_user_with_account(
            &admin,
            user_input("mlopez"),
            account_input("mlopez@carlot.test", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap();
    let created = repo.find_by_personnel_number(&number).await.unwrap().unwrap();
    let account_id = created.account_id.into_inner();

    let audits = AuditLogRepository::new(db.clone());
    let account_history = audits.for_entity(entity::ACCOUNT, account_id).await.unwrap();
    let user_history = audits.for_entity(entity::USER, account_id).await.unwrap();
    assert_eq!(account_history.len(), 1);
    assert_eq!(user_history.len(), 1);

    let account_after: AccountSnapshot =
        serde_json::from_str(account_history[0].after_data.as_deref().unwrap()).unwrap();
    assert_eq!(account_after.email, created.email);
    assert!(!account_history[0].after_data.as_deref().unwrap().contains("password"));

    let user_after: UserSnapshot =
        serde_json::from_str(user_history[0].after_data.as_deref().unwrap()).unwrap();
    assert_eq!(user_after.personnel_number, number);
}

#[tokio::test]
async fn test_weak_password_is_rejected_before_any_insert() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;
    let before = row_counts(&db).await;

    let err = UserManagementRepository::new(db.clone())
        .create_user_with_account(
            &admin,
            user_input("weak"),
            account_input("weak@carlot.test", AccountRole::Employee),
            "abc123",
        )
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(row_counts(&db).await, before);
}

#[tokio::test]
async fn test_employee_cannot_create_users() {
    let db = setup_db().await;
    let employee = seed_employee(&db).await;

    let err = UserManagementRepository::new(db.clone())
        .create_user_with_account(
            &employee,
            user_input("intruder"),
            account_input("intruder@carlot.test", AccountRole::Administrator),
            "S3cure!pw",
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_duplicate_email_and_username_are_rejected() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;
    let repo = UserManagementRepository::new(db.clone());

    let email_err = repo
        .create_user_with_account(
            &admin,
            user_input("other"),
            account_input("ADMIN@carlot.test", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap_err();
    assert_eq!(email_err.error_code(), "VALIDATION_ERROR");

    let username_err = repo
        .create_user_with_account(
            &admin,
            user_input("admin"),
            account_input("fresh@carlot.test", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap_err();
    assert!(username_err.to_string().contains("username"));
}

#[tokio::test]
async fn test_update_changes_profile_and_audits_before_after() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;
    let repo = UserManagementRepository::new(db.clone());
    let number = repo
        .create_user_with_account(
            &admin,
            user_input("mlopez"),
            account_input("mlopez@carlot.test", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap();

    let mut changed_user = user_input("mlopez");
    changed_user.full_name = "Maria Lopez Cruz".to_string();
    let updated = repo
        .update_user_with_account(
            &admin,
            UserChange {
                personnel_number: number.clone(),
                account: account_input("mlopez@carlot.test", AccountRole::Employee),
                user: changed_user,
            },
            Some(" "),
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Maria Lopez Cruz");

    let history = AuditLogRepository::new(db.clone())
        .for_entity(entity::USER, updated.account_id.into_inner())
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    let before: UserSnapshot =
        serde_json::from_str(history[1].before_data.as_deref().unwrap()).unwrap();
    let after: UserSnapshot =
        serde_json::from_str(history[1].after_data.as_deref().unwrap()).unwrap();
    assert_eq!(before.full_name, "Maria Lopez");
    assert_eq!(after.full_name, "Maria Lopez Cruz");
}

#[tokio::test]
async fn test_logical_delete_keeps_rows_and_is_not_repeatable() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;
    let repo = UserManagementRepository::new(db.clone());
    let number = repo
        .create_user_with_account(
            &admin,
            user_input("mlopez"),
            account_input("mlopez@carlot.test", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap();

    repo.logical_delete_user_by_personnel_number(&admin, &number)
        .await
        .unwrap();

    let row = user::Entity::find_by_id(number.clone())
        .one(&db)
        .await
        .unwrap()
        .expect("row should be kept");
    assert!(row.deleted_at.is_some());
    let login = account::Entity::find_by_id(row.account_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!login.is_active);
    assert!(login.deleted_at.is_some());

    let listed = repo.list_users().await.unwrap();
    assert!(listed.iter().all(|u| u.personnel_number != number));

    let err = repo
        .logical_delete_user_by_personnel_number(&admin, &number)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ILLEGAL_STATE");
}

#[tokio::test]
async fn test_delete_unknown_user_is_not_found() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;

    let err = UserManagementRepository::new(db.clone())
        .logical_delete_user_by_personnel_number(&admin, "V999999999")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_personnel_number_collision_gives_up_and_rolls_back() {
    let db = setup_db().await;
    let admin = seed_admin(&db).await;
    // Sorts above A000000000 but does not parse, so the sequence restarts
    // at an already taken number on every attempt.
    seed_account(&db, "ghost@carlot.test", AccountRole::Administrator, "A9", "ghost").await;
    let before = row_counts(&db).await;

    let err = UserManagementRepository::new(db.clone())
        .create_user_with_account(
            &admin,
            user_input("boss"),
            account_input("boss@carlot.test", AccountRole::Administrator),
            "S3cure!pw",
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
    assert_eq!(row_counts(&db).await, before);

    let employee = UserManagementRepository::new(db.clone())
        .create_user_with_account(
            &admin,
            user_input("mlopez"),
            account_input("mlopez@carlot.test", AccountRole::Employee),
            "S3cure!pw",
        )
        .await
        .unwrap();
    assert_eq!(employee, "V000000000");
}
