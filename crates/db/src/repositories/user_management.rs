//! Account and user profile management.
//!
//! An account (login credentials and role) and its user profile are always
//! created, edited and deleted together, with one audit entry per entity.
//! Deletion is logical: rows are stamped, never removed.

use carlot_core::audit::{AccountSnapshot, AuditAction, NewAuditEntry, UserSnapshot, entity, to_json};
use carlot_core::auth::{Argon2Hasher, CredentialHasher};
use carlot_core::users::{
    AccountInput, AccountRole as CoreAccountRole, UserAccount, UserChange, UserInput,
    ValidatedProfile, next_personnel_number, prefix_pattern, validate_password_strength,
    validate_profile,
};
use carlot_core::{ActorContext, WorkflowError};
use carlot_shared::types::AccountId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, NotSet, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use super::audit::AuditWriter;
use super::{db_error, finish, now};
use crate::entities::{account, sea_orm_active_enums::AccountRole, user};

/// Attempts at inserting a user before a personnel number collision is fatal.
const PERSONNEL_NUMBER_ATTEMPTS: usize = 3;

/// Repository for paired account and user profile workflows.
///
/// Generic over the credential hasher so callers can swap the algorithm.
#[derive(Debug, Clone)]
pub struct UserManagementRepository<H: CredentialHasher = Argon2Hasher> {
    db: DatabaseConnection,
    hasher: H,
}

impl UserManagementRepository {
    /// Creates a repository hashing with Argon2id.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            hasher: Argon2Hasher,
        }
    }
}

impl<H: CredentialHasher> UserManagementRepository<H> {
    /// Creates a repository with a custom hasher.
    #[must_use]
    pub const fn with_hasher(db: DatabaseConnection, hasher: H) -> Self {
        Self { db, hasher }
    }

    /// Creates an account and its user profile, returning the personnel number.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the actor is not an active administrator
    /// - a field or the password fails validation
    /// - the email or username is taken
    /// - a database operation fails
    pub async fn create_user_with_account(
        &self,
        actor: &ActorContext,
        user_input: UserInput,
        account_input: AccountInput,
        plain_password: &str,
    ) -> Result<String, WorkflowError> {
        actor.require_admin()?;
        let profile = validate_profile(&account_input, &user_input)?;
        validate_password_strength(plain_password)?;
        let password_hash = self.hasher.hash(plain_password)?;

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = create_in(&txn, actor, &profile, &account_input, password_hash).await;
        let personnel_number = finish(txn, "users.create", result).await?;

        tracing::info!(
            personnel_number = %personnel_number,
            role = %account_input.role,
            actor = actor.account_id.into_inner(),
            "user created"
        );
        Ok(personnel_number)
    }

    /// Edits an account and its profile.
    ///
    /// The password is re-hashed only when a non-blank one is supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the actor is not an active administrator
    /// - a field or the new password fails validation
    /// - the user or its account does not exist
    /// - the user was deleted
    /// - the email or username belongs to someone else
    /// - a database operation fails
    pub async fn update_user_with_account(
        &self,
        actor: &ActorContext,
        change: UserChange,
        new_password: Option<&str>,
    ) -> Result<UserAccount, WorkflowError> {
        actor.require_admin()?;
        let profile = validate_profile(&change.account, &change.user)?;
        let password_hash = match new_password.filter(|p| !p.trim().is_empty()) {
            Some(password) => {
                validate_password_strength(password)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = update_in(&txn, actor, &change, &profile, password_hash).await;
        let updated = finish(txn, "users.update", result).await?;

        tracing::info!(
            personnel_number = %updated.personnel_number,
            password_changed = new_password.is_some_and(|p| !p.trim().is_empty()),
            "user updated"
        );
        Ok(updated)
    }

    /// Deactivates an account and stamps both rows as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the actor is not an active administrator
    /// - the user or its account does not exist
    /// - the user was already deleted
    /// - a database operation fails
    pub async fn logical_delete_user_by_personnel_number(
        &self,
        actor: &ActorContext,
        personnel_number: &str,
    ) -> Result<(), WorkflowError> {
        actor.require_admin()?;
        let personnel_number = personnel_number.trim();
        if personnel_number.is_empty() {
            return Err(WorkflowError::validation("personnel number is required"));
        }

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = delete_in(&txn, actor, personnel_number).await;
        finish(txn, "users.delete", result).await?;

        tracing::info!(personnel_number, "user deleted");
        Ok(())
    }

    /// Lists users that were not deleted, joined with their accounts.
    pub async fn list_users(&self) -> Result<Vec<UserAccount>, WorkflowError> {
        let rows = user::Entity::find()
            .find_also_related(account::Entity)
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::PersonnelNumber)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(profile, login)| login.map(|login| user_account(&profile, &login)))
            .collect())
    }

    /// Finds a user and its account by personnel number.
    pub async fn find_by_personnel_number(
        &self,
        personnel_number: &str,
    ) -> Result<Option<UserAccount>, WorkflowError> {
        let row = user::Entity::find_by_id(personnel_number.trim().to_string())
            .find_also_related(account::Entity)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(row.and_then(|(profile, login)| login.map(|login| user_account(&profile, &login))))
    }
}

/// Re-checks against the store that the actor is an active administrator.
async fn ensure_admin_in_store(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
) -> Result<(), WorkflowError> {
    let current = account::Entity::find_by_id(actor.account_id.into_inner())
        .one(txn)
        .await
        .map_err(db_error)?;

    match current {
        Some(a) if a.is_active && a.deleted_at.is_none() && a.role == AccountRole::Administrator => {
            Ok(())
        }
        _ => Err(WorkflowError::Permission(format!(
            "account {} is not an active administrator",
            actor.account_id
        ))),
    }
}

async fn ensure_unique(
    txn: &DatabaseTransaction,
    profile: &ValidatedProfile,
    own_account: Option<i32>,
) -> Result<(), WorkflowError> {
    let mut email = account::Entity::find().filter(account::Column::Email.eq(profile.email.as_str()));
    let mut username =
        user::Entity::find().filter(user::Column::Username.eq(profile.username.as_str()));
    if let Some(id) = own_account {
        email = email.filter(account::Column::AccountId.ne(id));
        username = username.filter(user::Column::AccountId.ne(id));
    }

    if email.one(txn).await.map_err(db_error)?.is_some() {
        return Err(WorkflowError::Validation(format!(
            "email {} is already registered",
            profile.email
        )));
    }
    if username.one(txn).await.map_err(db_error)?.is_some() {
        return Err(WorkflowError::Validation(format!(
            "username {} is already taken",
            profile.username
        )));
    }
    Ok(())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Inserts the user under the next free personnel number for its role.
///
/// Each attempt runs in a savepoint so a collision with a concurrent insert
/// only discards that attempt.
async fn insert_user(
    txn: &DatabaseTransaction,
    role: CoreAccountRole,
    account_id: i32,
    profile: &ValidatedProfile,
) -> Result<user::Model, WorkflowError> {
    for attempt in 1..=PERSONNEL_NUMBER_ATTEMPTS {
        let current_max = user::Entity::find()
            .filter(user::Column::PersonnelNumber.like(prefix_pattern(role)))
            .order_by_desc(user::Column::PersonnelNumber)
            .one(txn)
            .await
            .map_err(db_error)?;
        let personnel_number =
            next_personnel_number(role, current_max.as_ref().map(|u| u.personnel_number.as_str()))?;

        let now = now();
        let savepoint = txn.begin().await.map_err(db_error)?;
        let inserted = user::ActiveModel {
            personnel_number: Set(personnel_number.clone()),
            account_id: Set(account_id),
            username: Set(profile.username.clone()),
            full_name: Set(profile.full_name.clone()),
            phone: Set(profile.phone.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&savepoint)
        .await;

        match inserted {
            Ok(model) => {
                savepoint.commit().await.map_err(db_error)?;
                return Ok(model);
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await.map_err(db_error)?;
                tracing::warn!(attempt, personnel_number = %personnel_number, "personnel number collision");
            }
            Err(err) => return Err(db_error(err)),
        }
    }

    Err(WorkflowError::Persistence(format!(
        "no free personnel number after {PERSONNEL_NUMBER_ATTEMPTS} attempts"
    )))
}

async fn create_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    profile: &ValidatedProfile,
    account_input: &AccountInput,
    password_hash: String,
) -> Result<String, WorkflowError> {
    ensure_admin_in_store(txn, actor).await?;
    ensure_unique(txn, profile, None).await?;

    let now = now();
    let login = account::ActiveModel {
        account_id: NotSet,
        email: Set(profile.email.clone()),
        password_hash: Set(password_hash),
        role: Set(account_input.role.into()),
        is_active: Set(account_input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(txn)
    .await
    .map_err(db_error)?;

    if login.account_id <= 0 {
        return Err(WorkflowError::Persistence(
            "account insert returned no id".to_string(),
        ));
    }

    let profile_row = insert_user(txn, account_input.role, login.account_id, profile).await?;

    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Create,
            entity::ACCOUNT,
            login.account_id,
            &actor.ip_address,
        )
        .after(to_json(&account_snapshot(&login))?),
    )
    .await?;
    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Create,
            entity::USER,
            login.account_id,
            &actor.ip_address,
        )
        .after(to_json(&user_snapshot(&profile_row))?),
    )
    .await?;

    Ok(profile_row.personnel_number)
}

async fn load_pair(
    txn: &DatabaseTransaction,
    personnel_number: &str,
) -> Result<(user::Model, account::Model), WorkflowError> {
    let profile = user::Entity::find_by_id(personnel_number.to_string())
        .one(txn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| WorkflowError::not_found(entity::USER, personnel_number))?;

    let login = account::Entity::find_by_id(profile.account_id)
        .one(txn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| WorkflowError::not_found(entity::ACCOUNT, profile.account_id))?;

    Ok((profile, login))
}

async fn update_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    change: &UserChange,
    profile: &ValidatedProfile,
    password_hash: Option<String>,
) -> Result<UserAccount, WorkflowError> {
    ensure_admin_in_store(txn, actor).await?;

    let personnel_number = change.personnel_number.trim();
    let (user_before, account_before) = load_pair(txn, personnel_number).await?;
    if user_before.deleted_at.is_some() {
        return Err(WorkflowError::IllegalState(format!(
            "user {personnel_number} was deleted and cannot be updated"
        )));
    }

    ensure_unique(txn, profile, Some(account_before.account_id)).await?;

    let now = now();
    let mut login = account_before.clone().into_active_model();
    login.email = Set(profile.email.clone());
    login.role = Set(change.account.role.into());
    login.is_active = Set(change.account.is_active);
    login.updated_at = Set(now);
    if let Some(hash) = password_hash {
        login.password_hash = Set(hash);
    }
    login.update(txn).await.map_err(db_error)?;

    let mut details = user_before.clone().into_active_model();
    details.username = Set(profile.username.clone());
    details.full_name = Set(profile.full_name.clone());
    details.phone = Set(profile.phone.clone());
    details.updated_at = Set(now);
    details.update(txn).await.map_err(db_error)?;

    let (user_after, account_after) = load_pair(txn, personnel_number).await?;

    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Update,
            entity::ACCOUNT,
            account_after.account_id,
            &actor.ip_address,
        )
        .before(to_json(&account_snapshot(&account_before))?)
        .after(to_json(&account_snapshot(&account_after))?),
    )
    .await?;
    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Update,
            entity::USER,
            account_after.account_id,
            &actor.ip_address,
        )
        .before(to_json(&user_snapshot(&user_before))?)
        .after(to_json(&user_snapshot(&user_after))?),
    )
    .await?;

    Ok(user_account(&user_after, &account_after))
}

async fn delete_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    personnel_number: &str,
) -> Result<(), WorkflowError> {
    ensure_admin_in_store(txn, actor).await?;

    let (user_before, account_before) = load_pair(txn, personnel_number).await?;
    if user_before.deleted_at.is_some() {
        return Err(WorkflowError::IllegalState(format!(
            "user {personnel_number} is already deleted"
        )));
    }

    let now = now();
    let mut login = account_before.clone().into_active_model();
    login.is_active = Set(false);
    login.deleted_at = Set(Some(now));
    login.updated_at = Set(now);
    let account_after = login.update(txn).await.map_err(db_error)?;

    let mut details = user_before.clone().into_active_model();
    details.deleted_at = Set(Some(now));
    details.updated_at = Set(now);
    details.update(txn).await.map_err(db_error)?;

    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Delete,
            entity::ACCOUNT,
            account_before.account_id,
            &actor.ip_address,
        )
        .before(to_json(&account_snapshot(&account_before))?)
        .after(to_json(&account_snapshot(&account_after))?),
    )
    .await?;
    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Delete,
            entity::USER,
            account_before.account_id,
            &actor.ip_address,
        )
        .before(to_json(&user_snapshot(&user_before))?),
    )
    .await?;

    Ok(())
}

fn account_snapshot(row: &account::Model) -> AccountSnapshot {
    AccountSnapshot {
        account_id: AccountId::new(row.account_id),
        email: row.email.clone(),
        role: row.role.into(),
        is_active: row.is_active,
    }
}

fn user_snapshot(row: &user::Model) -> UserSnapshot {
    UserSnapshot {
        personnel_number: row.personnel_number.clone(),
        username: row.username.clone(),
        full_name: row.full_name.clone(),
        phone: row.phone.clone(),
    }
}

fn user_account(profile: &user::Model, login: &account::Model) -> UserAccount {
    UserAccount {
        personnel_number: profile.personnel_number.clone(),
        account_id: AccountId::new(login.account_id),
        username: profile.username.clone(),
        full_name: profile.full_name.clone(),
        phone: profile.phone.clone(),
        email: login.email.clone(),
        role: login.role.into(),
        is_active: login.is_active,
    }
}
