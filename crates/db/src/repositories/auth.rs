//! Login and logout auditing.

use carlot_core::audit::{AuditAction, LoginSnapshot, NewAuditEntry, to_json};
use carlot_core::auth::{AUTH_ENTITY, Argon2Hasher, CredentialHasher, normalize_login_email};
use carlot_core::{ActorContext, WorkflowError};
use carlot_shared::types::AccountId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};

use super::audit::AuditWriter;
use super::{db_error, finish};
use crate::entities::account;

/// Authenticates accounts and records every attempt in the audit log.
#[derive(Debug, Clone)]
pub struct AuthRepository<H: CredentialHasher = Argon2Hasher> {
    db: DatabaseConnection,
    hasher: H,
}

impl AuthRepository {
    /// Creates a repository verifying Argon2id hashes.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            hasher: Argon2Hasher,
        }
    }
}

impl<H: CredentialHasher> AuthRepository<H> {
    /// Creates a repository with a custom hasher.
    #[must_use]
    pub const fn with_hasher(db: DatabaseConnection, hasher: H) -> Self {
        Self { db, hasher }
    }

    /// Checks credentials and opens a session.
    ///
    /// Unknown emails, inactive or deleted accounts and wrong passwords all
    /// record an anonymous LOGIN entry, which is committed before the
    /// `Permission` error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the email or password is blank
    /// - the credentials are rejected
    /// - a database operation fails
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: &str,
    ) -> Result<ActorContext, WorkflowError> {
        let email = normalize_login_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(WorkflowError::validation("email and password are required"));
        }

        let found = account::Entity::find()
            .filter(account::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        let accepted = match found {
            Some(login) if login.is_active && login.deleted_at.is_none() => {
                if self.hasher.verify(password, &login.password_hash)? {
                    Some(login)
                } else {
                    None
                }
            }
            _ => None,
        };

        let entry = match &accepted {
            Some(login) => NewAuditEntry::new(
                AccountId::new(login.account_id),
                AuditAction::Login,
                AUTH_ENTITY,
                login.account_id,
                ip_address,
            ),
            None => NewAuditEntry::anonymous(AuditAction::Login, AUTH_ENTITY, 0, ip_address),
        }
        .after(to_json(&LoginSnapshot {
            email: email.clone(),
            success: accepted.is_some(),
        })?);

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = AuditWriter::record(&txn, entry).await;
        finish(txn, "auth.login", result).await?;

        match accepted {
            Some(login) => {
                tracing::info!(account_id = login.account_id, "login succeeded");
                Ok(ActorContext::new(
                    AccountId::new(login.account_id),
                    login.role.into(),
                    ip_address,
                ))
            }
            None => {
                tracing::warn!(email = %email, "login rejected");
                Err(WorkflowError::Permission(
                    "invalid email or password".to_string(),
                ))
            }
        }
    }

    /// Records the end of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is anonymous or the insert fails.
    pub async fn logout(&self, actor: &ActorContext, email: &str) -> Result<(), WorkflowError> {
        actor.require_authenticated()?;

        let entry = NewAuditEntry::new(
            actor.account_id,
            AuditAction::Logout,
            AUTH_ENTITY,
            actor.account_id.into_inner(),
            &actor.ip_address,
        )
        .after(to_json(&LoginSnapshot {
            email: normalize_login_email(email),
            success: true,
        })?);

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = AuditWriter::record(&txn, entry).await;
        finish(txn, "auth.logout", result).await?;

        tracing::info!(account_id = actor.account_id.into_inner(), "logout");
        Ok(())
    }
}
