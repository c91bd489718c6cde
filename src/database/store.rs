use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::identity::{Identity, Role};

/// Which unique field a registration or update collided on. Surfaced to the
/// client so the form can point at the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Handle,
}

impl std::fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateField::Email => f.write_str("email"),
            DuplicateField::Handle => f.write_str("handle"),
        }
    }
}

/// Errors from the credential store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {0}")]
    Duplicate(DuplicateField),

    #[error("corrupt identity record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence boundary for identity records.
///
/// Uniqueness of `email` and `handle` is enforced here, at the storage layer.
/// Callers may run an existence pre-check as an early exit, but the
/// constraint violation returned by `insert`/`update` is the guarantee that
/// holds under concurrent registration.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new identity. Fails with [`StoreError::Duplicate`] when the
    /// email or handle is already taken.
    async fn insert(&self, identity: Identity) -> Result<Identity, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;

    /// Look up by login identifier: matches either email or handle,
    /// case-sensitive as stored.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, StoreError>;

    /// Existence pre-check for registration. Returns the first field that is
    /// already taken, if any.
    async fn identifier_taken(
        &self,
        email: &str,
        handle: &str,
    ) -> Result<Option<DuplicateField>, StoreError>;

    async fn list(&self) -> Result<Vec<Identity>, StoreError>;

    /// Write back the mutable fields of an existing identity. Returns `None`
    /// when the record no longer exists.
    async fn update(&self, identity: &Identity) -> Result<Option<Identity>, StoreError>;

    /// Returns `true` when a record was actually removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

const IDENTITY_COLUMNS: &str =
    "id, name, email, handle, password_hash, role, created_at, updated_at";

/// Postgres-backed credential store.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the identities table and its unique constraints if missing.
    /// The unique indexes on email and handle are what makes concurrent
    /// duplicate registration resolve to exactly one winner.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS identities (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                handle TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'standard',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT identities_email_key UNIQUE (email),
                CONSTRAINT identities_handle_key UNIQUE (handle)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn identity_from_row(row: &PgRow) -> Result<Identity, StoreError> {
        let role: String = row.try_get("role")?;
        let role: Role = role
            .parse()
            .map_err(StoreError::Corrupt)?;

        Ok(Identity {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            handle: row.try_get("handle")?,
            password_hash: row.try_get("password_hash")?,
            role,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Map a postgres unique-constraint violation onto the colliding field.
    fn map_unique_violation(err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let field = match db_err.constraint() {
                    Some(name) if name.contains("handle") => DuplicateField::Handle,
                    _ => DuplicateField::Email,
                };
                return StoreError::Duplicate(field);
            }
        }
        StoreError::Sqlx(err)
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert(&self, identity: Identity) -> Result<Identity, StoreError> {
        let query = format!(
            "INSERT INTO identities ({IDENTITY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {IDENTITY_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(identity.id)
            .bind(&identity.name)
            .bind(&identity.email)
            .bind(&identity.handle)
            .bind(&identity.password_hash)
            .bind(identity.role.as_str())
            .bind(identity.created_at)
            .bind(identity.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_unique_violation)?;

        Self::identity_from_row(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        let query = format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::identity_from_row).transpose()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, StoreError> {
        let query = format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = $1 OR handle = $1"
        );

        let row = sqlx::query(&query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::identity_from_row).transpose()
    }

    async fn identifier_taken(
        &self,
        email: &str,
        handle: &str,
    ) -> Result<Option<DuplicateField>, StoreError> {
        let row = sqlx::query(
            "SELECT email FROM identities WHERE email = $1 OR handle = $2 LIMIT 1",
        )
        .bind(email)
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let existing_email: String = row.get("email");
            if existing_email == email {
                DuplicateField::Email
            } else {
                DuplicateField::Handle
            }
        }))
    }

    async fn list(&self) -> Result<Vec<Identity>, StoreError> {
        let query = format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities ORDER BY created_at ASC"
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(Self::identity_from_row).collect()
    }

    async fn update(&self, identity: &Identity) -> Result<Option<Identity>, StoreError> {
        let query = format!(
            "UPDATE identities \
             SET name = $2, email = $3, handle = $4, password_hash = $5, role = $6, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {IDENTITY_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(identity.id)
            .bind(&identity.name)
            .bind(&identity.email)
            .bind(&identity.handle)
            .bind(&identity.password_hash)
            .bind(identity.role.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_unique_violation)?;

        row.as_ref().map(Self::identity_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
