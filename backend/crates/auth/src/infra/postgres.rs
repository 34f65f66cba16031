//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{CooperativeId, UserId};
use kernel::role::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{cooperative::Cooperative, user::User};
use crate::domain::repository::{CooperativeRepository, HealthCheck, UserRepository};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, phone_number::PhoneNumber,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    user_id,
    email,
    phone_number,
    first_name,
    last_name,
    user_role,
    cooperative_id,
    password_hash,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique index hits become a conflict the caller can report
fn map_unique_violation(err: sqlx::Error, conflict: AuthError) -> AuthError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::debug!(constraint = ?db.constraint(), "Unique constraint violated");
            conflict
        }
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                phone_number,
                first_name,
                last_name,
                user_role,
                cooperative_id,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.phone_number.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.user_role.code())
        .bind(user.cooperative_id.map(CooperativeId::into_uuid))
        .bind(user.password_hash.as_ref().map(UserPassword::as_str))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AuthError::DuplicateUser))?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email_or_phone(
        &self,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR phone_number = $2)",
        )
        .bind(email.as_str())
        .bind(phone_number.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_phone_excluding(
        &self,
        phone_number: &PhoneNumber,
        user_id: &UserId,
    ) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE phone_number = $1 AND user_id <> $2)",
        )
        .bind(phone_number.as_str())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                phone_number = $2,
                first_name = $3,
                last_name = $4,
                password_hash = $5,
                updated_at = $6
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.phone_number.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.password_hash.as_ref().map(UserPassword::as_str))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AuthError::PhoneNumberTaken))?;

        Ok(())
    }

    async fn list_by_cooperative(&self, cooperative_id: &CooperativeId) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE cooperative_id = $1 ORDER BY created_at, user_id"
        ))
        .bind(cooperative_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}

// ============================================================================
// Cooperative Repository Implementation
// ============================================================================

impl CooperativeRepository for PgAuthRepository {
    async fn find_cooperative(
        &self,
        cooperative_id: &CooperativeId,
    ) -> AuthResult<Option<Cooperative>> {
        let row = sqlx::query_as::<_, CooperativeRow>(
            "SELECT cooperative_id, name, location FROM cooperatives WHERE cooperative_id = $1",
        )
        .bind(cooperative_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CooperativeRow::into_cooperative))
    }
}

impl HealthCheck for PgAuthRepository {
    async fn ping(&self) -> AuthResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    phone_number: String,
    first_name: String,
    last_name: String,
    user_role: String,
    cooperative_id: Option<Uuid>,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = UserRole::from_code(&self.user_role)
            .map_err(|e| AuthError::Internal(format!("Invalid user_role: {e}")))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            phone_number: PhoneNumber::from_db(self.phone_number),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            user_role,
            cooperative_id: self.cooperative_id.map(CooperativeId::from_uuid),
            password_hash: self.password_hash.map(UserPassword::from_db),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CooperativeRow {
    cooperative_id: Uuid,
    name: String,
    location: String,
}

impl CooperativeRow {
    fn into_cooperative(self) -> Cooperative {
        Cooperative {
            cooperative_id: CooperativeId::from_uuid(self.cooperative_id),
            name: self.name,
            location: self.location,
        }
    }
}
