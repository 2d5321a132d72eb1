use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, nombre, apellido, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user with an already-hashed password, returning its id.
    /// A duplicate email races the caller's pre-check into a constraint
    /// violation, surfaced as a persistence error.
    pub async fn insert_with_password(
        db: &PgPool,
        nombre: &str,
        apellido: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (nombre, apellido, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(nombre)
        .bind(apellido)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(id)
    }
}
