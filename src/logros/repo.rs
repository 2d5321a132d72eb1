use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Achievement payload, 1:1 lifecycle companion of a registro. Never exposed
/// through its own routes; created, edited, and deleted alongside its
/// registro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Logro {
    pub id: i64,
    pub titulo: String,
    pub descripcion: String,
}

impl Logro {
    pub async fn insert(db: &PgPool, titulo: &str, descripcion: &str) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO logro (titulo, descripcion)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(titulo)
        .bind(descripcion)
        .fetch_one(db)
        .await?;
        Ok(id)
    }

    pub async fn get(db: &PgPool, id: i64) -> anyhow::Result<Option<Logro>> {
        let logro = sqlx::query_as::<_, Logro>(
            r#"
            SELECT id, titulo, descripcion
            FROM logro
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(logro)
    }

    /// Returns false when no row matched the id.
    pub async fn update(
        db: &PgPool,
        id: i64,
        titulo: &str,
        descripcion: &str,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE logro
            SET titulo = $1, descripcion = $2
            WHERE id = $3
            "#,
        )
        .bind(titulo)
        .bind(descripcion)
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no row matched the id.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM logro
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
