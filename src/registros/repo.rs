use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::Date;

// Week dates travel as literal YYYY-MM-DD strings in both directions.
time::serde::format_description!(week_date, Date, "[year]-[month]-[day]");

/// Most recent registros returned per user; a bounded recency list, not a
/// pagination cursor.
const LATEST_LIMIT: i64 = 10;

/// Weekly record owned by one user, referencing the logro it tracks.
/// `user_id` and `logro_id` never change after insertion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registro {
    pub id: i64,
    pub user_id: i64,
    pub logro_id: i64,
    #[serde(with = "week_date")]
    pub inicio_semana: Date,
    #[serde(with = "week_date")]
    pub fin_semana: Date,
}

impl Registro {
    pub async fn insert(
        db: &PgPool,
        user_id: i64,
        logro_id: i64,
        inicio_semana: Date,
        fin_semana: Date,
    ) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO registro (user_id, logro_id, inicio_semana, fin_semana)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(logro_id)
        .bind(inicio_semana)
        .bind(fin_semana)
        .fetch_one(db)
        .await?;
        Ok(id)
    }

    pub async fn get(db: &PgPool, id: i64) -> anyhow::Result<Option<Registro>> {
        let registro = sqlx::query_as::<_, Registro>(
            r#"
            SELECT id, user_id, logro_id, inicio_semana, fin_semana
            FROM registro
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(registro)
    }

    /// Returns false when no row matched the id.
    pub async fn update(
        db: &PgPool,
        id: i64,
        user_id: i64,
        logro_id: i64,
        inicio_semana: Date,
        fin_semana: Date,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE registro
            SET user_id = $1, logro_id = $2, inicio_semana = $3, fin_semana = $4
            WHERE id = $5
            "#,
        )
        .bind(user_id)
        .bind(logro_id)
        .bind(inicio_semana)
        .bind(fin_semana)
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no row matched the id.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM registro
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The user's most recent registros by week start, newest first, capped
    /// at ten entries.
    pub async fn latest_for_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Registro>> {
        let rows = sqlx::query_as::<_, Registro>(
            r#"
            SELECT id, user_id, logro_id, inicio_semana, fin_semana
            FROM registro
            WHERE user_id = $1
            ORDER BY inicio_semana DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(LATEST_LIMIT)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid date")
    }

    #[test]
    fn week_dates_serialize_as_iso_strings() {
        let registro = Registro {
            id: 1,
            user_id: 42,
            logro_id: 7,
            inicio_semana: date(2024, Month::January, 1),
            fin_semana: date(2024, Month::January, 7),
        };
        let v = serde_json::to_value(&registro).expect("serialize");
        assert_eq!(v["inicio_semana"], "2024-01-01");
        assert_eq!(v["fin_semana"], "2024-01-07");
        assert_eq!(v["id"], 1);
        assert_eq!(v["user_id"], 42);
        assert_eq!(v["logro_id"], 7);
    }

    #[test]
    fn week_dates_roundtrip_through_json() {
        let json = r#"{
            "id": 3,
            "user_id": 42,
            "logro_id": 9,
            "inicio_semana": "2024-01-01",
            "fin_semana": "2024-01-07"
        }"#;
        let registro: Registro = serde_json::from_str(json).expect("deserialize");
        assert_eq!(registro.inicio_semana, date(2024, Month::January, 1));
        assert_eq!(registro.fin_semana, date(2024, Month::January, 7));
    }
}
