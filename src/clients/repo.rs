use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::plan::model::Plan;

/// Client profile with the embedded plan. Optional fields are typed as
/// `Option` so absence is a real "not set", not a missing map key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientRecord {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub transformation_type: Option<String>,
    pub transformation_name: Option<String>,
    pub diet_type: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub plan: Json<Plan>,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, name, phone, email, dob, gender, transformation_type, \
                       transformation_name, diet_type, height, weight, plan, created_at";

pub struct NewClient<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub dob: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub transformation_type: Option<&'a str>,
    pub transformation_name: Option<&'a str>,
    pub diet_type: Option<&'a str>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl ClientRecord {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<ClientRecord>> {
        let rows = sqlx::query_as::<_, ClientRecord>(&format!(
            "SELECT {COLUMNS} FROM clients ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ClientRecord>> {
        let row = sqlx::query_as::<_, ClientRecord>(&format!(
            "SELECT {COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<ClientRecord>> {
        let row = sqlx::query_as::<_, ClientRecord>(&format!(
            "SELECT {COLUMNS} FROM clients WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, new: &NewClient<'_>) -> anyhow::Result<ClientRecord> {
        let row = sqlx::query_as::<_, ClientRecord>(&format!(
            r#"
            INSERT INTO clients
                (name, phone, email, dob, gender, transformation_type,
                 transformation_name, diet_type, height, weight)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.name)
        .bind(new.phone)
        .bind(new.email)
        .bind(new.dob)
        .bind(new.gender)
        .bind(new.transformation_type)
        .bind(new.transformation_name)
        .bind(new.diet_type)
        .bind(new.height)
        .bind(new.weight)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Overwrite the embedded plan in one write; the later save wins.
    pub async fn save_plan(db: &PgPool, id: Uuid, plan: &Plan) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE clients SET plan = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(plan))
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
