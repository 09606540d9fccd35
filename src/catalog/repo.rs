use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Catalog food item; macro fields are per 100 g, calories derived.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodRecord {
    pub id: Uuid,
    pub name: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

impl FoodRecord {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<FoodRecord>> {
        let rows = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, protein, carbs, fat, calories
            FROM foods
            ORDER BY name ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        protein: f64,
        carbs: f64,
        fat: f64,
        calories: f64,
    ) -> anyhow::Result<FoodRecord> {
        let row = sqlx::query_as::<_, FoodRecord>(
            r#"
            INSERT INTO foods (name, protein, carbs, fat, calories)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, protein, carbs, fat, calories
            "#,
        )
        .bind(name)
        .bind(protein)
        .bind(carbs)
        .bind(fat)
        .bind(calories)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        protein: f64,
        carbs: f64,
        fat: f64,
        calories: f64,
    ) -> anyhow::Result<Option<FoodRecord>> {
        let row = sqlx::query_as::<_, FoodRecord>(
            r#"
            UPDATE foods
            SET name = $2, protein = $3, carbs = $4, fat = $5, calories = $6
            WHERE id = $1
            RETURNING id, name, protein, carbs, fat, calories
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(protein)
        .bind(carbs)
        .bind(fat)
        .bind(calories)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub name: String,
    pub muscle: String,
    pub equipment: String,
}

impl WorkoutRecord {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<WorkoutRecord>> {
        let rows = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, name, muscle, equipment
            FROM workouts
            ORDER BY muscle ASC, name ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_muscle(db: &PgPool, muscle: &str) -> anyhow::Result<Vec<WorkoutRecord>> {
        let rows = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, name, muscle, equipment
            FROM workouts
            WHERE muscle = $1
            ORDER BY name ASC
            "#,
        )
        .bind(muscle)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        muscle: &str,
        equipment: &str,
    ) -> anyhow::Result<WorkoutRecord> {
        let row = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            INSERT INTO workouts (name, muscle, equipment)
            VALUES ($1, $2, $3)
            RETURNING id, name, muscle, equipment
            "#,
        )
        .bind(name)
        .bind(muscle)
        .bind(equipment)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        muscle: &str,
        equipment: &str,
    ) -> anyhow::Result<Option<WorkoutRecord>> {
        let row = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            UPDATE workouts
            SET name = $2, muscle = $3, equipment = $4
            WHERE id = $1
            RETURNING id, name, muscle, equipment
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(muscle)
        .bind(equipment)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EssentialRecord {
    pub id: Uuid,
    pub name: String,
}

impl EssentialRecord {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<EssentialRecord>> {
        let rows = sqlx::query_as::<_, EssentialRecord>(
            r#"
            SELECT id, name
            FROM essentials
            ORDER BY name ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive lookup, backing the unique-name rule.
    pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<EssentialRecord>> {
        let row = sqlx::query_as::<_, EssentialRecord>(
            r#"
            SELECT id, name
            FROM essentials
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, name: &str) -> anyhow::Result<EssentialRecord> {
        let row = sqlx::query_as::<_, EssentialRecord>(
            r#"
            INSERT INTO essentials (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(db: &PgPool, id: Uuid, name: &str) -> anyhow::Result<Option<EssentialRecord>> {
        let row = sqlx::query_as::<_, EssentialRecord>(
            r#"
            UPDATE essentials
            SET name = $2
            WHERE id = $1
            RETURNING id, name
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM essentials WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
