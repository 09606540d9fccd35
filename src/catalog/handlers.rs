use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::services::AuthUser;
use crate::state::AppState;

use super::dto::{EssentialPayload, FoodPayload, Muscle, MuscleGroup, WorkoutPayload};
use super::repo::{EssentialRecord, FoodRecord, WorkoutRecord};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", put(update_food).delete(delete_food))
}

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(browse_workouts))
        .route("/workouts/by-muscle/:muscle", get(workouts_by_muscle))
        .route("/workouts", post(create_workout))
        .route("/workouts/:id", put(update_workout).delete(delete_workout))
}

pub fn essential_routes() -> Router<AppState> {
    Router::new()
        .route("/essentials", get(list_essentials).post(create_essential))
        .route(
            "/essentials/:id",
            put(update_essential).delete(delete_essential),
        )
}

// --- foods ---

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<FoodRecord>>, (StatusCode, String)> {
    let foods = FoodRecord::list(&state.db).await.map_err(internal)?;
    Ok(Json(foods))
}

#[instrument(skip(state, payload))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<FoodPayload>,
) -> Result<(StatusCode, Json<FoodRecord>), (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Food name is required".into()));
    }
    let calories = payload.derived_calories();
    let food = FoodRecord::create(
        &state.db,
        payload.name.trim(),
        payload.protein,
        payload.carbs,
        payload.fat,
        calories,
    )
    .await
    .map_err(internal)?;
    info!(food_id = %food.id, name = %food.name, %user_id, "food created");
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state, payload))]
pub async fn update_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FoodPayload>,
) -> Result<Json<FoodRecord>, (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Food name is required".into()));
    }
    // calories recomputed on every edit, never taken from the payload
    let calories = payload.derived_calories();
    let food = FoodRecord::update(
        &state.db,
        id,
        payload.name.trim(),
        payload.protein,
        payload.carbs,
        payload.fat,
        calories,
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Food not found".to_string()))?;
    Ok(Json(food))
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if FoodRecord::delete(&state.db, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Food not found".into()))
    }
}

// --- workouts ---

/// Catalog browser: workouts grouped by muscle, groups alphabetical.
#[instrument(skip(state))]
pub async fn browse_workouts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<MuscleGroup>>, (StatusCode, String)> {
    let all = WorkoutRecord::list(&state.db).await.map_err(internal)?;
    let mut grouped: BTreeMap<String, Vec<WorkoutRecord>> = BTreeMap::new();
    for workout in all {
        grouped
            .entry(workout.muscle.clone())
            .or_default()
            .push(workout);
    }
    let groups = grouped
        .into_iter()
        .map(|(muscle, workouts)| MuscleGroup { muscle, workouts })
        .collect();
    Ok(Json(groups))
}

#[instrument(skip(state))]
pub async fn workouts_by_muscle(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(muscle): Path<Muscle>,
) -> Result<Json<Vec<WorkoutRecord>>, (StatusCode, String)> {
    let workouts = WorkoutRecord::list_by_muscle(&state.db, muscle.as_str())
        .await
        .map_err(internal)?;
    Ok(Json(workouts))
}

#[instrument(skip(state, payload))]
pub async fn create_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<WorkoutPayload>,
) -> Result<(StatusCode, Json<WorkoutRecord>), (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Workout name is required".into()));
    }
    let workout = WorkoutRecord::create(
        &state.db,
        payload.name.trim(),
        payload.muscle.as_str(),
        payload.equipment.trim(),
    )
    .await
    .map_err(internal)?;
    info!(workout_id = %workout.id, name = %workout.name, %user_id, "workout created");
    Ok((StatusCode::CREATED, Json(workout)))
}

#[instrument(skip(state, payload))]
pub async fn update_workout(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<WorkoutPayload>,
) -> Result<Json<WorkoutRecord>, (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Workout name is required".into()));
    }
    let workout = WorkoutRecord::update(
        &state.db,
        id,
        payload.name.trim(),
        payload.muscle.as_str(),
        payload.equipment.trim(),
    )
    .await
    .map_err(internal)?
    .ok_or((StatusCode::NOT_FOUND, "Workout not found".to_string()))?;
    Ok(Json(workout))
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if WorkoutRecord::delete(&state.db, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Workout not found".into()))
    }
}

// --- essentials ---

#[instrument(skip(state))]
pub async fn list_essentials(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<EssentialRecord>>, (StatusCode, String)> {
    let essentials = EssentialRecord::list(&state.db).await.map_err(internal)?;
    Ok(Json(essentials))
}

#[instrument(skip(state, payload))]
pub async fn create_essential(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<EssentialPayload>,
) -> Result<(StatusCode, Json<EssentialRecord>), (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Essential name is required".into()));
    }
    if let Ok(Some(existing)) = EssentialRecord::find_by_name(&state.db, name).await {
        warn!(name = %name, existing_id = %existing.id, "duplicate essential name");
        return Err((StatusCode::CONFLICT, "Essential already exists".into()));
    }
    let essential = EssentialRecord::create(&state.db, name)
        .await
        .map_err(internal)?;
    info!(essential_id = %essential.id, name = %essential.name, %user_id, "essential created");
    Ok((StatusCode::CREATED, Json(essential)))
}

#[instrument(skip(state, payload))]
pub async fn update_essential(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EssentialPayload>,
) -> Result<Json<EssentialRecord>, (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Essential name is required".into()));
    }
    if let Ok(Some(existing)) = EssentialRecord::find_by_name(&state.db, name).await {
        if existing.id != id {
            return Err((StatusCode::CONFLICT, "Essential already exists".into()));
        }
    }
    // renames do not propagate into plans that already carry the old name
    let essential = EssentialRecord::update(&state.db, id, name)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Essential not found".to_string()))?;
    Ok(Json(essential))
}

#[instrument(skip(state))]
pub async fn delete_essential(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if EssentialRecord::delete(&state.db, id)
        .await
        .map_err(internal)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Essential not found".into()))
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
