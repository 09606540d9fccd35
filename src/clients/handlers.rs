use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::auth::repo::User;
use crate::auth::services::{hash_password, is_valid_email, AuthUser};
use crate::catalog::repo::{EssentialRecord, FoodRecord};
use crate::pdf::{self, PdfError};
use crate::plan::model::{MealSlot, Plan};
use crate::plan::view::PlanView;
use crate::state::AppState;

use super::dto::{
    age_label, bmi_label, ClientDetail, ClientMe, ClientSummary, NewClientRequest, PlanEnvelope,
    SlotOptions,
};
use super::repo::{ClientRecord, NewClient};

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/:id", get(get_client))
}

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/clients/:id/plan", get(get_plan).put(save_plan))
        .route("/clients/:id/plan/options/:slot", get(plan_options))
        .route("/clients/:id/plan/pdf", get(plan_pdf))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me/plan", get(my_plan))
        .route("/me/plan/pdf", get(my_plan_pdf))
}

// --- trainer-facing ---

#[instrument(skip(state, payload))]
pub async fn create_client(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut payload): Json<NewClientRequest>,
) -> Result<(StatusCode, Json<ClientRecord>), (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Client name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid client email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }
    if let Ok(Some(_)) = ClientRecord::find_by_email(&state.db, &payload.email).await {
        return Err((StatusCode::CONFLICT, "Client already exists".into()));
    }

    // the login account the client will use for their dashboard
    if User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
        .is_none()
    {
        let hash = hash_password(&payload.password).map_err(internal)?;
        User::create(&state.db, &payload.email, &hash)
            .await
            .map_err(internal)?;
    }

    let client = ClientRecord::create(
        &state.db,
        &NewClient {
            name: payload.name.trim(),
            phone: &payload.phone,
            email: &payload.email,
            dob: payload.dob.as_deref(),
            gender: payload.gender.as_deref(),
            transformation_type: payload.transformation_type.as_deref(),
            transformation_name: payload.transformation_name.as_deref(),
            diet_type: payload.diet_type.as_deref(),
            height: payload.height,
            weight: payload.weight,
        },
    )
    .await
    .map_err(|e| {
        error!(error = %e, "create client failed");
        internal(e)
    })?;

    info!(client_id = %client.id, email = %client.email, %user_id, "client created");
    Ok((StatusCode::CREATED, Json(client)))
}

#[instrument(skip(state))]
pub async fn list_clients(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<ClientSummary>>, (StatusCode, String)> {
    let clients = ClientRecord::list(&state.db).await.map_err(internal)?;
    let items = clients
        .into_iter()
        .map(|c| ClientSummary {
            id: c.id,
            name: c.name,
            email: c.email,
            transformation_name: c.transformation_name,
            created_at: c.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_client(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientDetail>, (StatusCode, String)> {
    let client = ClientRecord::get(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Client not found".to_string()))?;

    let view = PlanView::project(&client.plan.0);
    let active_days = (OffsetDateTime::now_utc() - client.created_at).whole_days();
    Ok(Json(ClientDetail {
        bmi: bmi_label(client.height, client.weight),
        age: age_label(client.dob.as_deref()),
        active_days,
        view,
        client,
    }))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanEnvelope>, (StatusCode, String)> {
    let client = ClientRecord::get(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Client not found".to_string()))?;
    let plan = client.plan.0;
    let view = PlanView::project(&plan);
    Ok(Json(PlanEnvelope { plan, view }))
}

/// Persist a whole plan draft. Saves are explicit and unmerged: the later
/// save silently overwrites the earlier one.
#[instrument(skip(state, plan))]
pub async fn save_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(plan): Json<Plan>,
) -> Result<Json<PlanEnvelope>, (StatusCode, String)> {
    if let Err(e) = plan.validate() {
        warn!(client_id = %id, error = %e, "plan draft rejected");
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let saved = ClientRecord::save_plan(&state.db, id, &plan)
        .await
        .map_err(internal)?;
    if !saved {
        return Err((StatusCode::NOT_FOUND, "Client not found".into()));
    }

    info!(client_id = %id, %user_id, "plan saved");
    let view = PlanView::project(&plan);
    Ok(Json(PlanEnvelope { plan, view }))
}

/// Picker options for one meal slot: foods already in the slot are excluded
/// by catalog id, essentials by case-insensitive name.
#[instrument(skip(state))]
pub async fn plan_options(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path((id, slot)): Path<(Uuid, String)>,
) -> Result<Json<SlotOptions>, (StatusCode, String)> {
    let slot = MealSlot::from_label(&slot)
        .ok_or((StatusCode::BAD_REQUEST, format!("Unknown meal slot: {slot}")))?;
    let client = ClientRecord::get(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Client not found".to_string()))?;
    let plan = &client.plan.0;

    let mut foods = FoodRecord::list(&state.db).await.map_err(internal)?;
    foods.retain(|f| !plan.has_food(slot, f.id));

    let essentials = EssentialRecord::list(&state.db)
        .await
        .map_err(internal)?
        .into_iter()
        .filter(|e| !plan.has_essential(slot, &e.name))
        .map(|e| e.name)
        .collect();

    Ok(Json(SlotOptions { foods, essentials }))
}

#[instrument(skip(state))]
pub async fn plan_pdf(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, Vec<u8>), (StatusCode, String)> {
    let client = ClientRecord::get(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Client not found".to_string()))?;
    render_pdf_response(&state, &client)
}

// --- client-facing ---

async fn client_for_user(
    state: &AppState,
    user_id: Uuid,
) -> Result<ClientRecord, (StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;
    ClientRecord::find_by_email(&state.db, &user.email)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            warn!(%user_id, "signed-in user has no client record");
            (
                StatusCode::FORBIDDEN,
                "No client profile for this account".to_string(),
            )
        })
}

#[instrument(skip(state))]
pub async fn my_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ClientMe>, (StatusCode, String)> {
    let client = client_for_user(&state, user_id).await?;
    let plan = &client.plan.0;
    Ok(Json(ClientMe {
        bmi: bmi_label(client.height, client.weight),
        dates: plan.dates.clone(),
        view: PlanView::project(plan),
        name: client.name,
        email: client.email,
        phone: client.phone,
        dob: client.dob,
        gender: client.gender,
        transformation_type: client.transformation_type,
        transformation_name: client.transformation_name,
        diet_type: client.diet_type,
        height: client.height,
        weight: client.weight,
    }))
}

#[instrument(skip(state))]
pub async fn my_plan_pdf(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<(HeaderMap, Vec<u8>), (StatusCode, String)> {
    let client = client_for_user(&state, user_id).await?;
    render_pdf_response(&state, &client)
}

fn render_pdf_response(
    state: &AppState,
    client: &ClientRecord,
) -> Result<(HeaderMap, Vec<u8>), (StatusCode, String)> {
    let bytes = pdf::generate(
        client,
        &client.plan.0,
        FsPath::new(&state.config.poster_path),
    )
    .map_err(|e| match &e {
        PdfError::MissingClientName => (StatusCode::BAD_REQUEST, e.to_string()),
        PdfError::Poster(_) | PdfError::Render(_) => {
            error!(client_id = %client.id, error = %e, "pdf generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!(
            "attachment; filename=\"{}\"",
            pdf::pdf_filename(&client.name)
        )
        .parse()
        .map_err(internal)?,
    );
    info!(client_id = %client.id, bytes = bytes.len(), "plan pdf generated");
    Ok((headers, bytes))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
