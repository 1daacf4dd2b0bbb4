use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::policy;
use crate::db;
use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::{
    InventoryEntry, Medicine, MedicineName, Pharmacy, StockListing, StockSheetRow, StockStatus,
    User,
};
use crate::state::SharedState;
use crate::validation::{non_blank, parse_price, parse_quantity};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub med_name: Option<String>,
}

#[derive(Deserialize)]
pub struct AddMedicine {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStock {
    pub medicine_id: Option<Uuid>,
    pub quantity: Option<Value>,
    pub price: Option<Value>,
}

/// The pharmacy the pharmacist account is linked to.
async fn own_pharmacy(state: &SharedState, account: &User) -> Result<Pharmacy, AppError> {
    let not_found = || AppError::NotFound("No pharmacy linked to this account".to_string());
    let pharmacy_id = account.pharmacy_id.ok_or_else(not_found)?;
    db::pharmacies::find_by_id(&state.pool, pharmacy_id)
        .await?
        .ok_or_else(not_found)
}

pub async fn search(
    State(state): State<SharedState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<StockListing>>, AppError> {
    let term = non_blank(query.med_name.as_deref())
        .ok_or_else(|| AppError::BadRequest("Medicine name is required".to_string()))?;
    let results = db::inventory::search(&state.pool, term).await?;
    Ok(Json(results))
}

pub async fn all_medicines(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MedicineName>>, AppError> {
    let medicines = db::medicines::list_names(&state.pool).await?;
    Ok(Json(medicines))
}

/// Medicines stocked by at least one listed pharmacy.
pub async fn available_medicines(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MedicineName>>, AppError> {
    let medicines = db::medicines::list_available(&state.pool).await?;
    Ok(Json(medicines))
}

pub async fn add_medicine(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppJson(req): AppJson<AddMedicine>,
) -> Result<(StatusCode, Json<Medicine>), AppError> {
    let account = policy::authorize(&state.pool, &auth, &policy::ADD_MEDICINE).await?;

    let pharmacy = own_pharmacy(&state, &account).await?;
    if !pharmacy.verified {
        return Err(AppError::Forbidden(
            "Your pharmacy is pending verification. You cannot add medicines yet.".to_string(),
        ));
    }

    let name = non_blank(req.name.as_deref())
        .ok_or_else(|| AppError::BadRequest("Medicine name is required".to_string()))?;

    if db::medicines::find_by_name(&state.pool, name).await?.is_some() {
        return Err(AppError::Conflict("Medicine already exists".to_string()));
    }

    let medicine = db::medicines::create(
        &state.pool,
        name,
        non_blank(req.description.as_deref()),
        non_blank(req.category.as_deref()),
    )
    .await
    .map_err(AppError::conflict_on_unique("Medicine already exists"))?;

    tracing::info!(medicine_id = %medicine.id, pharmacy_id = %pharmacy.id, "medicine added");

    Ok((StatusCode::CREATED, Json(medicine)))
}

pub async fn my_inventory(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<StockSheetRow>>, AppError> {
    let account = policy::authorize(&state.pool, &auth, &policy::VIEW_INVENTORY).await?;
    let pharmacy = own_pharmacy(&state, &account).await?;
    let rows = db::inventory::list_for_pharmacy(&state.pool, pharmacy.id).await?;
    Ok(Json(rows))
}

pub async fn update_stock(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppJson(req): AppJson<UpdateStock>,
) -> Result<Json<InventoryEntry>, AppError> {
    let account = policy::authorize(&state.pool, &auth, &policy::UPDATE_INVENTORY).await?;

    let medicine_id = req
        .medicine_id
        .ok_or_else(|| AppError::BadRequest("Medicine is required".to_string()))?;
    let quantity = parse_quantity(req.quantity.as_ref())?;
    let price = parse_price(req.price.as_ref())?;

    let pharmacy = own_pharmacy(&state, &account).await?;
    db::medicines::find_by_id(&state.pool, medicine_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Medicine not found".to_string()))?;

    let status = StockStatus::from_quantity(quantity);
    let entry = db::inventory::upsert(
        &state.pool,
        pharmacy.id,
        medicine_id,
        quantity,
        price,
        status,
    )
    .await?;

    tracing::info!(
        pharmacy_id = %pharmacy.id,
        %medicine_id,
        quantity,
        ?status,
        "stock updated"
    );

    Ok(Json(entry))
}
