//! Currency endpoints. Reads are public, writes need an admin.

use api_types::currency::{CurrencyNew, CurrencyUpdate, CurrencyView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, server::ServerState};

fn map_currency(currency: engine::Currency) -> CurrencyView {
    CurrencyView {
        id: currency.id,
        code: currency.code,
        name: currency.name,
        symbol: currency.symbol,
        minor_units: currency.minor_units,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CurrencyView>>, ServerError> {
    let currencies = state
        .engine
        .list_currencies()
        .await?
        .into_iter()
        .map(map_currency)
        .collect();
    Ok(Json(currencies))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(currency_id): Path<Uuid>,
) -> Result<Json<CurrencyView>, ServerError> {
    let currency = state.engine.currency(currency_id).await?;
    Ok(Json(map_currency(currency)))
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CurrencyNew>,
) -> Result<(StatusCode, Json<CurrencyView>), ServerError> {
    payload.validate()?;
    let currency = state
        .engine
        .create_currency(
            engine::CurrencyNew {
                code: payload.code,
                name: payload.name,
                symbol: payload.symbol,
                minor_units: payload.minor_units,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_currency(currency))))
}

pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(currency_id): Path<Uuid>,
    Json(payload): Json<CurrencyUpdate>,
) -> Result<Json<CurrencyView>, ServerError> {
    payload.validate()?;
    let currency = state
        .engine
        .update_currency(
            currency_id,
            engine::CurrencyUpdate {
                name: payload.name,
                symbol: payload.symbol,
                minor_units: payload.minor_units,
            },
            user.id,
        )
        .await?;
    Ok(Json(map_currency(currency)))
}

pub async fn remove(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(currency_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_currency(currency_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
