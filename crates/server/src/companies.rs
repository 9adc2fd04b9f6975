use api_types::company::{CompanyNew, CompanyView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, server::ServerState};

fn map_company(company: engine::Company) -> CompanyView {
    CompanyView {
        id: company.id,
        owner_id: company.owner_id,
        name: company.name,
        email: company.email,
        city_id: company.city_id,
        created_at: company.created_at,
    }
}

/// Companies owned by the caller.
pub async fn list(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CompanyView>>, ServerError> {
    let companies = state.engine.list_companies(user.id).await?;
    Ok(Json(companies.into_iter().map(map_company).collect()))
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CompanyNew>,
) -> Result<(StatusCode, Json<CompanyView>), ServerError> {
    payload.validate()?;
    let company = state
        .engine
        .create_company(
            engine::CompanyNew {
                name: payload.name,
                email: payload.email,
                city_id: payload.city_id,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_company(company))))
}
