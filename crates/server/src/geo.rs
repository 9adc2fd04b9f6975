//! Countries, regions, cities and languages.

use api_types::{
    Paginated,
    geo::{
        CityNew, CityQuery, CityView, CountryNew, CountryView, LanguageNew, LanguageView,
        RegionNew, RegionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{CityFilter, Page};
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, server::ServerState};

fn map_country(country: engine::Country) -> CountryView {
    CountryView {
        id: country.id,
        code: country.code,
        name: country.name,
    }
}

fn map_region(region: engine::Region) -> RegionView {
    RegionView {
        id: region.id,
        country_id: region.country_id,
        name: region.name,
    }
}

fn map_city(city: engine::City) -> CityView {
    CityView {
        id: city.id,
        country_id: city.country_id,
        region_id: city.region_id,
        name: city.name,
    }
}

fn map_language(language: engine::Language) -> LanguageView {
    LanguageView {
        id: language.id,
        code: language.code,
        name: language.name,
    }
}

pub async fn list_countries(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CountryView>>, ServerError> {
    let countries = state.engine.list_countries().await?;
    Ok(Json(countries.into_iter().map(map_country).collect()))
}

pub async fn create_country(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CountryNew>,
) -> Result<(StatusCode, Json<CountryView>), ServerError> {
    payload.validate()?;
    let country = state
        .engine
        .create_country(&payload.code, &payload.name, user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(map_country(country))))
}

pub async fn list_regions(
    State(state): State<ServerState>,
    Path(country_id): Path<Uuid>,
) -> Result<Json<Vec<RegionView>>, ServerError> {
    let regions = state.engine.list_regions(country_id).await?;
    Ok(Json(regions.into_iter().map(map_region).collect()))
}

pub async fn create_region(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<RegionNew>,
) -> Result<(StatusCode, Json<RegionView>), ServerError> {
    payload.validate()?;
    let region = state
        .engine
        .create_region(payload.country_id, &payload.name, user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(map_region(region))))
}

pub async fn list_cities(
    State(state): State<ServerState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Paginated<CityView>>, ServerError> {
    let filter = CityFilter {
        country_id: query.country_id,
        region_id: query.region_id,
        search: query.search,
    };
    let page = state
        .engine
        .list_cities(filter, Page::new(query.page, query.per_page))
        .await?;
    Ok(Json(Paginated {
        items: page.items.into_iter().map(map_city).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

pub async fn get_city(
    State(state): State<ServerState>,
    Path(city_id): Path<Uuid>,
) -> Result<Json<CityView>, ServerError> {
    let city = state.engine.city(city_id).await?;
    Ok(Json(map_city(city)))
}

pub async fn create_city(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CityNew>,
) -> Result<(StatusCode, Json<CityView>), ServerError> {
    payload.validate()?;
    let city = state
        .engine
        .create_city(
            engine::CityNew {
                country_id: payload.country_id,
                region_id: payload.region_id,
                name: payload.name,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_city(city))))
}

pub async fn list_languages(
    State(state): State<ServerState>,
) -> Result<Json<Vec<LanguageView>>, ServerError> {
    let languages = state.engine.list_languages().await?;
    Ok(Json(languages.into_iter().map(map_language).collect()))
}

pub async fn create_language(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<LanguageNew>,
) -> Result<(StatusCode, Json<LanguageView>), ServerError> {
    payload.validate()?;
    let language = state
        .engine
        .create_language(&payload.code, &payload.name, user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(map_language(language))))
}
