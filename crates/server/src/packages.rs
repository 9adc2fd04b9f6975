//! Packages and their pricing options.

use api_types::{
    Paginated,
    package::{
        PackageNew, PackageQuery, PackageUpdate, PackageView, PricingKind as PricingKindView,
        PricingOptionNew, PricingOptionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Page, PackageFilter, PricingKind};
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, media::map_media, server::ServerState};

fn map_option(option: engine::PricingOption) -> PricingOptionView {
    PricingOptionView {
        id: option.id,
        label: option.label,
        kind: match option.kind {
            PricingKind::PerPerson => PricingKindView::PerPerson,
            PricingKind::Flat => PricingKindView::Flat,
        },
        price_minor: option.price.minor(),
        currency_id: option.currency_id,
        valid_from: option.valid_from,
        valid_to: option.valid_to,
        max_participants: option.max_participants,
    }
}

fn map_package(package: engine::Package) -> PackageView {
    PackageView {
        id: package.id,
        company_id: package.company_id,
        city_id: package.city_id,
        title: package.title,
        description: package.description,
        duration_days: package.duration_days,
        active: package.active,
        created_at: package.created_at,
        pricing_options: package.pricing_options.into_iter().map(map_option).collect(),
        media: package.media.into_iter().map(map_media).collect(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PackageQuery>,
) -> Result<Json<Paginated<PackageView>>, ServerError> {
    let filter = PackageFilter {
        city_id: query.city_id,
        company_id: query.company_id,
        search: query.search,
        active_only: !query.include_inactive.unwrap_or(false),
    };
    let page = state
        .engine
        .list_packages(filter, Page::new(query.page, query.per_page))
        .await?;
    Ok(Json(Paginated {
        items: page.items.into_iter().map(map_package).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(package_id): Path<Uuid>,
) -> Result<Json<PackageView>, ServerError> {
    let package = state.engine.package(package_id).await?;
    Ok(Json(map_package(package)))
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<PackageNew>,
) -> Result<(StatusCode, Json<PackageView>), ServerError> {
    payload.validate()?;
    let package = state
        .engine
        .create_package(
            engine::PackageNew {
                company_id: payload.company_id,
                city_id: payload.city_id,
                title: payload.title,
                description: payload.description,
                duration_days: payload.duration_days,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_package(package))))
}

pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(package_id): Path<Uuid>,
    Json(payload): Json<PackageUpdate>,
) -> Result<Json<PackageView>, ServerError> {
    payload.validate()?;
    let package = state
        .engine
        .update_package(
            package_id,
            engine::PackageUpdate {
                title: payload.title,
                description: payload.description,
                duration_days: payload.duration_days,
                active: payload.active,
            },
            user.id,
        )
        .await?;
    Ok(Json(map_package(package)))
}

pub async fn remove(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(package_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_package(package_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_pricing_option(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(package_id): Path<Uuid>,
    Json(payload): Json<PricingOptionNew>,
) -> Result<(StatusCode, Json<PricingOptionView>), ServerError> {
    payload.validate()?;
    let kind = match payload.kind {
        PricingKindView::PerPerson => PricingKind::PerPerson,
        PricingKindView::Flat => PricingKind::Flat,
    };
    let option = state
        .engine
        .add_pricing_option(
            package_id,
            engine::PricingOptionNew {
                label: payload.label,
                kind,
                price_minor: payload.price_minor,
                currency_id: payload.currency_id,
                valid_from: payload.valid_from,
                valid_to: payload.valid_to,
                max_participants: payload.max_participants,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_option(option))))
}

pub async fn remove_pricing_option(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path((package_id, option_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_pricing_option(package_id, option_id, user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
