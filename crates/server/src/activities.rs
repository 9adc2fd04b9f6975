//! Activities and their nested schedules and features.

use api_types::{
    Paginated,
    activity::{
        ActivityNew, ActivityQuery, ActivityUpdate, ActivityView, FeatureView, ScheduleNew,
        ScheduleView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{ActivityFilter, Page};
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, media::map_media, server::ServerState};

fn map_activity(activity: engine::Activity) -> ActivityView {
    ActivityView {
        id: activity.id,
        company_id: activity.company_id,
        city_id: activity.city_id,
        currency_id: activity.currency_id,
        language_id: activity.language_id,
        title: activity.title,
        description: activity.description,
        price_minor: activity.price.minor(),
        duration_minutes: activity.duration_minutes,
        created_at: activity.created_at,
        schedules: activity
            .schedules
            .into_iter()
            .map(|schedule| ScheduleView {
                id: schedule.id,
                weekday: schedule.weekday,
                start_time: schedule.start_time,
                end_time: schedule.end_time,
            })
            .collect(),
        features: activity
            .features
            .into_iter()
            .map(|feature| FeatureView {
                id: feature.id,
                name: feature.name,
            })
            .collect(),
        media: activity.media.into_iter().map(map_media).collect(),
    }
}

fn to_schedules(schedules: Vec<ScheduleNew>) -> Vec<engine::ScheduleNew> {
    schedules
        .into_iter()
        .map(|schedule| engine::ScheduleNew {
            weekday: schedule.weekday,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
        })
        .collect()
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Paginated<ActivityView>>, ServerError> {
    let filter = ActivityFilter {
        city_id: query.city_id,
        company_id: query.company_id,
        search: query.search,
    };
    let page = state
        .engine
        .list_activities(filter, Page::new(query.page, query.per_page))
        .await?;
    Ok(Json(Paginated {
        items: page.items.into_iter().map(map_activity).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<ActivityView>, ServerError> {
    let activity = state.engine.activity(activity_id).await?;
    Ok(Json(map_activity(activity)))
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ActivityNew>,
) -> Result<(StatusCode, Json<ActivityView>), ServerError> {
    payload.validate()?;
    let activity = state
        .engine
        .create_activity(
            engine::ActivityNew {
                company_id: payload.company_id,
                city_id: payload.city_id,
                currency_id: payload.currency_id,
                language_id: payload.language_id,
                title: payload.title,
                description: payload.description,
                price_minor: payload.price_minor,
                duration_minutes: payload.duration_minutes,
                schedules: to_schedules(payload.schedules),
                features: payload.features,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_activity(activity))))
}

pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(activity_id): Path<Uuid>,
    Json(payload): Json<ActivityUpdate>,
) -> Result<Json<ActivityView>, ServerError> {
    payload.validate()?;
    let activity = state
        .engine
        .update_activity(
            activity_id,
            engine::ActivityUpdate {
                title: payload.title,
                description: payload.description,
                price_minor: payload.price_minor,
                duration_minutes: payload.duration_minutes,
                language_id: payload.language_id,
                schedules: payload.schedules.map(to_schedules),
                features: payload.features,
            },
            user.id,
        )
        .await?;
    Ok(Json(map_activity(activity)))
}

pub async fn remove(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(activity_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_activity(activity_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
