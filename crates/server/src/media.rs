//! Images attached to packages and activities.

use api_types::media::{MediaNew, MediaOwnerKind, MediaView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::MediaOwner;
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, server::ServerState};

pub(crate) fn map_media(media: engine::Media) -> MediaView {
    let owner_kind = match media.owner {
        MediaOwner::Activity(_) => MediaOwnerKind::Activity,
        MediaOwner::Package(_) => MediaOwnerKind::Package,
    };
    MediaView {
        id: media.id,
        owner_kind,
        owner_id: media.owner.id(),
        url: media.url,
        position: media.position,
        created_at: media.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<MediaNew>,
) -> Result<(StatusCode, Json<MediaView>), ServerError> {
    payload.validate()?;
    let owner = match payload.owner_kind {
        MediaOwnerKind::Activity => MediaOwner::Activity(payload.owner_id),
        MediaOwnerKind::Package => MediaOwner::Package(payload.owner_id),
    };
    let media = state
        .engine
        .add_media(
            owner,
            engine::MediaNew {
                url: payload.url,
                position: payload.position,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_media(media))))
}

pub async fn remove(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(media_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_media(media_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
