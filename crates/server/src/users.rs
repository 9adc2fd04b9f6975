//! Account endpoints. Admins see everyone; other users only themselves.

use api_types::{
    PageQuery, Paginated,
    user::{Role as RoleView, UserUpdate, UserView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Page, Role, User};
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, server::ServerState};

pub(crate) fn map_user(user: User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        name: user.name,
        role: match user.role {
            Role::Traveler => RoleView::Traveler,
            Role::Admin => RoleView::Admin,
        },
        created_at: user.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<UserView>>, ServerError> {
    let page = state
        .engine
        .list_users(Page::new(query.page, query.per_page), user.id)
        .await?;
    Ok(Json(Paginated {
        items: page.items.into_iter().map(map_user).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

pub async fn get(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserView>, ServerError> {
    let found = state.engine.user(user_id, user.id).await?;
    Ok(Json(map_user(found)))
}

pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserView>, ServerError> {
    payload.validate()?;
    let updated = state
        .engine
        .update_user(
            user_id,
            engine::UserUpdate {
                name: payload.name,
                password: payload.password,
            },
            user.id,
        )
        .await?;
    Ok(Json(map_user(updated)))
}

pub async fn remove(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(user_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
