use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, Media, MediaNew, MediaOwner, ResultEngine, media};

use super::{Engine, with_tx};

fn normalize_url(url: &str) -> ResultEngine<String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| EngineError::InvalidInput("media url must be http(s)".to_string()))?;
    if rest.is_empty() || rest.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidInput(format!("invalid media url: {url}")));
    }
    Ok(url.to_string())
}

/// Load media for many owners of the same kind in one query.
pub(super) async fn media_by_owner<C: ConnectionTrait>(
    conn: &C,
    kind: &str,
    owner_ids: &[Uuid],
) -> ResultEngine<HashMap<Uuid, Vec<Media>>> {
    let mut grouped: HashMap<Uuid, Vec<Media>> = HashMap::new();
    if owner_ids.is_empty() {
        return Ok(grouped);
    }

    let models = media::Entity::find()
        .filter(media::Column::OwnerKind.eq(kind))
        .filter(media::Column::OwnerId.is_in(owner_ids.iter().copied()))
        .order_by_asc(media::Column::Position)
        .order_by_asc(media::Column::CreatedAt)
        .all(conn)
        .await?;
    for model in models {
        let item = Media::try_from(model)?;
        grouped.entry(item.owner.id()).or_default().push(item);
    }
    Ok(grouped)
}

/// Remove every media row of one owner (used when the owner is deleted).
pub(super) async fn delete_media_of(
    db_tx: &DatabaseTransaction,
    owner: MediaOwner,
) -> ResultEngine<()> {
    media::Entity::delete_many()
        .filter(media::Column::OwnerKind.eq(owner.kind()))
        .filter(media::Column::OwnerId.eq(owner.id()))
        .exec(db_tx)
        .await?;
    Ok(())
}

impl Engine {
    /// Attach an image to a package or activity the caller manages.
    ///
    /// Without an explicit position the image goes last.
    pub async fn add_media(
        &self,
        owner: MediaOwner,
        cmd: MediaNew,
        user_id: Uuid,
    ) -> ResultEngine<Media> {
        let url = normalize_url(&cmd.url)?;

        with_tx!(self, |db_tx| {
            self.require_media_owner_write(&db_tx, owner, user_id)
                .await?;

            let position = match cmd.position {
                Some(position) => position,
                None => {
                    let count = media::Entity::find()
                        .filter(media::Column::OwnerKind.eq(owner.kind()))
                        .filter(media::Column::OwnerId.eq(owner.id()))
                        .count(&db_tx)
                        .await?;
                    i32::try_from(count).unwrap_or(i32::MAX)
                }
            };

            let model = media::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                owner_kind: ActiveValue::Set(owner.kind().to_string()),
                owner_id: ActiveValue::Set(owner.id()),
                url: ActiveValue::Set(url),
                position: ActiveValue::Set(position),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Media::try_from(model)
        })
    }

    pub async fn list_media(&self, owner: MediaOwner) -> ResultEngine<Vec<Media>> {
        let mut grouped = media_by_owner(&self.database, owner.kind(), &[owner.id()]).await?;
        Ok(grouped.remove(&owner.id()).unwrap_or_default())
    }

    pub async fn remove_media(&self, media_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = media::Entity::find_by_id(media_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("media not exists".to_string()))?;
            let owner = Media::try_from(model.clone())?.owner;
            self.require_media_owner_write(&db_tx, owner, user_id)
                .await?;

            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    async fn require_media_owner_write(
        &self,
        db_tx: &DatabaseTransaction,
        owner: MediaOwner,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        match owner {
            MediaOwner::Activity(activity_id) => {
                self.require_activity_write(db_tx, activity_id, user_id)
                    .await?;
            }
            MediaOwner::Package(package_id) => {
                self.require_package_write(db_tx, package_id, user_id)
                    .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_must_be_http() {
        assert_eq!(
            normalize_url(" https://cdn.example.com/a.jpg ").unwrap(),
            "https://cdn.example.com/a.jpg"
        );
        assert!(normalize_url("ftp://example.com/a.jpg").is_err());
        assert!(normalize_url("https://").is_err());
        assert!(normalize_url("https://exa mple.com").is_err());
    }
}
