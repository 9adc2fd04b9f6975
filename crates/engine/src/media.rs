//! Images attached to packages and activities.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::EngineError;

pub(crate) const ACTIVITY_KIND: &str = "activity";
pub(crate) const PACKAGE_KIND: &str = "package";

/// The catalog item a media row belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaOwner {
    Activity(Uuid),
    Package(Uuid),
}

impl MediaOwner {
    pub fn kind(self) -> &'static str {
        match self {
            Self::Activity(_) => ACTIVITY_KIND,
            Self::Package(_) => PACKAGE_KIND,
        }
    }

    pub fn id(self) -> Uuid {
        match self {
            Self::Activity(id) | Self::Package(id) => id,
        }
    }

    fn from_parts(kind: &str, id: Uuid) -> Result<Self, EngineError> {
        match kind {
            ACTIVITY_KIND => Ok(Self::Activity(id)),
            PACKAGE_KIND => Ok(Self::Package(id)),
            other => Err(EngineError::InvalidInput(format!(
                "invalid media owner: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Media {
    pub id: Uuid,
    pub owner: MediaOwner,
    pub url: String,
    /// Display order, lowest first.
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_kind: String,
    pub owner_id: Uuid,
    pub url: String,
    pub position: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Media {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner: MediaOwner::from_parts(&model.owner_kind, model.owner_id)?,
            url: model.url,
            position: model.position,
            created_at: model.created_at,
        })
    }
}
