//! Activities: single-day experiences (tours, classes, excursions).
//!
//! An activity owns its [`Schedule`]s and [`Feature`]s; they are created,
//! replaced and deleted together with it.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Feature, Media, Money, Schedule};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub city_id: Uuid,
    pub currency_id: Uuid,
    pub language_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub schedules: Vec<Schedule>,
    pub features: Vec<Feature>,
    pub media: Vec<Media>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub city_id: Uuid,
    pub currency_id: Uuid,
    pub language_id: Option<Uuid>,
    pub title: String,
    pub title_norm: String,
    pub description: String,
    pub price_minor: i64,
    pub duration_minutes: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Company,
    #[sea_orm(has_many = "super::activity_schedules::Entity")]
    Schedules,
    #[sea_orm(has_many = "super::activity_features::Entity")]
    Features,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::activity_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl Related<super::activity_features::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Features.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Activity {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            company_id: model.company_id,
            city_id: model.city_id,
            currency_id: model.currency_id,
            language_id: model.language_id,
            title: model.title,
            description: model.description,
            price: Money::new(model.price_minor),
            duration_minutes: u32::try_from(model.duration_minutes).unwrap_or_default(),
            created_at: model.created_at,
            schedules: Vec::new(),
            features: Vec::new(),
            media: Vec::new(),
        }
    }
}
