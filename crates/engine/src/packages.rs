//! Tourist packages.
//!
//! A package is the bookable product; what it costs is described by its
//! [`PricingOption`]s.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Media, PricingOption};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub id: Uuid,
    pub company_id: Uuid,
    pub city_id: Uuid,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    /// Inactive packages stay readable but cannot be booked.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub pricing_options: Vec<PricingOption>,
    pub media: Vec<Media>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tourist_packages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub city_id: Uuid,
    pub title: String,
    pub title_norm: String,
    pub description: String,
    pub duration_days: i32,
    pub active: bool,
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
    #[sea_orm(
        belongs_to = "super::cities::Entity",
        from = "Column::CityId",
        to = "super::cities::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    City,
    #[sea_orm(has_many = "super::pricing_options::Entity")]
    PricingOptions,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::cities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<super::pricing_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingOptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Package {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            company_id: model.company_id,
            city_id: model.city_id,
            title: model.title,
            description: model.description,
            duration_days: u32::try_from(model.duration_days).unwrap_or_default(),
            active: model.active,
            created_at: model.created_at,
            pricing_options: Vec::new(),
            media: Vec::new(),
        }
    }
}
