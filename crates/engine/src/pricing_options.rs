//! Pricing options: the priced variants of a package.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money};

/// How the option price scales with the party size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingKind {
    /// `price` is charged once per participant.
    #[default]
    PerPerson,
    /// `price` covers the whole party.
    Flat,
}

impl PricingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PerPerson => "per_person",
            Self::Flat => "flat",
        }
    }
}

impl TryFrom<&str> for PricingKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "per_person" => Ok(Self::PerPerson),
            "flat" => Ok(Self::Flat),
            other => Err(EngineError::InvalidInput(format!(
                "invalid pricing kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingOption {
    pub id: Uuid,
    pub package_id: Uuid,
    pub label: String,
    pub kind: PricingKind,
    pub price: Money,
    pub currency_id: Uuid,
    /// First travel date the option applies to (inclusive).
    pub valid_from: Option<NaiveDate>,
    /// Last travel date the option applies to (inclusive).
    pub valid_to: Option<NaiveDate>,
    pub max_participants: Option<u32>,
}

impl PricingOption {
    /// Whether the option can be sold for a trip starting on `date`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from.is_none_or(|from| from <= date)
            && self.valid_to.is_none_or(|to| date <= to)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pricing_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub package_id: Uuid,
    pub label: String,
    pub kind: String,
    pub price_minor: i64,
    pub currency_id: Uuid,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    pub max_participants: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::packages::Entity",
        from = "Column::PackageId",
        to = "super::packages::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Package,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyId",
        to = "super::currencies::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Currency,
}

impl Related<super::packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl Related<super::currencies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for PricingOption {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            package_id: model.package_id,
            label: model.label,
            kind: PricingKind::try_from(model.kind.as_str())?,
            price: Money::new(model.price_minor),
            currency_id: model.currency_id,
            valid_from: model.valid_from,
            valid_to: model.valid_to,
            max_participants: model.max_participants.and_then(|v| u32::try_from(v).ok()),
        })
    }
}
