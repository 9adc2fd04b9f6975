//! Bookings: a user's reservation of a package through one pricing option.
//!
//! The price is frozen at creation time. `total = commission + company_amount`
//! always holds for a stored booking.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the booking still holds a place.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidInput(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_id: Uuid,
    pub pricing_option_id: Uuid,
    pub currency_id: Uuid,
    pub participants: u32,
    pub travel_date: NaiveDate,
    pub unit_price: Money,
    pub total_amount: Money,
    /// Platform share of `total_amount`.
    pub commission_amount: Money,
    /// Company share of `total_amount`.
    pub company_amount: Money,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_id: Uuid,
    pub pricing_option_id: Uuid,
    pub currency_id: Uuid,
    pub participants: i32,
    pub travel_date: Date,
    pub unit_price_minor: i64,
    pub total_amount_minor: i64,
    pub commission_amount_minor: i64,
    pub company_amount_minor: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub cancelled_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::packages::Entity",
        from = "Column::PackageId",
        to = "super::packages::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Package,
    #[sea_orm(
        belongs_to = "super::pricing_options::Entity",
        from = "Column::PricingOptionId",
        to = "super::pricing_options::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    PricingOption,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl Related<super::pricing_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Booking> for ActiveModel {
    fn from(booking: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(booking.id),
            user_id: ActiveValue::Set(booking.user_id),
            package_id: ActiveValue::Set(booking.package_id),
            pricing_option_id: ActiveValue::Set(booking.pricing_option_id),
            currency_id: ActiveValue::Set(booking.currency_id),
            participants: ActiveValue::Set(i32::try_from(booking.participants).unwrap_or(i32::MAX)),
            travel_date: ActiveValue::Set(booking.travel_date),
            unit_price_minor: ActiveValue::Set(booking.unit_price.minor()),
            total_amount_minor: ActiveValue::Set(booking.total_amount.minor()),
            commission_amount_minor: ActiveValue::Set(booking.commission_amount.minor()),
            company_amount_minor: ActiveValue::Set(booking.company_amount.minor()),
            status: ActiveValue::Set(booking.status.as_str().to_string()),
            notes: ActiveValue::Set(booking.notes.clone()),
            created_at: ActiveValue::Set(booking.created_at),
            cancelled_at: ActiveValue::Set(booking.cancelled_at),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            package_id: model.package_id,
            pricing_option_id: model.pricing_option_id,
            currency_id: model.currency_id,
            participants: u32::try_from(model.participants).map_err(|_| {
                EngineError::InvalidInput("invalid stored participant count".to_string())
            })?,
            travel_date: model.travel_date,
            unit_price: Money::new(model.unit_price_minor),
            total_amount: Money::new(model.total_amount_minor),
            commission_amount: Money::new(model.commission_amount_minor),
            company_amount: Money::new(model.company_amount_minor),
            status: BookingStatus::try_from(model.status.as_str())?,
            notes: model.notes,
            created_at: model.created_at,
            cancelled_at: model.cancelled_at,
        })
    }
}
