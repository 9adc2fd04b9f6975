//! Currencies prices and bookings are expressed in.
//!
//! ## Minor units
//!
//! The engine stores monetary values as an `i64` number of **minor units**
//! (see [`Money`](crate::Money)). `minor_units` says how many decimal digits
//! separate major from minor units: USD has 2, so `10.50 USD` ⇄ `1050`.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Currency {
    pub id: Uuid,
    /// ISO 4217 code, always upper case.
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub minor_units: u8,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub minor_units: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Currency {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            symbol: model.symbol,
            minor_units: u8::try_from(model.minor_units).unwrap_or(2),
        }
    }
}
