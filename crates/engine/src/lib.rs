//! Booking marketplace engine.
//!
//! The engine owns the relational model (users, catalog, bookings) and every
//! operation the HTTP layer exposes. All writes go through a database
//! transaction; callers identify themselves with the user id taken from their
//! session token.

pub use activities::Activity;
pub use activity_features::Feature;
pub use activity_schedules::Schedule;
pub use bookings::{Booking, BookingStatus};
pub use cities::City;
pub use commands::{
    ActivityFilter, ActivityNew, ActivityUpdate, BookingNew, CityFilter, CityNew, CompanyNew,
    CurrencyNew, CurrencyUpdate, MediaNew, Page, PackageFilter, PackageNew, PackageUpdate,
    Paginated, PricingOptionNew, QuoteRequest, ScheduleNew, UserNew, UserUpdate,
};
pub use companies::Company;
pub use countries::Country;
pub use currencies::Currency;
pub use error::EngineError;
pub use languages::Language;
pub use media::{Media, MediaOwner};
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use packages::Package;
pub use pricing::{COMMISSION_BPS, Quote};
pub use pricing_options::{PricingKind, PricingOption};
pub use regions::Region;
pub use users::{Role, User};

mod activities;
mod activity_features;
mod activity_schedules;
mod bookings;
mod cities;
mod commands;
mod companies;
mod countries;
mod currencies;
mod error;
mod languages;
mod media;
mod money;
mod ops;
mod packages;
mod password;
pub mod pricing;
mod pricing_options;
mod regions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
