//! JSON request and response bodies of the HTTP API.
//!
//! Amounts are integer minor units (`*_minor`), dates are `YYYY-MM-DD` and
//! times `HH:MM:SS`. Request bodies carry `validator` rules that the server
//! checks before calling the engine.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `?page=&per_page=` query. Missing values fall back to page 1 and 20 items.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

pub mod auth {
    use super::*;
    use crate::user::UserView;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct Register {
        #[validate(email)]
        pub email: String,
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        #[validate(length(min = 8, max = 128))]
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct Login {
        #[validate(email)]
        pub email: String,
        #[validate(length(min = 1, max = 128))]
        pub password: String,
    }

    /// Returned by register and login. The same token is also set as the
    /// `access_token` cookie.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Session {
        pub access_token: String,
        pub token_type: String,
        /// Token lifetime in seconds.
        pub expires_in: i64,
        pub user: UserView,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Traveler,
        Admin,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub name: String,
        pub role: Role,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    pub struct UserUpdate {
        #[validate(length(min = 1, max = 100))]
        pub name: Option<String>,
        #[validate(length(min = 8, max = 128))]
        pub password: Option<String>,
    }
}

pub mod currency {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct CurrencyNew {
        /// ISO 4217 code, case-insensitive.
        #[validate(length(equal = 3))]
        pub code: String,
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        #[validate(length(min = 1, max = 8))]
        pub symbol: String,
        #[validate(range(max = 4))]
        pub minor_units: u8,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    pub struct CurrencyUpdate {
        #[validate(length(min = 1, max = 100))]
        pub name: Option<String>,
        #[validate(length(min = 1, max = 8))]
        pub symbol: Option<String>,
        #[validate(range(max = 4))]
        pub minor_units: Option<u8>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyView {
        pub id: Uuid,
        pub code: String,
        pub name: String,
        pub symbol: String,
        pub minor_units: u8,
    }
}

pub mod geo {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct CountryNew {
        /// ISO 3166-1 alpha-2 code.
        #[validate(length(equal = 2))]
        pub code: String,
        #[validate(length(min = 1, max = 100))]
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CountryView {
        pub id: Uuid,
        pub code: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct RegionNew {
        pub country_id: Uuid,
        #[validate(length(min = 1, max = 100))]
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegionView {
        pub id: Uuid,
        pub country_id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct CityNew {
        pub country_id: Uuid,
        pub region_id: Option<Uuid>,
        #[validate(length(min = 1, max = 100))]
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CityView {
        pub id: Uuid,
        pub country_id: Uuid,
        pub region_id: Option<Uuid>,
        pub name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CityQuery {
        pub country_id: Option<Uuid>,
        pub region_id: Option<Uuid>,
        /// Case- and accent-insensitive substring of the name.
        pub search: Option<String>,
        pub page: Option<u64>,
        pub per_page: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct LanguageNew {
        /// ISO 639-1 code.
        #[validate(length(equal = 2))]
        pub code: String,
        #[validate(length(min = 1, max = 100))]
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LanguageView {
        pub id: Uuid,
        pub code: String,
        pub name: String,
    }
}

pub mod company {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct CompanyNew {
        #[validate(length(min = 1, max = 200))]
        pub name: String,
        #[validate(email)]
        pub email: String,
        pub city_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyView {
        pub id: Uuid,
        pub owner_id: Uuid,
        pub name: String,
        pub email: String,
        pub city_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod media {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MediaOwnerKind {
        Activity,
        Package,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct MediaNew {
        pub owner_kind: MediaOwnerKind,
        pub owner_id: Uuid,
        #[validate(url, length(max = 2048))]
        pub url: String,
        /// Display order; appended last when omitted.
        #[validate(range(min = 0))]
        pub position: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MediaView {
        pub id: Uuid,
        pub owner_kind: MediaOwnerKind,
        pub owner_id: Uuid,
        pub url: String,
        pub position: i32,
        pub created_at: DateTime<Utc>,
    }
}

pub mod package {
    use super::*;
    use crate::media::MediaView;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PricingKind {
        PerPerson,
        Flat,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct PackageNew {
        pub company_id: Uuid,
        pub city_id: Uuid,
        #[validate(length(min = 1, max = 200))]
        pub title: String,
        #[validate(length(max = 10_000))]
        #[serde(default)]
        pub description: String,
        #[validate(range(min = 1, max = 365))]
        pub duration_days: u32,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    pub struct PackageUpdate {
        #[validate(length(min = 1, max = 200))]
        pub title: Option<String>,
        #[validate(length(max = 10_000))]
        pub description: Option<String>,
        #[validate(range(min = 1, max = 365))]
        pub duration_days: Option<u32>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PackageQuery {
        pub city_id: Option<Uuid>,
        pub company_id: Option<Uuid>,
        pub search: Option<String>,
        /// Inactive packages are hidden unless this is `true`.
        pub include_inactive: Option<bool>,
        pub page: Option<u64>,
        pub per_page: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct PricingOptionNew {
        #[validate(length(min = 1, max = 100))]
        pub label: String,
        pub kind: PricingKind,
        #[validate(range(min = 1))]
        pub price_minor: i64,
        pub currency_id: Uuid,
        pub valid_from: Option<NaiveDate>,
        pub valid_to: Option<NaiveDate>,
        #[validate(range(min = 1))]
        pub max_participants: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PricingOptionView {
        pub id: Uuid,
        pub label: String,
        pub kind: PricingKind,
        pub price_minor: i64,
        pub currency_id: Uuid,
        pub valid_from: Option<NaiveDate>,
        pub valid_to: Option<NaiveDate>,
        pub max_participants: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PackageView {
        pub id: Uuid,
        pub company_id: Uuid,
        pub city_id: Uuid,
        pub title: String,
        pub description: String,
        pub duration_days: u32,
        pub active: bool,
        pub created_at: DateTime<Utc>,
        pub pricing_options: Vec<PricingOptionView>,
        pub media: Vec<MediaView>,
    }
}

pub mod activity {
    use super::*;
    use crate::media::MediaView;

    /// Weekly slot; `weekday` is 0 for Monday through 6 for Sunday.
    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct ScheduleNew {
        #[validate(range(max = 6))]
        pub weekday: u8,
        pub start_time: NaiveTime,
        pub end_time: NaiveTime,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct ActivityNew {
        pub company_id: Uuid,
        pub city_id: Uuid,
        pub currency_id: Uuid,
        pub language_id: Option<Uuid>,
        #[validate(length(min = 1, max = 200))]
        pub title: String,
        #[validate(length(max = 10_000))]
        #[serde(default)]
        pub description: String,
        #[validate(range(min = 1))]
        pub price_minor: i64,
        #[validate(range(min = 1, max = 1440))]
        pub duration_minutes: u32,
        #[validate(length(max = 50), nested)]
        #[serde(default)]
        pub schedules: Vec<ScheduleNew>,
        #[validate(length(max = 30))]
        #[serde(default)]
        pub features: Vec<String>,
    }

    /// Lists, when present, replace the stored ones.
    #[derive(Debug, Default, Serialize, Deserialize, Validate)]
    pub struct ActivityUpdate {
        #[validate(length(min = 1, max = 200))]
        pub title: Option<String>,
        #[validate(length(max = 10_000))]
        pub description: Option<String>,
        #[validate(range(min = 1))]
        pub price_minor: Option<i64>,
        #[validate(range(min = 1, max = 1440))]
        pub duration_minutes: Option<u32>,
        pub language_id: Option<Uuid>,
        #[validate(length(max = 50), nested)]
        pub schedules: Option<Vec<ScheduleNew>>,
        #[validate(length(max = 30))]
        pub features: Option<Vec<String>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ActivityQuery {
        pub city_id: Option<Uuid>,
        pub company_id: Option<Uuid>,
        pub search: Option<String>,
        pub page: Option<u64>,
        pub per_page: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleView {
        pub id: Uuid,
        pub weekday: u8,
        pub start_time: NaiveTime,
        pub end_time: NaiveTime,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FeatureView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActivityView {
        pub id: Uuid,
        pub company_id: Uuid,
        pub city_id: Uuid,
        pub currency_id: Uuid,
        pub language_id: Option<Uuid>,
        pub title: String,
        pub description: String,
        pub price_minor: i64,
        pub duration_minutes: u32,
        pub created_at: DateTime<Utc>,
        pub schedules: Vec<ScheduleView>,
        pub features: Vec<FeatureView>,
        pub media: Vec<MediaView>,
    }
}

pub mod booking {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BookingStatus {
        Pending,
        Confirmed,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct QuoteRequest {
        pub package_id: Uuid,
        /// Cheapest option valid on `travel_date` when omitted.
        pub pricing_option_id: Option<Uuid>,
        #[validate(range(min = 1, max = 1000))]
        pub participants: u32,
        pub travel_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QuoteView {
        pub pricing_option_id: Uuid,
        pub currency_id: Uuid,
        pub participants: u32,
        pub unit_price_minor: i64,
        pub total_amount_minor: i64,
        pub commission_amount_minor: i64,
        pub company_amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    pub struct BookingNew {
        pub package_id: Uuid,
        pub pricing_option_id: Option<Uuid>,
        #[validate(range(min = 1, max = 1000))]
        pub participants: u32,
        pub travel_date: NaiveDate,
        #[validate(length(max = 2000))]
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub package_id: Uuid,
        pub pricing_option_id: Uuid,
        pub currency_id: Uuid,
        pub participants: u32,
        pub travel_date: NaiveDate,
        pub unit_price_minor: i64,
        pub total_amount_minor: i64,
        pub commission_amount_minor: i64,
        pub company_amount_minor: i64,
        pub status: BookingStatus,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub cancelled_at: Option<DateTime<Utc>>,
    }
}
