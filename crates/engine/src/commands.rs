//! Command structs for engine operations.
//!
//! These types group parameters for write operations and list queries,
//! keeping call sites readable and avoiding long argument lists.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{PricingKind, Role};

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: u64 = 20;
/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u64 = 100;

/// 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Page {
    /// Build a page request, clamping out-of-range values instead of failing.
    #[must_use]
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    /// Zero-based index, as the ORM paginator expects it.
    pub(crate) fn index(self) -> u64 {
        self.page - 1
    }
}

/// One page of results plus the total row count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

#[derive(Clone, Debug)]
pub struct UserNew {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

impl UserNew {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
            role: Role::Traveler,
        }
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CurrencyNew {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub minor_units: u8,
}

#[derive(Clone, Debug, Default)]
pub struct CurrencyUpdate {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub minor_units: Option<u8>,
}

#[derive(Clone, Debug)]
pub struct CityNew {
    pub country_id: Uuid,
    pub region_id: Option<Uuid>,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct CityFilter {
    pub country_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CompanyNew {
    pub name: String,
    pub email: String,
    pub city_id: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct PackageNew {
    pub company_id: Uuid,
    pub city_id: Uuid,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
}

#[derive(Clone, Debug, Default)]
pub struct PackageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<u32>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct PackageFilter {
    pub city_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
    /// Hide packages that cannot be booked.
    pub active_only: bool,
}

#[derive(Clone, Debug)]
pub struct PricingOptionNew {
    pub label: String,
    pub kind: PricingKind,
    pub price_minor: i64,
    pub currency_id: Uuid,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub max_participants: Option<u32>,
}

/// A weekly slot as submitted by a company. Weekday 0 is Monday.
#[derive(Clone, Debug)]
pub struct ScheduleNew {
    pub weekday: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Clone, Debug)]
pub struct ActivityNew {
    pub company_id: Uuid,
    pub city_id: Uuid,
    pub currency_id: Uuid,
    pub language_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub price_minor: i64,
    pub duration_minutes: u32,
    pub schedules: Vec<ScheduleNew>,
    pub features: Vec<String>,
}

/// Partial update. `schedules`/`features`, when present, replace the
/// existing set entirely.
#[derive(Clone, Debug, Default)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_minor: Option<i64>,
    pub duration_minutes: Option<u32>,
    pub language_id: Option<Uuid>,
    pub schedules: Option<Vec<ScheduleNew>>,
    pub features: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityFilter {
    pub city_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MediaNew {
    pub url: String,
    pub position: Option<i32>,
}

/// Ask the price of a trip without booking it.
#[derive(Clone, Debug)]
pub struct QuoteRequest {
    pub package_id: Uuid,
    pub pricing_option_id: Option<Uuid>,
    pub participants: u32,
    pub travel_date: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct BookingNew {
    pub package_id: Uuid,
    /// When omitted the cheapest option valid on `travel_date` is used.
    pub pricing_option_id: Option<Uuid>,
    pub participants: u32,
    pub travel_date: NaiveDate,
    pub notes: Option<String>,
}

impl From<&BookingNew> for QuoteRequest {
    fn from(cmd: &BookingNew) -> Self {
        Self {
            package_id: cmd.package_id,
            pricing_option_id: cmd.pricing_option_id,
            participants: cmd.participants,
            travel_date: cmd.travel_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(Page::new(None, None), Page::default());
        assert_eq!(
            Page::new(Some(0), Some(0)),
            Page {
                page: 1,
                per_page: 1
            }
        );
        assert_eq!(Page::new(Some(3), Some(1_000)).per_page, MAX_PER_PAGE);
        assert_eq!(Page::new(Some(3), None).index(), 2);
    }
}
