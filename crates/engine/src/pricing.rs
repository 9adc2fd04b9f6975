//! Booking price calculation.
//!
//! Everything here is pure: the booking service loads the package and its
//! options, then asks this module which option applies and what it costs.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{EngineError, Money, PricingKind, PricingOption, ResultEngine};

/// Share of every booking retained by the platform, in basis points (5%).
pub const COMMISSION_BPS: i64 = 500;

/// The price of a booking and how it is split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub pricing_option_id: Uuid,
    pub currency_id: Uuid,
    pub participants: u32,
    pub unit_price: Money,
    pub total: Money,
    pub commission: Money,
    pub company_amount: Money,
}

/// Amount charged for `participants` travellers under `option`.
fn charge(option: &PricingOption, participants: u32) -> ResultEngine<Money> {
    match option.kind {
        PricingKind::PerPerson => option.price.times(i64::from(participants)),
        PricingKind::Flat => Ok(option.price),
    }
}

fn fits_party(option: &PricingOption, participants: u32) -> bool {
    option
        .max_participants
        .is_none_or(|max| participants <= max)
}

/// Pick the pricing option a booking is charged with.
///
/// An explicitly requested option must belong to `options` and be valid on
/// `travel_date`. Without a request, the option with the lowest total for
/// `participants` wins among those valid on that date and large enough for
/// the party; ties keep the first one listed.
pub fn select_option(
    options: &[PricingOption],
    requested: Option<Uuid>,
    participants: u32,
    travel_date: NaiveDate,
) -> ResultEngine<&PricingOption> {
    if let Some(option_id) = requested {
        let option = options
            .iter()
            .find(|option| option.id == option_id)
            .ok_or_else(|| EngineError::KeyNotFound("pricing option not exists".to_string()))?;
        if !option.is_valid_on(travel_date) {
            return Err(EngineError::InvalidInput(format!(
                "pricing option '{}' is not available on {travel_date}",
                option.label
            )));
        }
        return Ok(option);
    }

    options
        .iter()
        .filter(|option| option.is_valid_on(travel_date) && fits_party(option, participants))
        .filter_map(|option| charge(option, participants).ok().map(|total| (total, option)))
        .min_by_key(|(total, _)| *total)
        .map(|(_, option)| option)
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "no pricing option available on {travel_date} for {participants} participant(s)"
            ))
        })
}

/// Price `participants` travellers with `option` for a trip starting on
/// `travel_date`, and split the total.
pub fn quote(
    option: &PricingOption,
    participants: u32,
    travel_date: NaiveDate,
) -> ResultEngine<Quote> {
    if !option.is_valid_on(travel_date) {
        return Err(EngineError::InvalidInput(format!(
            "pricing option '{}' is not available on {travel_date}",
            option.label
        )));
    }
    if participants == 0 {
        return Err(EngineError::InvalidInput(
            "participants must be at least 1".to_string(),
        ));
    }
    if !fits_party(option, participants) {
        return Err(EngineError::InvalidInput(format!(
            "pricing option '{}' allows at most {} participants",
            option.label,
            option.max_participants.unwrap_or(participants)
        )));
    }

    let total = charge(option, participants)?;
    let commission = total.percent_bps(COMMISSION_BPS)?;

    Ok(Quote {
        pricing_option_id: option.id,
        currency_id: option.currency_id,
        participants,
        unit_price: option.price,
        total,
        commission,
        company_amount: total - commission,
    })
}
