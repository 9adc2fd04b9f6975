//! Quotes and bookings.

use api_types::{
    PageQuery, Paginated,
    booking::{BookingNew, BookingStatus as StatusView, BookingView, QuoteRequest, QuoteView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{BookingStatus, Page, Quote};
use uuid::Uuid;
use validator::Validate;

use crate::{ServerError, auth::CurrentUser, server::ServerState};

fn map_quote(quote: Quote) -> QuoteView {
    QuoteView {
        pricing_option_id: quote.pricing_option_id,
        currency_id: quote.currency_id,
        participants: quote.participants,
        unit_price_minor: quote.unit_price.minor(),
        total_amount_minor: quote.total.minor(),
        commission_amount_minor: quote.commission.minor(),
        company_amount_minor: quote.company_amount.minor(),
    }
}

fn map_booking(booking: engine::Booking) -> BookingView {
    BookingView {
        id: booking.id,
        user_id: booking.user_id,
        package_id: booking.package_id,
        pricing_option_id: booking.pricing_option_id,
        currency_id: booking.currency_id,
        participants: booking.participants,
        travel_date: booking.travel_date,
        unit_price_minor: booking.unit_price.minor(),
        total_amount_minor: booking.total_amount.minor(),
        commission_amount_minor: booking.commission_amount.minor(),
        company_amount_minor: booking.company_amount.minor(),
        status: match booking.status {
            BookingStatus::Pending => StatusView::Pending,
            BookingStatus::Confirmed => StatusView::Confirmed,
            BookingStatus::Cancelled => StatusView::Cancelled,
        },
        notes: booking.notes,
        created_at: booking.created_at,
        cancelled_at: booking.cancelled_at,
    }
}

pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteView>, ServerError> {
    payload.validate()?;
    let quote = state
        .engine
        .quote_booking(engine::QuoteRequest {
            package_id: payload.package_id,
            pricing_option_id: payload.pricing_option_id,
            participants: payload.participants,
            travel_date: payload.travel_date,
        })
        .await?;
    Ok(Json(map_quote(quote)))
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BookingNew>,
) -> Result<(StatusCode, Json<BookingView>), ServerError> {
    payload.validate()?;
    let booking = state
        .engine
        .create_booking(
            engine::BookingNew {
                package_id: payload.package_id,
                pricing_option_id: payload.pricing_option_id,
                participants: payload.participants,
                travel_date: payload.travel_date,
                notes: payload.notes,
            },
            user.id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_booking(booking))))
}

/// The caller's own bookings, newest first.
pub async fn list(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<BookingView>>, ServerError> {
    let page = state
        .engine
        .list_bookings(user.id, Page::new(query.page, query.per_page))
        .await?;
    Ok(Json(Paginated {
        items: page.items.into_iter().map(map_booking).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

pub async fn get(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state.engine.booking(booking_id, user.id).await?;
    Ok(Json(map_booking(booking)))
}

pub async fn cancel(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state.engine.cancel_booking(booking_id, user.id).await?;
    Ok(Json(map_booking(booking)))
}

pub async fn confirm(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state.engine.confirm_booking(booking_id, user.id).await?;
    Ok(Json(map_booking(booking)))
}
