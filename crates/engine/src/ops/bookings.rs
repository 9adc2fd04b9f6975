//! Quoting and booking packages.
//!
//! The arithmetic lives in [`crate::pricing`]; this module loads the
//! package, enforces who may see or change a booking and persists the
//! frozen price.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Booking, BookingNew, BookingStatus, EngineError, Page, Paginated, PricingOption, Quote,
    QuoteRequest, ResultEngine, bookings, packages, pricing, pricing_options,
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

fn check_travel_date(travel_date: NaiveDate) -> ResultEngine<()> {
    let today = Utc::now().date_naive();
    if travel_date < today {
        return Err(EngineError::InvalidInput(format!(
            "travel_date {travel_date} is in the past"
        )));
    }
    Ok(())
}

/// Price a request against the package's current options.
async fn price_request<C: ConnectionTrait>(
    conn: &C,
    request: &QuoteRequest,
) -> ResultEngine<Quote> {
    let package = packages::Entity::find_by_id(request.package_id)
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("package not exists".to_string()))?;
    if !package.active {
        return Err(EngineError::InvalidInput(format!(
            "package '{}' is not available for booking",
            package.title
        )));
    }

    let options = pricing_options::Entity::find()
        .filter(pricing_options::Column::PackageId.eq(package.id))
        .order_by_asc(pricing_options::Column::PriceMinor)
        .all(conn)
        .await?
        .into_iter()
        .map(PricingOption::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;

    let option = pricing::select_option(
        &options,
        request.pricing_option_id,
        request.participants,
        request.travel_date,
    )?;
    pricing::quote(option, request.participants, request.travel_date)
}

impl Engine {
    /// Price a trip without booking it. No authentication needed.
    pub async fn quote_booking(&self, request: QuoteRequest) -> ResultEngine<Quote> {
        check_travel_date(request.travel_date)?;
        price_request(&self.database, &request).await
    }

    /// Book a package as a `pending` reservation.
    ///
    /// The option is resolved and priced inside the same transaction that
    /// stores the booking, so the stored amounts match the option at that
    /// moment.
    pub async fn create_booking(&self, cmd: BookingNew, user_id: Uuid) -> ResultEngine<Booking> {
        check_travel_date(cmd.travel_date)?;
        let request = QuoteRequest::from(&cmd);
        let notes = normalize_optional_text(cmd.notes.as_deref());

        let booking = with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let quote = price_request(&db_tx, &request).await?;

            let booking = Booking {
                id: Uuid::new_v4(),
                user_id,
                package_id: cmd.package_id,
                pricing_option_id: quote.pricing_option_id,
                currency_id: quote.currency_id,
                participants: quote.participants,
                travel_date: cmd.travel_date,
                unit_price: quote.unit_price,
                total_amount: quote.total,
                commission_amount: quote.commission,
                company_amount: quote.company_amount,
                status: BookingStatus::Pending,
                notes,
                created_at: Utc::now(),
                cancelled_at: None,
            };
            bookings::ActiveModel::from(&booking).insert(&db_tx).await?;
            Ok::<_, EngineError>(booking)
        })?;

        tracing::info!(
            booking_id = %booking.id,
            %user_id,
            package_id = %booking.package_id,
            total = %booking.total_amount,
            "created booking"
        );
        Ok(booking)
    }

    /// Return a booking visible to the caller.
    ///
    /// Other users' bookings are reported as missing rather than forbidden.
    pub async fn booking(&self, booking_id: Uuid, user_id: Uuid) -> ResultEngine<Booking> {
        with_tx!(self, |db_tx| {
            let model = self.require_booking(&db_tx, booking_id, user_id).await?;
            Booking::try_from(model)
        })
    }

    /// The caller's bookings, newest first.
    pub async fn list_bookings(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> ResultEngine<Paginated<Booking>> {
        let paginator = bookings::Entity::find()
            .filter(bookings::Column::UserId.eq(user_id))
            .order_by_desc(bookings::Column::CreatedAt)
            .order_by_asc(bookings::Column::Id)
            .paginate(&self.database, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page.index())
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Paginated {
            items,
            page: page.page,
            per_page: page.per_page,
            total,
        })
    }

    /// Cancel a pending or confirmed booking.
    pub async fn cancel_booking(&self, booking_id: Uuid, user_id: Uuid) -> ResultEngine<Booking> {
        let booking = with_tx!(self, |db_tx| {
            let model = self.require_booking(&db_tx, booking_id, user_id).await?;
            let status = BookingStatus::try_from(model.status.as_str())?;
            if !status.is_open() {
                return Err(EngineError::Conflict(format!(
                    "booking is already {}",
                    status.as_str()
                )));
            }

            let mut active: bookings::ActiveModel = model.into();
            active.status = ActiveValue::Set(BookingStatus::Cancelled.as_str().to_string());
            active.cancelled_at = ActiveValue::Set(Some(Utc::now()));
            let model = active.update(&db_tx).await?;
            Booking::try_from(model)
        })?;

        tracing::info!(%booking_id, %user_id, "cancelled booking");
        Ok(booking)
    }

    /// Confirm a pending booking. Admin only.
    pub async fn confirm_booking(&self, booking_id: Uuid, user_id: Uuid) -> ResultEngine<Booking> {
        let booking = with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let model = bookings::Entity::find_by_id(booking_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("booking not exists".to_string()))?;
            let status = BookingStatus::try_from(model.status.as_str())?;
            if status != BookingStatus::Pending {
                return Err(EngineError::Conflict(format!(
                    "only pending bookings can be confirmed, booking is {}",
                    status.as_str()
                )));
            }

            let mut active: bookings::ActiveModel = model.into();
            active.status = ActiveValue::Set(BookingStatus::Confirmed.as_str().to_string());
            let model = active.update(&db_tx).await?;
            Booking::try_from(model)
        })?;

        tracing::info!(%booking_id, admin_id = %user_id, "confirmed booking");
        Ok(booking)
    }

    async fn require_booking(
        &self,
        db_tx: &DatabaseTransaction,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<bookings::Model> {
        let not_found = || EngineError::KeyNotFound("booking not exists".to_string());
        let model = bookings::Entity::find_by_id(booking_id)
            .one(db_tx)
            .await?
            .ok_or_else(not_found)?;
        if model.user_id != user_id && !self.is_admin(db_tx, user_id).await? {
            return Err(not_found());
        }
        Ok(model)
    }
}
