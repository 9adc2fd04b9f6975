use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Currency, CurrencyNew, CurrencyUpdate, EngineError, ResultEngine, activities, bookings,
    currencies, pricing_options,
    util::{normalize_code, normalize_required_name},
};

use super::{Engine, with_tx};

const MAX_MINOR_UNITS: u8 = 4;

fn check_minor_units(minor_units: u8) -> ResultEngine<()> {
    if minor_units > MAX_MINOR_UNITS {
        return Err(EngineError::InvalidInput(format!(
            "minor_units must be between 0 and {MAX_MINOR_UNITS}"
        )));
    }
    Ok(())
}

impl Engine {
    /// Register a currency. Admin only.
    pub async fn create_currency(&self, cmd: CurrencyNew, user_id: Uuid) -> ResultEngine<Currency> {
        let code = normalize_code(&cmd.code, 3, "currency")?;
        let name = normalize_required_name(&cmd.name, "currency name")?;
        let symbol = normalize_required_name(&cmd.symbol, "currency symbol")?;
        check_minor_units(cmd.minor_units)?;

        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;

            let exists = currencies::Entity::find()
                .filter(currencies::Column::Code.eq(code.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(code));
            }

            let model = currencies::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                code: ActiveValue::Set(code.clone()),
                name: ActiveValue::Set(name),
                symbol: ActiveValue::Set(symbol),
                minor_units: ActiveValue::Set(i32::from(cmd.minor_units)),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%code, "created currency");
            Ok(Currency::from(model))
        })
    }

    pub async fn currency(&self, currency_id: Uuid) -> ResultEngine<Currency> {
        with_tx!(self, |db_tx| {
            let model = self.require_currency(&db_tx, currency_id).await?;
            Ok(Currency::from(model))
        })
    }

    /// Look a currency up by ISO code, case-insensitively.
    pub async fn currency_by_code(&self, code: &str) -> ResultEngine<Currency> {
        let code = normalize_code(code, 3, "currency")?;
        let model = currencies::Entity::find()
            .filter(currencies::Column::Code.eq(code.clone()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(code))?;
        Ok(Currency::from(model))
    }

    /// All currencies ordered by code.
    pub async fn list_currencies(&self) -> ResultEngine<Vec<Currency>> {
        let models = currencies::Entity::find()
            .order_by_asc(currencies::Column::Code)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Currency::from).collect())
    }

    /// Update display fields of a currency. The code is immutable. Admin only.
    pub async fn update_currency(
        &self,
        currency_id: Uuid,
        update: CurrencyUpdate,
        user_id: Uuid,
    ) -> ResultEngine<Currency> {
        if update.name.is_none() && update.symbol.is_none() && update.minor_units.is_none() {
            return Err(EngineError::InvalidInput(
                "provide at least one of name, symbol or minor_units".to_string(),
            ));
        }
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "currency name"))
            .transpose()?;
        let symbol = update
            .symbol
            .as_deref()
            .map(|symbol| normalize_required_name(symbol, "currency symbol"))
            .transpose()?;
        if let Some(minor_units) = update.minor_units {
            check_minor_units(minor_units)?;
        }

        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let model = self.require_currency(&db_tx, currency_id).await?;

            let mut active: currencies::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(symbol) = symbol {
                active.symbol = ActiveValue::Set(symbol);
            }
            if let Some(minor_units) = update.minor_units {
                active.minor_units = ActiveValue::Set(i32::from(minor_units));
            }
            let model = active.update(&db_tx).await?;
            Ok(Currency::from(model))
        })
    }

    /// Delete a currency nothing refers to. Admin only.
    pub async fn delete_currency(&self, currency_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let model = self.require_currency(&db_tx, currency_id).await?;

            let in_options = pricing_options::Entity::find()
                .filter(pricing_options::Column::CurrencyId.eq(currency_id))
                .count(&db_tx)
                .await?;
            let in_activities = activities::Entity::find()
                .filter(activities::Column::CurrencyId.eq(currency_id))
                .count(&db_tx)
                .await?;
            let in_bookings = bookings::Entity::find()
                .filter(bookings::Column::CurrencyId.eq(currency_id))
                .count(&db_tx)
                .await?;
            if in_options + in_activities + in_bookings > 0 {
                return Err(EngineError::Conflict(format!(
                    "currency {} is in use",
                    model.code
                )));
            }

            tracing::info!(code = %model.code, "deleted currency");
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
