use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, MediaOwner, Package, PackageFilter, PackageNew, PackageUpdate, Page, Paginated,
    PricingOption, PricingOptionNew, ResultEngine, bookings, media, packages, pricing_options,
    util::{normalize_optional_text, normalize_required_name, search_key},
};

use super::{
    Engine,
    media::{delete_media_of, media_by_owner},
    with_tx,
};

fn check_duration_days(duration_days: u32) -> ResultEngine<i32> {
    if duration_days == 0 {
        return Err(EngineError::InvalidInput(
            "duration_days must be at least 1".to_string(),
        ));
    }
    i32::try_from(duration_days)
        .map_err(|_| EngineError::InvalidInput("duration_days is too large".to_string()))
}

/// Attach pricing options and media to freshly loaded packages.
async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    models: Vec<packages::Model>,
) -> ResultEngine<Vec<Package>> {
    let ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();

    let mut options: HashMap<Uuid, Vec<PricingOption>> = HashMap::new();
    if !ids.is_empty() {
        let option_models = pricing_options::Entity::find()
            .filter(pricing_options::Column::PackageId.is_in(ids.iter().copied()))
            .order_by_asc(pricing_options::Column::PriceMinor)
            .order_by_asc(pricing_options::Column::Label)
            .all(conn)
            .await?;
        for model in option_models {
            let option = PricingOption::try_from(model)?;
            options.entry(option.package_id).or_default().push(option);
        }
    }
    let mut images = media_by_owner(conn, media::PACKAGE_KIND, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut package = Package::from(model);
            package.pricing_options = options.remove(&id).unwrap_or_default();
            package.media = images.remove(&id).unwrap_or_default();
            package
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(
    conn: &C,
    model: packages::Model,
) -> ResultEngine<Package> {
    hydrate(conn, vec![model])
        .await?
        .pop()
        .ok_or_else(|| EngineError::KeyNotFound("package not exists".to_string()))
}

impl Engine {
    /// Publish a package under a company the caller manages.
    ///
    /// New packages are active but have no pricing options yet, so they
    /// cannot be booked until one is added.
    pub async fn create_package(&self, cmd: PackageNew, user_id: Uuid) -> ResultEngine<Package> {
        let title = normalize_required_name(&cmd.title, "package title")?;
        let description =
            normalize_optional_text(Some(cmd.description.as_str())).unwrap_or_default();
        let duration_days = check_duration_days(cmd.duration_days)?;

        with_tx!(self, |db_tx| {
            self.require_company_write(&db_tx, cmd.company_id, user_id)
                .await?;
            self.require_city(&db_tx, cmd.city_id).await?;

            let model = packages::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                company_id: ActiveValue::Set(cmd.company_id),
                city_id: ActiveValue::Set(cmd.city_id),
                title_norm: ActiveValue::Set(search_key(&title)),
                title: ActiveValue::Set(title),
                description: ActiveValue::Set(description),
                duration_days: ActiveValue::Set(duration_days),
                active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(package_id = %model.id, company_id = %cmd.company_id, "created package");
            Ok(Package::from(model))
        })
    }

    /// Return a package with its pricing options (cheapest first) and media.
    pub async fn package(&self, package_id: Uuid) -> ResultEngine<Package> {
        let model = packages::Entity::find_by_id(package_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("package not exists".to_string()))?;
        hydrate_one(&self.database, model).await
    }

    /// Newest packages first.
    pub async fn list_packages(
        &self,
        filter: PackageFilter,
        page: Page,
    ) -> ResultEngine<Paginated<Package>> {
        let mut query = packages::Entity::find();
        if let Some(city_id) = filter.city_id {
            query = query.filter(packages::Column::CityId.eq(city_id));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(packages::Column::CompanyId.eq(company_id));
        }
        if filter.active_only {
            query = query.filter(packages::Column::Active.eq(true));
        }
        if let Some(search) = filter.search.as_deref().map(search_key)
            && !search.is_empty()
        {
            query = query.filter(packages::Column::TitleNorm.contains(search));
        }

        let paginator = query
            .order_by_desc(packages::Column::CreatedAt)
            .order_by_asc(packages::Column::Id)
            .paginate(&self.database, page.per_page);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.index()).await?;
        let items = hydrate(&self.database, models).await?;

        Ok(Paginated {
            items,
            page: page.page,
            per_page: page.per_page,
            total,
        })
    }

    pub async fn update_package(
        &self,
        package_id: Uuid,
        update: PackageUpdate,
        user_id: Uuid,
    ) -> ResultEngine<Package> {
        if update.title.is_none()
            && update.description.is_none()
            && update.duration_days.is_none()
            && update.active.is_none()
        {
            return Err(EngineError::InvalidInput(
                "provide at least one of title, description, duration_days or active".to_string(),
            ));
        }
        let title = update
            .title
            .as_deref()
            .map(|title| normalize_required_name(title, "package title"))
            .transpose()?;
        let duration_days = update.duration_days.map(check_duration_days).transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_package_write(&db_tx, package_id, user_id)
                .await?;

            let mut active: packages::ActiveModel = model.into();
            if let Some(title) = title {
                active.title_norm = ActiveValue::Set(search_key(&title));
                active.title = ActiveValue::Set(title);
            }
            if let Some(description) = update.description.as_deref() {
                let description = normalize_optional_text(Some(description)).unwrap_or_default();
                active.description = ActiveValue::Set(description);
            }
            if let Some(duration_days) = duration_days {
                active.duration_days = ActiveValue::Set(duration_days);
            }
            if let Some(is_active) = update.active {
                active.active = ActiveValue::Set(is_active);
            }
            let model = active.update(&db_tx).await?;
            hydrate_one(&db_tx, model).await
        })
    }

    /// Delete a package that was never booked, with its options and media.
    ///
    /// Booked packages should be deactivated instead.
    pub async fn delete_package(&self, package_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_package_write(&db_tx, package_id, user_id)
                .await?;

            let booked = bookings::Entity::find()
                .filter(bookings::Column::PackageId.eq(package_id))
                .count(&db_tx)
                .await?;
            if booked > 0 {
                return Err(EngineError::Conflict(format!(
                    "package has {booked} booking(s); deactivate it instead"
                )));
            }

            pricing_options::Entity::delete_many()
                .filter(pricing_options::Column::PackageId.eq(package_id))
                .exec(&db_tx)
                .await?;
            delete_media_of(&db_tx, MediaOwner::Package(package_id)).await?;
            model.delete(&db_tx).await?;
            tracing::info!(%package_id, %user_id, "deleted package");
            Ok(())
        })
    }

    pub async fn add_pricing_option(
        &self,
        package_id: Uuid,
        cmd: PricingOptionNew,
        user_id: Uuid,
    ) -> ResultEngine<PricingOption> {
        let label = normalize_required_name(&cmd.label, "pricing option label")?;
        if cmd.price_minor <= 0 {
            return Err(EngineError::InvalidInput(
                "price must be greater than zero".to_string(),
            ));
        }
        if let (Some(from), Some(to)) = (cmd.valid_from, cmd.valid_to)
            && from > to
        {
            return Err(EngineError::InvalidInput(
                "valid_from must not be after valid_to".to_string(),
            ));
        }
        let max_participants = match cmd.max_participants {
            Some(0) => {
                return Err(EngineError::InvalidInput(
                    "max_participants must be at least 1".to_string(),
                ));
            }
            Some(max) => Some(i32::try_from(max).map_err(|_| {
                EngineError::InvalidInput("max_participants is too large".to_string())
            })?),
            None => None,
        };

        with_tx!(self, |db_tx| {
            self.require_package_write(&db_tx, package_id, user_id)
                .await?;
            self.require_currency(&db_tx, cmd.currency_id).await?;

            let model = pricing_options::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                package_id: ActiveValue::Set(package_id),
                label: ActiveValue::Set(label),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                price_minor: ActiveValue::Set(cmd.price_minor),
                currency_id: ActiveValue::Set(cmd.currency_id),
                valid_from: ActiveValue::Set(cmd.valid_from),
                valid_to: ActiveValue::Set(cmd.valid_to),
                max_participants: ActiveValue::Set(max_participants),
            }
            .insert(&db_tx)
            .await?;
            PricingOption::try_from(model)
        })
    }

    /// Remove a pricing option no booking refers to.
    pub async fn remove_pricing_option(
        &self,
        package_id: Uuid,
        option_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_package_write(&db_tx, package_id, user_id)
                .await?;
            let option = pricing_options::Entity::find_by_id(option_id)
                .filter(pricing_options::Column::PackageId.eq(package_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("pricing option not exists".to_string())
                })?;

            let booked = bookings::Entity::find()
                .filter(bookings::Column::PricingOptionId.eq(option_id))
                .count(&db_tx)
                .await?;
            if booked > 0 {
                return Err(EngineError::Conflict(format!(
                    "pricing option '{}' is used by {booked} booking(s)",
                    option.label
                )));
            }

            option.delete(&db_tx).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_must_be_positive() {
        assert!(check_duration_days(0).is_err());
        assert_eq!(check_duration_days(7).unwrap(), 7);
        assert!(check_duration_days(u32::MAX).is_err());
    }
}
