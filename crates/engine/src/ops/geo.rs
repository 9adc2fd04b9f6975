//! Geography and language lookups.
//!
//! Reads are public; writes are reserved to administrators.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    City, CityFilter, CityNew, Country, EngineError, Language, Page, Paginated, Region,
    ResultEngine, cities, countries, languages, regions,
    util::{normalize_code, normalize_required_name, search_key},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn create_country(
        &self,
        code: &str,
        name: &str,
        user_id: Uuid,
    ) -> ResultEngine<Country> {
        let code = normalize_code(code, 2, "country")?;
        let name = normalize_required_name(name, "country name")?;

        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let exists = countries::Entity::find()
                .filter(countries::Column::Code.eq(code.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(code));
            }

            let model = countries::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                code: ActiveValue::Set(code),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(Country::from(model))
        })
    }

    pub async fn list_countries(&self) -> ResultEngine<Vec<Country>> {
        let models = countries::Entity::find()
            .order_by_asc(countries::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Country::from).collect())
    }

    pub async fn create_region(
        &self,
        country_id: Uuid,
        name: &str,
        user_id: Uuid,
    ) -> ResultEngine<Region> {
        let name = normalize_required_name(name, "region name")?;

        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.require_country(&db_tx, country_id).await?;

            let model = regions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                country_id: ActiveValue::Set(country_id),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(Region::from(model))
        })
    }

    pub async fn list_regions(&self, country_id: Uuid) -> ResultEngine<Vec<Region>> {
        let models = regions::Entity::find()
            .filter(regions::Column::CountryId.eq(country_id))
            .order_by_asc(regions::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Region::from).collect())
    }

    /// Add a city. When a region is given it must belong to the same country.
    pub async fn create_city(&self, cmd: CityNew, user_id: Uuid) -> ResultEngine<City> {
        let name = normalize_required_name(&cmd.name, "city name")?;

        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            self.require_country(&db_tx, cmd.country_id).await?;
            if let Some(region_id) = cmd.region_id {
                let region = regions::Entity::find_by_id(region_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("region not exists".to_string()))?;
                if region.country_id != cmd.country_id {
                    return Err(EngineError::InvalidInput(
                        "region belongs to another country".to_string(),
                    ));
                }
            }

            let model = cities::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                country_id: ActiveValue::Set(cmd.country_id),
                region_id: ActiveValue::Set(cmd.region_id),
                name_norm: ActiveValue::Set(search_key(&name)),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(City::from(model))
        })
    }

    pub async fn city(&self, city_id: Uuid) -> ResultEngine<City> {
        with_tx!(self, |db_tx| {
            let model = self.require_city(&db_tx, city_id).await?;
            Ok(City::from(model))
        })
    }

    /// Cities ordered by name. `search` matches anywhere in the name,
    /// ignoring case and accents.
    pub async fn list_cities(
        &self,
        filter: CityFilter,
        page: Page,
    ) -> ResultEngine<Paginated<City>> {
        let mut query = cities::Entity::find();
        if let Some(country_id) = filter.country_id {
            query = query.filter(cities::Column::CountryId.eq(country_id));
        }
        if let Some(region_id) = filter.region_id {
            query = query.filter(cities::Column::RegionId.eq(region_id));
        }
        if let Some(search) = filter.search.as_deref().map(search_key)
            && !search.is_empty()
        {
            query = query.filter(cities::Column::NameNorm.contains(search));
        }

        let paginator = query
            .order_by_asc(cities::Column::NameNorm)
            .paginate(&self.database, page.per_page);
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page.index())
            .await?
            .into_iter()
            .map(City::from)
            .collect();

        Ok(Paginated {
            items,
            page: page.page,
            per_page: page.per_page,
            total,
        })
    }

    pub async fn create_language(
        &self,
        code: &str,
        name: &str,
        user_id: Uuid,
    ) -> ResultEngine<Language> {
        let code = normalize_code(code, 2, "language")?.to_ascii_lowercase();
        let name = normalize_required_name(name, "language name")?;

        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let exists = languages::Entity::find()
                .filter(languages::Column::Code.eq(code.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(code));
            }

            let model = languages::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                code: ActiveValue::Set(code),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(Language::from(model))
        })
    }

    pub async fn list_languages(&self) -> ResultEngine<Vec<Language>> {
        let models = languages::Entity::find()
            .order_by_asc(languages::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Language::from).collect())
    }

    async fn require_country(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        country_id: Uuid,
    ) -> ResultEngine<countries::Model> {
        countries::Entity::find_by_id(country_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("country not exists".to_string()))
    }
}
