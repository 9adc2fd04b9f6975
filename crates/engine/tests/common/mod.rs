#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::Database;

use engine::{
    City, CityNew, Company, CompanyNew, Currency, CurrencyNew, Engine, Package, PackageNew,
    PricingKind, PricingOption, PricingOptionNew, Role, User, UserNew,
};
use migration::MigratorTrait;

pub const PASSWORD: &str = "correct horse";

/// A migrated in-memory database with an admin, a company owner, a
/// traveler and a small catalog.
pub struct World {
    pub engine: Engine,
    pub admin: User,
    pub owner: User,
    pub traveler: User,
    pub usd: Currency,
    pub city: City,
    pub company: Company,
}

pub async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub async fn world() -> World {
    let engine = engine().await;

    let admin = engine
        .register_user(UserNew::new("admin@example.com", "Admin", PASSWORD).role(Role::Admin))
        .await
        .unwrap();
    let owner = engine
        .register_user(UserNew::new("owner@example.com", "Olga Owner", PASSWORD))
        .await
        .unwrap();
    let traveler = engine
        .register_user(UserNew::new("traveler@example.com", "Tomás", PASSWORD))
        .await
        .unwrap();

    let usd = engine
        .create_currency(
            CurrencyNew {
                code: "usd".to_string(),
                name: "US Dollar".to_string(),
                symbol: "$".to_string(),
                minor_units: 2,
            },
            admin.id,
        )
        .await
        .unwrap();
    let country = engine
        .create_country("pe", "Peru", admin.id)
        .await
        .unwrap();
    let city = engine
        .create_city(
            CityNew {
                country_id: country.id,
                region_id: None,
                name: "Cusco".to_string(),
            },
            admin.id,
        )
        .await
        .unwrap();
    let company = engine
        .create_company(
            CompanyNew {
                name: "Andes Trails".to_string(),
                email: "Hello@AndesTrails.example".to_string(),
                city_id: Some(city.id),
            },
            owner.id,
        )
        .await
        .unwrap();

    World {
        engine,
        admin,
        owner,
        traveler,
        usd,
        city,
        company,
    }
}

pub fn days_from_now(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

impl World {
    pub async fn package(&self, title: &str) -> Package {
        self.engine
            .create_package(
                PackageNew {
                    company_id: self.company.id,
                    city_id: self.city.id,
                    title: title.to_string(),
                    description: "Four days on the Inca trail".to_string(),
                    duration_days: 4,
                },
                self.owner.id,
            )
            .await
            .unwrap()
    }

    pub async fn option(
        &self,
        package: &Package,
        label: &str,
        kind: PricingKind,
        price_minor: i64,
    ) -> PricingOption {
        self.engine
            .add_pricing_option(
                package.id,
                PricingOptionNew {
                    label: label.to_string(),
                    kind,
                    price_minor,
                    currency_id: self.usd.id,
                    valid_from: None,
                    valid_to: None,
                    max_participants: None,
                },
                self.owner.id,
            )
            .await
            .unwrap()
    }
}
