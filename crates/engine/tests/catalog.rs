mod common;

use chrono::NaiveTime;
use engine::{
    ActivityFilter, ActivityNew, ActivityUpdate, CityFilter, CityNew, CurrencyNew, CurrencyUpdate,
    EngineError, MediaNew, MediaOwner, Page, PackageFilter, PackageUpdate, PricingKind,
    ScheduleNew,
};

use common::{World, world};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn city_tour(world: &World) -> ActivityNew {
    ActivityNew {
        company_id: world.company.id,
        city_id: world.city.id,
        currency_id: world.usd.id,
        language_id: None,
        title: "City walking tour".to_string(),
        description: "Three hours through San Blas".to_string(),
        price_minor: 35_00,
        duration_minutes: 180,
        schedules: vec![
            ScheduleNew {
                weekday: 2,
                start_time: time(14, 0),
                end_time: time(17, 0),
            },
            ScheduleNew {
                weekday: 0,
                start_time: time(9, 0),
                end_time: time(12, 0),
            },
        ],
        features: vec![
            "Local guide".to_string(),
            "local guide".to_string(),
            "Coca tea".to_string(),
        ],
    }
}

#[tokio::test]
async fn activity_is_created_with_its_schedules_and_features() {
    let world = world().await;

    let activity = world
        .engine
        .create_activity(city_tour(&world), world.owner.id)
        .await
        .unwrap();

    assert_eq!(activity.schedules.len(), 2);
    assert_eq!(activity.schedules[0].weekday, 0);
    assert_eq!(activity.schedules[1].weekday, 2);
    let features: Vec<_> = activity.features.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(features, vec!["Coca tea", "Local guide"]);

    let loaded = world.engine.activity(activity.id).await.unwrap();
    assert_eq!(loaded.schedules, activity.schedules);
    assert_eq!(loaded.features, activity.features);
}

#[tokio::test]
async fn invalid_schedule_rolls_back_the_whole_activity() {
    let world = world().await;
    let mut cmd = city_tour(&world);
    cmd.schedules.push(ScheduleNew {
        weekday: 9,
        start_time: time(9, 0),
        end_time: time(10, 0),
    });

    let err = world
        .engine
        .create_activity(cmd, world.owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let listed = world
        .engine
        .list_activities(ActivityFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn activity_update_replaces_only_the_given_lists() {
    let world = world().await;
    let activity = world
        .engine
        .create_activity(city_tour(&world), world.owner.id)
        .await
        .unwrap();

    let updated = world
        .engine
        .update_activity(
            activity.id,
            ActivityUpdate {
                price_minor: Some(40_00),
                schedules: Some(vec![ScheduleNew {
                    weekday: 5,
                    start_time: time(10, 0),
                    end_time: time(13, 0),
                }]),
                ..ActivityUpdate::default()
            },
            world.owner.id,
        )
        .await
        .unwrap();

    assert_eq!(updated.price.minor(), 40_00);
    assert_eq!(updated.schedules.len(), 1);
    assert_eq!(updated.schedules[0].weekday, 5);
    assert_eq!(updated.features.len(), 2);

    let err = world
        .engine
        .update_activity(
            activity.id,
            ActivityUpdate {
                features: Some(vec![]),
                ..ActivityUpdate::default()
            },
            world.traveler.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn deleting_an_activity_removes_its_media() {
    let world = world().await;
    let activity = world
        .engine
        .create_activity(city_tour(&world), world.owner.id)
        .await
        .unwrap();
    let owner = MediaOwner::Activity(activity.id);

    world
        .engine
        .add_media(
            owner,
            MediaNew {
                url: "https://cdn.example.com/san-blas.jpg".to_string(),
                position: None,
            },
            world.owner.id,
        )
        .await
        .unwrap();
    let second = world
        .engine
        .add_media(
            owner,
            MediaNew {
                url: "https://cdn.example.com/plaza.jpg".to_string(),
                position: None,
            },
            world.owner.id,
        )
        .await
        .unwrap();
    assert_eq!(second.position, 1);
    assert_eq!(world.engine.list_media(owner).await.unwrap().len(), 2);

    world
        .engine
        .delete_activity(activity.id, world.owner.id)
        .await
        .unwrap();
    assert!(world.engine.list_media(owner).await.unwrap().is_empty());
    assert!(matches!(
        world.engine.activity(activity.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn packages_are_searchable_without_accents() {
    let world = world().await;
    let trek = world.package("Trek al Nevado Ausangate").await;
    world.package("Montaña de Siete Colores").await;
    world
        .option(&trek, "Standard", PricingKind::PerPerson, 600_00)
        .await;

    let found = world
        .engine
        .list_packages(
            PackageFilter {
                search: Some("MONTANA".to_string()),
                ..PackageFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].title, "Montaña de Siete Colores");

    world
        .engine
        .update_package(
            trek.id,
            PackageUpdate {
                active: Some(false),
                ..PackageUpdate::default()
            },
            world.owner.id,
        )
        .await
        .unwrap();
    let active = world
        .engine
        .list_packages(
            PackageFilter {
                active_only: true,
                ..PackageFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(active.total, 1);

    let loaded = world.engine.package(trek.id).await.unwrap();
    assert_eq!(loaded.pricing_options.len(), 1);
    assert!(!loaded.active);
}

#[tokio::test]
async fn packages_belong_to_the_company_owner() {
    let world = world().await;
    let package = world.package("Choquequirao").await;

    let err = world
        .engine
        .update_package(
            package.id,
            PackageUpdate {
                title: Some("Stolen".to_string()),
                ..PackageUpdate::default()
            },
            world.traveler.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Admins may manage any company.
    world
        .engine
        .delete_package(package.id, world.admin.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn currencies_are_admin_managed_and_unique() {
    let world = world().await;
    let eur = CurrencyNew {
        code: "EUR".to_string(),
        name: "Euro".to_string(),
        symbol: "€".to_string(),
        minor_units: 2,
    };

    let err = world
        .engine
        .create_currency(eur.clone(), world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let created = world
        .engine
        .create_currency(eur.clone(), world.admin.id)
        .await
        .unwrap();
    assert_eq!(created.code, "EUR");
    let err = world
        .engine
        .create_currency(eur, world.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let updated = world
        .engine
        .update_currency(
            created.id,
            CurrencyUpdate {
                symbol: Some("EUR".to_string()),
                ..CurrencyUpdate::default()
            },
            world.admin.id,
        )
        .await
        .unwrap();
    assert_eq!(updated.symbol, "EUR");
    assert_eq!(
        world.engine.currency_by_code("eur").await.unwrap().id,
        created.id
    );

    world
        .engine
        .delete_currency(created.id, world.admin.id)
        .await
        .unwrap();
    assert_eq!(world.engine.list_currencies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn city_search_folds_case_and_accents() {
    let world = world().await;
    let country = world
        .engine
        .create_country("BR", "Brazil", world.admin.id)
        .await
        .unwrap();
    let region = world
        .engine
        .create_region(country.id, "São Paulo", world.admin.id)
        .await
        .unwrap();
    world
        .engine
        .create_city(
            CityNew {
                country_id: country.id,
                region_id: Some(region.id),
                name: "São Paulo".to_string(),
            },
            world.admin.id,
        )
        .await
        .unwrap();

    let found = world
        .engine
        .list_cities(
            CityFilter {
                search: Some("sao".to_string()),
                ..CityFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].name, "São Paulo");

    // A region from another country is rejected.
    let err = world
        .engine
        .create_city(
            CityNew {
                country_id: world.city.country_id,
                region_id: Some(region.id),
                name: "Arequipa".to_string(),
            },
            world.admin.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}
