mod common;

use engine::{
    BookingNew, BookingStatus, EngineError, Money, Page, PackageUpdate, PricingKind,
    PricingOptionNew, QuoteRequest,
};

use common::{days_from_now, world};

fn booking(package_id: uuid::Uuid, participants: u32) -> BookingNew {
    BookingNew {
        package_id,
        pricing_option_id: None,
        participants,
        travel_date: days_from_now(30),
        notes: Some("  vegetarian meals  ".to_string()),
    }
}

#[tokio::test]
async fn booking_freezes_price_and_commission() {
    let world = world().await;
    let package = world.package("Inca Trail").await;
    let standard = world
        .option(&package, "Standard", PricingKind::PerPerson, 450_00)
        .await;

    let created = world
        .engine
        .create_booking(booking(package.id, 3), world.traveler.id)
        .await
        .unwrap();

    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(created.pricing_option_id, standard.id);
    assert_eq!(created.currency_id, world.usd.id);
    assert_eq!(created.unit_price, Money::new(450_00));
    assert_eq!(created.total_amount, Money::new(1_350_00));
    assert_eq!(created.commission_amount, Money::new(67_50));
    assert_eq!(created.company_amount, Money::new(1_282_50));
    assert_eq!(created.notes.as_deref(), Some("vegetarian meals"));

    let stored = world
        .engine
        .booking(created.id, world.traveler.id)
        .await
        .unwrap();
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.total_amount, created.total_amount);
    assert_eq!(stored.travel_date, created.travel_date);
}

#[tokio::test]
async fn missing_option_falls_back_to_cheapest_valid_one() {
    let world = world().await;
    let package = world.package("Sacred Valley").await;
    world
        .option(&package, "Premium", PricingKind::PerPerson, 300_00)
        .await;
    world
        .option(&package, "Standard", PricingKind::PerPerson, 200_00)
        .await;
    // Cheapest overall, but only sold for trips in the next week.
    world
        .engine
        .add_pricing_option(
            package.id,
            PricingOptionNew {
                label: "Last minute".to_string(),
                kind: PricingKind::PerPerson,
                price_minor: 150_00,
                currency_id: world.usd.id,
                valid_from: None,
                valid_to: Some(days_from_now(7)),
                max_participants: None,
            },
            world.owner.id,
        )
        .await
        .unwrap();

    let quote = world
        .engine
        .quote_booking(QuoteRequest {
            package_id: package.id,
            pricing_option_id: None,
            participants: 2,
            travel_date: days_from_now(30),
        })
        .await
        .unwrap();
    assert_eq!(quote.unit_price, Money::new(200_00));
    assert_eq!(quote.total, Money::new(400_00));
    assert_eq!(quote.commission + quote.company_amount, quote.total);

    let quote = world
        .engine
        .quote_booking(QuoteRequest {
            package_id: package.id,
            pricing_option_id: None,
            participants: 2,
            travel_date: days_from_now(3),
        })
        .await
        .unwrap();
    assert_eq!(quote.unit_price, Money::new(150_00));
}

#[tokio::test]
async fn booking_rules_are_enforced() {
    let world = world().await;
    let package = world.package("Rainbow Mountain").await;

    // No pricing option yet.
    let err = world
        .engine
        .create_booking(booking(package.id, 1), world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    world
        .option(&package, "Private van", PricingKind::Flat, 800_00)
        .await;

    let mut past = booking(package.id, 1);
    past.travel_date = days_from_now(-1);
    let err = world
        .engine
        .create_booking(past, world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let mut foreign_option = booking(package.id, 1);
    foreign_option.pricing_option_id = Some(uuid::Uuid::new_v4());
    let err = world
        .engine
        .create_booking(foreign_option, world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = world
        .engine
        .create_booking(booking(package.id, 0), world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    world
        .engine
        .update_package(
            package.id,
            PackageUpdate {
                active: Some(false),
                ..PackageUpdate::default()
            },
            world.owner.id,
        )
        .await
        .unwrap();
    let err = world
        .engine
        .create_booking(booking(package.id, 2), world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn flat_option_ignores_party_size() {
    let world = world().await;
    let package = world.package("Lake Titicaca").await;
    world
        .option(&package, "Private boat", PricingKind::Flat, 999_99)
        .await;

    let created = world
        .engine
        .create_booking(booking(package.id, 5), world.traveler.id)
        .await
        .unwrap();
    assert_eq!(created.total_amount, Money::new(999_99));
    assert_eq!(created.commission_amount, Money::new(50_00));
    assert_eq!(created.company_amount, Money::new(949_99));
}

#[tokio::test]
async fn bookings_are_private_to_their_owner() {
    let world = world().await;
    let package = world.package("Machu Picchu").await;
    world
        .option(&package, "Standard", PricingKind::PerPerson, 100_00)
        .await;
    let created = world
        .engine
        .create_booking(booking(package.id, 1), world.traveler.id)
        .await
        .unwrap();

    let err = world
        .engine
        .booking(created.id, world.owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(
        world
            .engine
            .booking(created.id, world.admin.id)
            .await
            .is_ok()
    );

    let mine = world
        .engine
        .list_bookings(world.traveler.id, Page::default())
        .await
        .unwrap();
    assert_eq!(mine.total, 1);
    let theirs = world
        .engine
        .list_bookings(world.owner.id, Page::default())
        .await
        .unwrap();
    assert_eq!(theirs.total, 0);
}

#[tokio::test]
async fn cancel_and_confirm_follow_the_status_rules() {
    let world = world().await;
    let package = world.package("Colca Canyon").await;
    world
        .option(&package, "Standard", PricingKind::PerPerson, 100_00)
        .await;

    let first = world
        .engine
        .create_booking(booking(package.id, 1), world.traveler.id)
        .await
        .unwrap();
    let err = world
        .engine
        .confirm_booking(first.id, world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let confirmed = world
        .engine
        .confirm_booking(first.id, world.admin.id)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let cancelled = world
        .engine
        .cancel_booking(first.id, world.traveler.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let err = world
        .engine
        .cancel_booking(first.id, world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
    let err = world
        .engine
        .confirm_booking(first.id, world.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn booked_packages_and_options_cannot_be_deleted() {
    let world = world().await;
    let package = world.package("Nazca Lines").await;
    let option = world
        .option(&package, "Flight", PricingKind::PerPerson, 120_00)
        .await;
    world
        .engine
        .create_booking(booking(package.id, 1), world.traveler.id)
        .await
        .unwrap();

    let err = world
        .engine
        .remove_pricing_option(package.id, option.id, world.owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
    let err = world
        .engine
        .delete_package(package.id, world.owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
    let err = world
        .engine
        .delete_currency(world.usd.id, world.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn fallback_prices_the_whole_party() {
    let world = world().await;
    let package = world.package("Amazon Lodge").await;
    world
        .option(&package, "Per guest", PricingKind::PerPerson, 100_00)
        .await;
    let private = world
        .option(&package, "Private cabin", PricingKind::Flat, 150_00)
        .await;
    let duo = world
        .engine
        .add_pricing_option(
            package.id,
            PricingOptionNew {
                label: "Duo".to_string(),
                kind: PricingKind::PerPerson,
                price_minor: 50_00,
                currency_id: world.usd.id,
                valid_from: None,
                valid_to: None,
                max_participants: Some(2),
            },
            world.owner.id,
        )
        .await
        .unwrap();

    // Five travellers: the flat cabin beats 5 x 100.00 and "Duo" is too small.
    let created = world
        .engine
        .create_booking(booking(package.id, 5), world.traveler.id)
        .await
        .unwrap();
    assert_eq!(created.pricing_option_id, private.id);
    assert_eq!(created.total_amount, Money::new(150_00));

    let created = world
        .engine
        .create_booking(booking(package.id, 2), world.traveler.id)
        .await
        .unwrap();
    assert_eq!(created.pricing_option_id, duo.id);
    assert_eq!(created.total_amount, Money::new(100_00));
}
