mod common;

use engine::{EngineError, Page, Role, UserNew, UserUpdate};

use common::{PASSWORD, engine, world};

#[tokio::test]
async fn register_and_authenticate() {
    let engine = engine().await;

    let user = engine
        .register_user(UserNew::new("  Ana@Example.COM ", "Ana", PASSWORD))
        .await
        .unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.role, Role::Traveler);

    let logged = engine
        .authenticate("ana@example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(logged.id, user.id);

    let wrong_password = engine
        .authenticate("ana@example.com", "not the password")
        .await
        .unwrap_err();
    let unknown_email = engine
        .authenticate("nobody@example.com", PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(wrong_password, unknown_email);
    assert!(matches!(wrong_password, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn emails_are_unique_and_passwords_have_a_minimum_length() {
    let engine = engine().await;
    engine
        .register_user(UserNew::new("ana@example.com", "Ana", PASSWORD))
        .await
        .unwrap();

    let err = engine
        .register_user(UserNew::new("ANA@example.com", "Other Ana", PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .register_user(UserNew::new("bob@example.com", "Bob", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn users_only_see_themselves_unless_admin() {
    let world = world().await;

    let err = world
        .engine
        .user(world.owner.id, world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert!(
        world
            .engine
            .user(world.owner.id, world.admin.id)
            .await
            .is_ok()
    );

    let err = world
        .engine
        .list_users(Page::default(), world.traveler.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let all = world
        .engine
        .list_users(Page::new(Some(1), Some(2)), world.admin.id)
        .await
        .unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.items.len(), 2);
}

#[tokio::test]
async fn password_change_takes_effect() {
    let world = world().await;

    world
        .engine
        .update_user(
            world.traveler.id,
            UserUpdate {
                password: Some("a brand new secret".to_string()),
                ..UserUpdate::default()
            },
            world.traveler.id,
        )
        .await
        .unwrap();

    assert!(
        world
            .engine
            .authenticate("traveler@example.com", PASSWORD)
            .await
            .is_err()
    );
    assert!(
        world
            .engine
            .authenticate("traveler@example.com", "a brand new secret")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn company_owners_cannot_be_deleted() {
    let world = world().await;

    let err = world
        .engine
        .delete_user(world.owner.id, world.owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    world
        .engine
        .delete_user(world.traveler.id, world.traveler.id)
        .await
        .unwrap();
    let err = world
        .engine
        .authenticate("traveler@example.com", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn role_can_be_granted_by_email() {
    let world = world().await;

    let promoted = world
        .engine
        .set_user_role("Traveler@Example.com", Role::Admin)
        .await
        .unwrap();
    assert!(promoted.is_admin());
    assert!(
        world
            .engine
            .list_users(Page::default(), world.traveler.id)
            .await
            .is_ok()
    );
}
