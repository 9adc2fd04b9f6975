//! Existence and authorization checks shared by the services.
//!
//! Every helper runs on the caller's transaction so the check and the write
//! that follows see the same snapshot.

use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Role, activities, cities, companies, currencies, languages,
    packages, users,
};

use super::Engine;

impl Engine {
    /// Load the calling user. A token for a deleted account is unauthorized.
    pub(super) async fn require_user(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::Unauthorized("unknown user".to_string()))
    }

    pub(super) async fn is_admin(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<bool> {
        let user = self.require_user(db_tx, user_id).await?;
        Ok(user.role == Role::Admin.as_str())
    }

    pub(super) async fn require_admin(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        let user = self.require_user(db_tx, user_id).await?;
        if user.role != Role::Admin.as_str() {
            return Err(EngineError::Forbidden(
                "administrator role required".to_string(),
            ));
        }
        Ok(user)
    }

    /// Load a company the caller may manage (its owner, or an admin).
    pub(super) async fn require_company_write(
        &self,
        db_tx: &DatabaseTransaction,
        company_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<companies::Model> {
        let company = companies::Entity::find_by_id(company_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("company not exists".to_string()))?;
        if company.owner_id != user_id && !self.is_admin(db_tx, user_id).await? {
            return Err(EngineError::Forbidden(
                "company is managed by another user".to_string(),
            ));
        }
        Ok(company)
    }

    pub(super) async fn require_package(
        &self,
        db_tx: &DatabaseTransaction,
        package_id: Uuid,
    ) -> ResultEngine<packages::Model> {
        packages::Entity::find_by_id(package_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("package not exists".to_string()))
    }

    /// Load a package whose company the caller may manage.
    pub(super) async fn require_package_write(
        &self,
        db_tx: &DatabaseTransaction,
        package_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<packages::Model> {
        let package = self.require_package(db_tx, package_id).await?;
        self.require_company_write(db_tx, package.company_id, user_id)
            .await?;
        Ok(package)
    }

    pub(super) async fn require_activity(
        &self,
        db_tx: &DatabaseTransaction,
        activity_id: Uuid,
    ) -> ResultEngine<activities::Model> {
        activities::Entity::find_by_id(activity_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("activity not exists".to_string()))
    }

    pub(super) async fn require_activity_write(
        &self,
        db_tx: &DatabaseTransaction,
        activity_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<activities::Model> {
        let activity = self.require_activity(db_tx, activity_id).await?;
        self.require_company_write(db_tx, activity.company_id, user_id)
            .await?;
        Ok(activity)
    }

    pub(super) async fn require_city(
        &self,
        db_tx: &DatabaseTransaction,
        city_id: Uuid,
    ) -> ResultEngine<cities::Model> {
        cities::Entity::find_by_id(city_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("city not exists".to_string()))
    }

    pub(super) async fn require_currency(
        &self,
        db_tx: &DatabaseTransaction,
        currency_id: Uuid,
    ) -> ResultEngine<currencies::Model> {
        currencies::Entity::find_by_id(currency_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("currency not exists".to_string()))
    }

    pub(super) async fn require_language(
        &self,
        db_tx: &DatabaseTransaction,
        language_id: Uuid,
    ) -> ResultEngine<languages::Model> {
        languages::Entity::find_by_id(language_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("language not exists".to_string()))
    }
}
