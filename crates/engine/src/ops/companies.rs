use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Company, CompanyNew, EngineError, ResultEngine, companies,
    util::{normalize_email, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a tourism company owned by the caller.
    pub async fn create_company(&self, cmd: CompanyNew, user_id: Uuid) -> ResultEngine<Company> {
        let name = normalize_required_name(&cmd.name, "company name")?;
        let email = normalize_email(&cmd.email)?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            if let Some(city_id) = cmd.city_id {
                self.require_city(&db_tx, city_id).await?;
            }

            let model = companies::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                owner_id: ActiveValue::Set(user_id),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                city_id: ActiveValue::Set(cmd.city_id),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(company_id = %model.id, owner_id = %user_id, "created company");
            Ok(Company::from(model))
        })
    }

    pub async fn company(&self, company_id: Uuid) -> ResultEngine<Company> {
        let model = companies::Entity::find_by_id(company_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("company not exists".to_string()))?;
        Ok(Company::from(model))
    }

    /// Companies owned by the caller, oldest first.
    pub async fn list_companies(&self, user_id: Uuid) -> ResultEngine<Vec<Company>> {
        let models = companies::Entity::find()
            .filter(companies::Column::OwnerId.eq(user_id))
            .order_by_asc(companies::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Company::from).collect())
    }
}
