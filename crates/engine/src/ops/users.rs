use chrono::Utc;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Page, Paginated, ResultEngine, Role, User, UserNew, UserUpdate, bookings,
    companies,
    password::{hash_password, verify_password},
    users,
    util::{normalize_email, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create an account. Emails are unique, compared lower-cased.
    pub async fn register_user(&self, cmd: UserNew) -> ResultEngine<User> {
        let email = normalize_email(&cmd.email)?;
        let name = normalize_required_name(&cmd.name, "user name")?;
        let password_hash = hash_password(&cmd.password)?;

        let user = with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(email));
            }

            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                email: ActiveValue::Set(email.clone()),
                name: ActiveValue::Set(name),
                password_hash: ActiveValue::Set(password_hash),
                role: ActiveValue::Set(cmd.role.as_str().to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            User::try_from(model)
        })?;

        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let invalid = || EngineError::Unauthorized("invalid credentials".to_string());
        let email = normalize_email(email).map_err(|_| invalid())?;

        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(password, &model.password_hash) {
            return Err(invalid());
        }
        User::try_from(model)
    }

    /// Return a user. Users can read themselves; admins can read anyone.
    pub async fn user(&self, user_id: Uuid, actor_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.require_self_or_admin(&db_tx, user_id, actor_id)
                .await?;
            let model = users::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            User::try_from(model)
        })
    }

    /// List every account, oldest first. Admin only.
    pub async fn list_users(&self, page: Page, actor_id: Uuid) -> ResultEngine<Paginated<User>> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, actor_id).await?;

            let paginator = users::Entity::find()
                .order_by_asc(users::Column::CreatedAt)
                .order_by_asc(users::Column::Email)
                .paginate(&db_tx, page.per_page);
            let total = paginator.num_items().await?;
            let items = paginator
                .fetch_page(page.index())
                .await?
                .into_iter()
                .map(User::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(Paginated {
                items,
                page: page.page,
                per_page: page.per_page,
                total,
            })
        })
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        update: UserUpdate,
        actor_id: Uuid,
    ) -> ResultEngine<User> {
        if update.name.is_none() && update.password.is_none() {
            return Err(EngineError::InvalidInput(
                "provide at least one of name or password".to_string(),
            ));
        }
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "user name"))
            .transpose()?;
        let password_hash = update.password.as_deref().map(hash_password).transpose()?;

        with_tx!(self, |db_tx| {
            self.require_self_or_admin(&db_tx, user_id, actor_id)
                .await?;
            let model = users::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let mut active: users::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(password_hash) = password_hash {
                active.password_hash = ActiveValue::Set(password_hash);
            }
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }

    /// Delete an account that has no bookings and owns no company.
    pub async fn delete_user(&self, user_id: Uuid, actor_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_self_or_admin(&db_tx, user_id, actor_id)
                .await?;
            let model = users::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let bookings = bookings::Entity::find()
                .filter(bookings::Column::UserId.eq(user_id))
                .count(&db_tx)
                .await?;
            if bookings > 0 {
                return Err(EngineError::Conflict(format!(
                    "user has {bookings} booking(s)"
                )));
            }
            let companies = companies::Entity::find()
                .filter(companies::Column::OwnerId.eq(user_id))
                .count(&db_tx)
                .await?;
            if companies > 0 {
                return Err(EngineError::Conflict(format!(
                    "user owns {companies} company record(s)"
                )));
            }

            model.delete(&db_tx).await?;
            tracing::info!(%user_id, %actor_id, "deleted user");
            Ok(())
        })
    }

    /// Change the role of an account, looked up by email.
    ///
    /// There is no HTTP route for this; the admin CLI uses it to bootstrap
    /// the first administrator.
    pub async fn set_user_role(&self, email: &str, role: Role) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let user = with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(email.clone()))?;
            let mut active: users::ActiveModel = model.into();
            active.role = ActiveValue::Set(role.as_str().to_string());
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })?;

        tracing::info!(user_id = %user.id, role = role.as_str(), "changed user role");
        Ok(user)
    }

    async fn require_self_or_admin(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        user_id: Uuid,
        actor_id: Uuid,
    ) -> ResultEngine<()> {
        self.require_user(db_tx, actor_id).await?;
        if user_id != actor_id && !self.is_admin(db_tx, actor_id).await? {
            return Err(EngineError::Forbidden(
                "cannot access another user's account".to_string(),
            ));
        }
        Ok(())
    }
}
