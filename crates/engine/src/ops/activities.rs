//! Activities with their nested schedules and features.
//!
//! Schedules and features never exist on their own: they are written in the
//! same transaction as the activity and replaced wholesale on update.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Activity, ActivityFilter, ActivityNew, ActivityUpdate, EngineError, Feature, MediaOwner, Page,
    Paginated, ResultEngine, Schedule, ScheduleNew, activities, activity_features,
    activity_schedules, media,
    util::{normalize_optional_text, normalize_required_name, search_key},
};

use super::{
    Engine,
    media::{delete_media_of, media_by_owner},
    with_tx,
};

fn check_price(price_minor: i64) -> ResultEngine<()> {
    if price_minor <= 0 {
        return Err(EngineError::InvalidInput(
            "price must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn check_duration_minutes(duration_minutes: u32) -> ResultEngine<i32> {
    if duration_minutes == 0 {
        return Err(EngineError::InvalidInput(
            "duration_minutes must be at least 1".to_string(),
        ));
    }
    i32::try_from(duration_minutes)
        .map_err(|_| EngineError::InvalidInput("duration_minutes is too large".to_string()))
}

fn check_schedules(schedules: &[ScheduleNew]) -> ResultEngine<()> {
    for schedule in schedules {
        if schedule.weekday > 6 {
            return Err(EngineError::InvalidInput(format!(
                "weekday must be between 0 (Monday) and 6 (Sunday), got {}",
                schedule.weekday
            )));
        }
        if schedule.start_time >= schedule.end_time {
            return Err(EngineError::InvalidInput(format!(
                "schedule must start before it ends ({} >= {})",
                schedule.start_time, schedule.end_time
            )));
        }
    }
    Ok(())
}

/// Trim feature names, drop blanks and keep the first of each duplicate
/// (compared case-insensitively).
fn normalize_features(features: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    features
        .iter()
        .filter_map(|feature| normalize_optional_text(Some(feature.as_str())))
        .filter(|feature| seen.insert(feature.to_lowercase()))
        .collect()
}

async fn insert_children(
    db_tx: &DatabaseTransaction,
    activity_id: Uuid,
    schedules: Option<&[ScheduleNew]>,
    features: Option<&[String]>,
) -> ResultEngine<()> {
    if let Some(schedules) = schedules {
        for schedule in schedules {
            activity_schedules::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                activity_id: ActiveValue::Set(activity_id),
                weekday: ActiveValue::Set(i32::from(schedule.weekday)),
                start_time: ActiveValue::Set(schedule.start_time),
                end_time: ActiveValue::Set(schedule.end_time),
            }
            .insert(db_tx)
            .await?;
        }
    }
    if let Some(features) = features {
        for name in features {
            activity_features::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                activity_id: ActiveValue::Set(activity_id),
                name: ActiveValue::Set(name.clone()),
            }
            .insert(db_tx)
            .await?;
        }
    }
    Ok(())
}

/// Attach schedules, features and media to freshly loaded activities.
async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    models: Vec<activities::Model>,
) -> ResultEngine<Vec<Activity>> {
    let ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();
    let mut schedules: HashMap<Uuid, Vec<Schedule>> = HashMap::new();
    let mut features: HashMap<Uuid, Vec<Feature>> = HashMap::new();

    if !ids.is_empty() {
        let schedule_models = activity_schedules::Entity::find()
            .filter(activity_schedules::Column::ActivityId.is_in(ids.iter().copied()))
            .order_by_asc(activity_schedules::Column::Weekday)
            .order_by_asc(activity_schedules::Column::StartTime)
            .all(conn)
            .await?;
        for model in schedule_models {
            schedules
                .entry(model.activity_id)
                .or_default()
                .push(Schedule::from(model));
        }

        let feature_models = activity_features::Entity::find()
            .filter(activity_features::Column::ActivityId.is_in(ids.iter().copied()))
            .order_by_asc(activity_features::Column::Name)
            .all(conn)
            .await?;
        for model in feature_models {
            features
                .entry(model.activity_id)
                .or_default()
                .push(Feature::from(model));
        }
    }
    let mut images = media_by_owner(conn, media::ACTIVITY_KIND, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut activity = Activity::from(model);
            activity.schedules = schedules.remove(&id).unwrap_or_default();
            activity.features = features.remove(&id).unwrap_or_default();
            activity.media = images.remove(&id).unwrap_or_default();
            activity
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(
    conn: &C,
    model: activities::Model,
) -> ResultEngine<Activity> {
    hydrate(conn, vec![model])
        .await?
        .pop()
        .ok_or_else(|| EngineError::KeyNotFound("activity not exists".to_string()))
}

impl Engine {
    /// Create an activity together with its schedules and features.
    pub async fn create_activity(
        &self,
        cmd: ActivityNew,
        user_id: Uuid,
    ) -> ResultEngine<Activity> {
        let title = normalize_required_name(&cmd.title, "activity title")?;
        let description =
            normalize_optional_text(Some(cmd.description.as_str())).unwrap_or_default();
        check_price(cmd.price_minor)?;
        let duration_minutes = check_duration_minutes(cmd.duration_minutes)?;
        check_schedules(&cmd.schedules)?;
        let features = normalize_features(&cmd.features);

        with_tx!(self, |db_tx| {
            self.require_company_write(&db_tx, cmd.company_id, user_id)
                .await?;
            self.require_city(&db_tx, cmd.city_id).await?;
            self.require_currency(&db_tx, cmd.currency_id).await?;
            if let Some(language_id) = cmd.language_id {
                self.require_language(&db_tx, language_id).await?;
            }

            let model = activities::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                company_id: ActiveValue::Set(cmd.company_id),
                city_id: ActiveValue::Set(cmd.city_id),
                currency_id: ActiveValue::Set(cmd.currency_id),
                language_id: ActiveValue::Set(cmd.language_id),
                title_norm: ActiveValue::Set(search_key(&title)),
                title: ActiveValue::Set(title),
                description: ActiveValue::Set(description),
                price_minor: ActiveValue::Set(cmd.price_minor),
                duration_minutes: ActiveValue::Set(duration_minutes),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            insert_children(
                &db_tx,
                model.id,
                Some(cmd.schedules.as_slice()),
                Some(features.as_slice()),
            )
            .await?;

            tracing::info!(
                activity_id = %model.id,
                schedules = cmd.schedules.len(),
                features = features.len(),
                "created activity"
            );
            hydrate_one(&db_tx, model).await
        })
    }

    pub async fn activity(&self, activity_id: Uuid) -> ResultEngine<Activity> {
        let model = activities::Entity::find_by_id(activity_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("activity not exists".to_string()))?;
        hydrate_one(&self.database, model).await
    }

    /// Newest activities first.
    pub async fn list_activities(
        &self,
        filter: ActivityFilter,
        page: Page,
    ) -> ResultEngine<Paginated<Activity>> {
        let mut query = activities::Entity::find();
        if let Some(city_id) = filter.city_id {
            query = query.filter(activities::Column::CityId.eq(city_id));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(activities::Column::CompanyId.eq(company_id));
        }
        if let Some(search) = filter.search.as_deref().map(search_key)
            && !search.is_empty()
        {
            query = query.filter(activities::Column::TitleNorm.contains(search));
        }

        let paginator = query
            .order_by_desc(activities::Column::CreatedAt)
            .order_by_asc(activities::Column::Id)
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

    /// Update an activity. Provided schedule or feature lists replace the
    /// stored ones; omitted lists are left untouched.
    pub async fn update_activity(
        &self,
        activity_id: Uuid,
        update: ActivityUpdate,
        user_id: Uuid,
    ) -> ResultEngine<Activity> {
        let title = update
            .title
            .as_deref()
            .map(|title| normalize_required_name(title, "activity title"))
            .transpose()?;
        if let Some(price_minor) = update.price_minor {
            check_price(price_minor)?;
        }
        let duration_minutes = update
            .duration_minutes
            .map(check_duration_minutes)
            .transpose()?;
        if let Some(schedules) = &update.schedules {
            check_schedules(schedules)?;
        }
        let features = update.features.as_deref().map(normalize_features);

        with_tx!(self, |db_tx| {
            let model = self
                .require_activity_write(&db_tx, activity_id, user_id)
                .await?;
            if let Some(language_id) = update.language_id {
                self.require_language(&db_tx, language_id).await?;
            }

            let mut active: activities::ActiveModel = model.into();
            if let Some(title) = title {
                active.title_norm = ActiveValue::Set(search_key(&title));
                active.title = ActiveValue::Set(title);
            }
            if let Some(description) = update.description.as_deref() {
                let description = normalize_optional_text(Some(description)).unwrap_or_default();
                active.description = ActiveValue::Set(description);
            }
            if let Some(price_minor) = update.price_minor {
                active.price_minor = ActiveValue::Set(price_minor);
            }
            if let Some(duration_minutes) = duration_minutes {
                active.duration_minutes = ActiveValue::Set(duration_minutes);
            }
            if update.language_id.is_some() {
                active.language_id = ActiveValue::Set(update.language_id);
            }
            let model = active.update(&db_tx).await?;

            if update.schedules.is_some() {
                activity_schedules::Entity::delete_many()
                    .filter(activity_schedules::Column::ActivityId.eq(activity_id))
                    .exec(&db_tx)
                    .await?;
            }
            if features.is_some() {
                activity_features::Entity::delete_many()
                    .filter(activity_features::Column::ActivityId.eq(activity_id))
                    .exec(&db_tx)
                    .await?;
            }
            insert_children(
                &db_tx,
                activity_id,
                update.schedules.as_deref(),
                features.as_deref(),
            )
            .await?;

            hydrate_one(&db_tx, model).await
        })
    }

    /// Delete an activity with its schedules, features and media.
    pub async fn delete_activity(&self, activity_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_activity_write(&db_tx, activity_id, user_id)
                .await?;

            activity_schedules::Entity::delete_many()
                .filter(activity_schedules::Column::ActivityId.eq(activity_id))
                .exec(&db_tx)
                .await?;
            activity_features::Entity::delete_many()
                .filter(activity_features::Column::ActivityId.eq(activity_id))
                .exec(&db_tx)
                .await?;
            delete_media_of(&db_tx, MediaOwner::Activity(activity_id)).await?;
            model.delete(&db_tx).await?;
            tracing::info!(%activity_id, %user_id, "deleted activity");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn slot(weekday: u8, start: (u32, u32), end: (u32, u32)) -> ScheduleNew {
        ScheduleNew {
            weekday,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn schedules_are_checked() {
        assert!(check_schedules(&[slot(0, (9, 0), (12, 0)), slot(6, (18, 30), (20, 0))]).is_ok());
        assert!(check_schedules(&[slot(7, (9, 0), (12, 0))]).is_err());
        assert!(check_schedules(&[slot(2, (12, 0), (12, 0))]).is_err());
        assert!(check_schedules(&[slot(2, (14, 0), (9, 0))]).is_err());
    }

    #[test]
    fn features_are_trimmed_and_deduplicated() {
        let features = vec![
            " Hotel pickup ".to_string(),
            String::new(),
            "hotel PICKUP".to_string(),
            "Lunch".to_string(),
        ];
        assert_eq!(
            normalize_features(&features),
            vec!["Hotel pickup".to_string(), "Lunch".to_string()]
        );
    }

    #[test]
    fn price_and_duration_must_be_positive() {
        assert!(check_price(0).is_err());
        assert!(check_price(-5).is_err());
        assert!(check_price(1).is_ok());
        assert!(check_duration_minutes(0).is_err());
        assert_eq!(check_duration_minutes(90).unwrap(), 90);
    }
}
