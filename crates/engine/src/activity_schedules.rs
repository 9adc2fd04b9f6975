//! Weekly time slots an activity runs in.

use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// A recurring weekly slot. `weekday` is 0 for Monday through 6 for Sunday.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub id: Uuid,
    pub weekday: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub activity_id: Uuid,
    pub weekday: i32,
    pub start_time: Time,
    pub end_time: Time,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activities::Entity",
        from = "Column::ActivityId",
        to = "super::activities::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Activity,
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Schedule {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            weekday: u8::try_from(model.weekday).unwrap_or_default(),
            start_time: model.start_time,
            end_time: model.end_time,
        }
    }
}
