//! Catalog schema: companies and what they sell.
//!
//! - `tourism_companies`: operators owned by a user
//! - `tourist_packages` and `pricing_options`
//! - `activities` with `activity_schedules` and `activity_features`
//! - `media`: images attached to a package or an activity

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
}

#[derive(Iden)]
enum Currencies {
    Table,
    Id,
}

#[derive(Iden)]
enum Languages {
    Table,
    Id,
}

#[derive(Iden)]
enum TourismCompanies {
    Table,
    Id,
    OwnerId,
    Name,
    Email,
    CityId,
    CreatedAt,
}

#[derive(Iden)]
enum TouristPackages {
    Table,
    Id,
    CompanyId,
    CityId,
    Title,
    TitleNorm,
    Description,
    DurationDays,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum PricingOptions {
    Table,
    Id,
    PackageId,
    Label,
    Kind,
    PriceMinor,
    CurrencyId,
    ValidFrom,
    ValidTo,
    MaxParticipants,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    CompanyId,
    CityId,
    CurrencyId,
    LanguageId,
    Title,
    TitleNorm,
    Description,
    PriceMinor,
    DurationMinutes,
    CreatedAt,
}

#[derive(Iden)]
enum ActivitySchedules {
    Table,
    Id,
    ActivityId,
    Weekday,
    StartTime,
    EndTime,
}

#[derive(Iden)]
enum ActivityFeatures {
    Table,
    Id,
    ActivityId,
    Name,
}

#[derive(Iden)]
enum Media {
    Table,
    Id,
    OwnerKind,
    OwnerId,
    Url,
    Position,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TourismCompanies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TourismCompanies::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TourismCompanies::OwnerId).blob().not_null())
                    .col(ColumnDef::new(TourismCompanies::Name).string().not_null())
                    .col(ColumnDef::new(TourismCompanies::Email).string().not_null())
                    .col(ColumnDef::new(TourismCompanies::CityId).blob())
                    .col(
                        ColumnDef::new(TourismCompanies::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tourism_companies-owner_id")
                            .from(TourismCompanies::Table, TourismCompanies::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tourism_companies-city_id")
                            .from(TourismCompanies::Table, TourismCompanies::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TouristPackages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TouristPackages::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TouristPackages::CompanyId).blob().not_null())
                    .col(ColumnDef::new(TouristPackages::CityId).blob().not_null())
                    .col(ColumnDef::new(TouristPackages::Title).string().not_null())
                    .col(
                        ColumnDef::new(TouristPackages::TitleNorm)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TouristPackages::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TouristPackages::DurationDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TouristPackages::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TouristPackages::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tourist_packages-company_id")
                            .from(TouristPackages::Table, TouristPackages::CompanyId)
                            .to(TourismCompanies::Table, TourismCompanies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tourist_packages-city_id")
                            .from(TouristPackages::Table, TouristPackages::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tourist_packages-city_id")
                    .table(TouristPackages::Table)
                    .col(TouristPackages::CityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricingOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingOptions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PricingOptions::PackageId).blob().not_null())
                    .col(ColumnDef::new(PricingOptions::Label).string().not_null())
                    .col(ColumnDef::new(PricingOptions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(PricingOptions::PriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingOptions::CurrencyId).blob().not_null())
                    .col(ColumnDef::new(PricingOptions::ValidFrom).date())
                    .col(ColumnDef::new(PricingOptions::ValidTo).date())
                    .col(ColumnDef::new(PricingOptions::MaxParticipants).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pricing_options-package_id")
                            .from(PricingOptions::Table, PricingOptions::PackageId)
                            .to(TouristPackages::Table, TouristPackages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pricing_options-currency_id")
                            .from(PricingOptions::Table, PricingOptions::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::CompanyId).blob().not_null())
                    .col(ColumnDef::new(Activities::CityId).blob().not_null())
                    .col(ColumnDef::new(Activities::CurrencyId).blob().not_null())
                    .col(ColumnDef::new(Activities::LanguageId).blob())
                    .col(ColumnDef::new(Activities::Title).string().not_null())
                    .col(ColumnDef::new(Activities::TitleNorm).string().not_null())
                    .col(ColumnDef::new(Activities::Description).text().not_null())
                    .col(
                        ColumnDef::new(Activities::PriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Activities::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Activities::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activities-company_id")
                            .from(Activities::Table, Activities::CompanyId)
                            .to(TourismCompanies::Table, TourismCompanies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activities-city_id")
                            .from(Activities::Table, Activities::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activities-currency_id")
                            .from(Activities::Table, Activities::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activities-language_id")
                            .from(Activities::Table, Activities::LanguageId)
                            .to(Languages::Table, Languages::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-activities-city_id")
                    .table(Activities::Table)
                    .col(Activities::CityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivitySchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivitySchedules::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivitySchedules::ActivityId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivitySchedules::Weekday)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivitySchedules::StartTime).time().not_null())
                    .col(ColumnDef::new(ActivitySchedules::EndTime).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activity_schedules-activity_id")
                            .from(ActivitySchedules::Table, ActivitySchedules::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityFeatures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityFeatures::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivityFeatures::ActivityId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityFeatures::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activity_features-activity_id")
                            .from(ActivityFeatures::Table, ActivityFeatures::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Media rows are polymorphic (package or activity), so no FK on owner_id.
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Media::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Media::OwnerKind).string().not_null())
                    .col(ColumnDef::new(Media::OwnerId).blob().not_null())
                    .col(ColumnDef::new(Media::Url).string().not_null())
                    .col(
                        ColumnDef::new(Media::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Media::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-media-owner")
                    .table(Media::Table)
                    .col(Media::OwnerKind)
                    .col(Media::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActivityFeatures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActivitySchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PricingOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TouristPackages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourismCompanies::Table).to_owned())
            .await?;
        Ok(())
    }
}
