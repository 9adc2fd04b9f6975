//! Bookings table.
//!
//! A booking snapshots the price it was sold at: `unit_price_minor`,
//! `total_amount_minor` and the platform/company split are stored rather than
//! recomputed, so later pricing changes never alter past bookings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Currencies {
    Table,
    Id,
}

#[derive(Iden)]
enum TouristPackages {
    Table,
    Id,
}

#[derive(Iden)]
enum PricingOptions {
    Table,
    Id,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    UserId,
    PackageId,
    PricingOptionId,
    CurrencyId,
    Participants,
    TravelDate,
    UnitPriceMinor,
    TotalAmountMinor,
    CommissionAmountMinor,
    CompanyAmountMinor,
    Status,
    Notes,
    CreatedAt,
    CancelledAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::UserId).blob().not_null())
                    .col(ColumnDef::new(Bookings::PackageId).blob().not_null())
                    .col(ColumnDef::new(Bookings::PricingOptionId).blob().not_null())
                    .col(ColumnDef::new(Bookings::CurrencyId).blob().not_null())
                    .col(ColumnDef::new(Bookings::Participants).integer().not_null())
                    .col(ColumnDef::new(Bookings::TravelDate).date().not_null())
                    .col(
                        ColumnDef::new(Bookings::UnitPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TotalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CommissionAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CompanyAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Bookings::Notes).string())
                    .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Bookings::CancelledAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-user_id")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-package_id")
                            .from(Bookings::Table, Bookings::PackageId)
                            .to(TouristPackages::Table, TouristPackages::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-pricing_option_id")
                            .from(Bookings::Table, Bookings::PricingOptionId)
                            .to(PricingOptions::Table, PricingOptions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-currency_id")
                            .from(Bookings::Table, Bookings::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-user_id-created_at")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-package_id")
                    .table(Bookings::Table)
                    .col(Bookings::PackageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        Ok(())
    }
}
