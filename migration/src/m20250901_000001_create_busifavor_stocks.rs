use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum BusifavorStocks {
    Table,
    Id,
    StockId,
    StockName,
    Description,
    AvailableBeginTime,
    AvailableEndTime,
    StockUseRule,
    CouponUseRule,
    CustomEntrance,
    DisplayPatternInfo,
    NotifyConfig,
    Status,
    MaxCoupons,
    MaxCouponsPerUser,
    MaxAmount,
    MaxAmountByDay,
    RemainAmount,
    DistributedCoupons,
    NoLimit,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusifavorStocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusifavorStocks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // 微信侧分配的批次号
                    .col(
                        ColumnDef::new(BusifavorStocks::StockId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::StockName)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::Description)
                            .string_len(128)
                            .null(),
                    )
                    .col(ColumnDef::new(BusifavorStocks::AvailableBeginTime).json().not_null())
                    .col(ColumnDef::new(BusifavorStocks::AvailableEndTime).json().not_null())
                    .col(ColumnDef::new(BusifavorStocks::StockUseRule).json().not_null())
                    .col(ColumnDef::new(BusifavorStocks::CouponUseRule).json().not_null())
                    .col(ColumnDef::new(BusifavorStocks::CustomEntrance).json().not_null())
                    .col(ColumnDef::new(BusifavorStocks::DisplayPatternInfo).json().not_null())
                    .col(ColumnDef::new(BusifavorStocks::NotifyConfig).json().null())
                    .col(
                        ColumnDef::new(BusifavorStocks::Status)
                            .string_len(32)
                            .not_null()
                            .default("UNAUDIT"),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::MaxCoupons)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::MaxCouponsPerUser)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    // 金额单位: 分
                    .col(
                        ColumnDef::new(BusifavorStocks::MaxAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::MaxAmountByDay)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::RemainAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::DistributedCoupons)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::NoLimit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorStocks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_busifavor_stocks_status")
                    .table(BusifavorStocks::Table)
                    .col(BusifavorStocks::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(BusifavorStocks::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
