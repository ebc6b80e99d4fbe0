use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum BusifavorCoupons {
    Table,
    Id,
    CouponCode,
    StockId,
    Openid,
    Status,
    UsedTime,
    ExpiryTime,
    TransactionId,
    UseRequestNo,
    UseInfo,
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
                    .table(BusifavorCoupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusifavorCoupons::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::CouponCode)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    // 逻辑外键, 不加约束
                    .col(
                        ColumnDef::new(BusifavorCoupons::StockId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::Openid)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::Status)
                            .string_len(32)
                            .not_null()
                            .default("SENDED"),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::UsedTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::ExpiryTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::TransactionId)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::UseRequestNo)
                            .string_len(64)
                            .null(),
                    )
                    .col(ColumnDef::new(BusifavorCoupons::UseInfo).json().null())
                    .col(
                        ColumnDef::new(BusifavorCoupons::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BusifavorCoupons::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_busifavor_coupons_stock_id", BusifavorCoupons::StockId),
            ("idx_busifavor_coupons_openid", BusifavorCoupons::Openid),
            ("idx_busifavor_coupons_status", BusifavorCoupons::Status),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(BusifavorCoupons::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(BusifavorCoupons::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
