use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum SiteConfig {
    Table,
    Id,
    SiteId,
    Key,
    Value,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MasterCategory {
    Table,
    Id,
    SiteId,
    ParentId,
    Name,
    Slug,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    SiteId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sku {
    Table,
    Id,
    SiteId,
    ProductId,
    Code,
    PriceCents,
    Stock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Ad {
    Table,
    Id,
    SiteId,
    Title,
    ImageUrl,
    LinkUrl,
    IsActive,
    StartsAt,
    EndsAt,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Inquiry {
    Table,
    Id,
    TenantId,
    DeptId,
    InquiryNo,
    Subject,
    Message,
    Status,
    ExporterId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DailySequence {
    Table,
    Id,
    TenantId,
    Prefix,
    Day,
    LastValue,
    UpdatedAt,
}

fn id_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).uuid().not_null().primary_key().to_owned()
}

fn uuid_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).uuid().not_null().to_owned()
}

fn ts_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

async fn create_site_config(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(SiteConfig::Table)
                .if_not_exists()
                .col(id_col(SiteConfig::Id))
                .col(uuid_col(SiteConfig::SiteId))
                .col(ColumnDef::new(SiteConfig::Key).string().not_null())
                .col(ColumnDef::new(SiteConfig::Value).text().not_null())
                .col(ColumnDef::new(SiteConfig::Description).string().null())
                .col(ts_col(SiteConfig::CreatedAt))
                .col(ts_col(SiteConfig::UpdatedAt))
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ux_site_config_site_key")
                .table(SiteConfig::Table)
                .col(SiteConfig::SiteId)
                .col(SiteConfig::Key)
                .unique()
                .to_owned(),
        )
        .await
}

async fn create_master_category(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(MasterCategory::Table)
                .if_not_exists()
                .col(id_col(MasterCategory::Id))
                .col(uuid_col(MasterCategory::SiteId))
                .col(ColumnDef::new(MasterCategory::ParentId).uuid().null())
                .col(ColumnDef::new(MasterCategory::Name).string().not_null())
                .col(ColumnDef::new(MasterCategory::Slug).string().not_null())
                .col(
                    ColumnDef::new(MasterCategory::SortOrder)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .col(ts_col(MasterCategory::CreatedAt))
                .col(ts_col(MasterCategory::UpdatedAt))
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ux_master_category_site_slug")
                .table(MasterCategory::Table)
                .col(MasterCategory::SiteId)
                .col(MasterCategory::Slug)
                .unique()
                .to_owned(),
        )
        .await
}

async fn create_product(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Product::Table)
                .if_not_exists()
                .col(id_col(Product::Id))
                .col(uuid_col(Product::SiteId))
                .col(ColumnDef::new(Product::Name).string().not_null())
                .col(ColumnDef::new(Product::Description).text().null())
                .col(ts_col(Product::CreatedAt))
                .col(ts_col(Product::UpdatedAt))
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ix_product_site")
                .table(Product::Table)
                .col(Product::SiteId)
                .to_owned(),
        )
        .await
}

async fn create_sku(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Sku::Table)
                .if_not_exists()
                .col(id_col(Sku::Id))
                .col(uuid_col(Sku::SiteId))
                .col(uuid_col(Sku::ProductId))
                .col(ColumnDef::new(Sku::Code).string().not_null())
                .col(ColumnDef::new(Sku::PriceCents).big_integer().not_null())
                .col(ColumnDef::new(Sku::Stock).integer().not_null().default(0))
                .col(ts_col(Sku::CreatedAt))
                .col(ts_col(Sku::UpdatedAt))
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ux_sku_site_code")
                .table(Sku::Table)
                .col(Sku::SiteId)
                .col(Sku::Code)
                .unique()
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ix_sku_product")
                .table(Sku::Table)
                .col(Sku::ProductId)
                .to_owned(),
        )
        .await
}

async fn create_ad(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Ad::Table)
                .if_not_exists()
                .col(id_col(Ad::Id))
                .col(uuid_col(Ad::SiteId))
                .col(ColumnDef::new(Ad::Title).string().not_null())
                .col(ColumnDef::new(Ad::ImageUrl).string().not_null())
                .col(ColumnDef::new(Ad::LinkUrl).string().null())
                .col(
                    ColumnDef::new(Ad::IsActive)
                        .boolean()
                        .not_null()
                        .default(true),
                )
                .col(
                    ColumnDef::new(Ad::StartsAt)
                        .timestamp_with_time_zone()
                        .null(),
                )
                .col(ColumnDef::new(Ad::EndsAt).timestamp_with_time_zone().null())
                .col(ColumnDef::new(Ad::SortOrder).integer().not_null().default(0))
                .col(ts_col(Ad::CreatedAt))
                .col(ts_col(Ad::UpdatedAt))
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ix_ad_site_sort")
                .table(Ad::Table)
                .col(Ad::SiteId)
                .col(Ad::SortOrder)
                .to_owned(),
        )
        .await
}

async fn create_inquiry(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Inquiry::Table)
                .if_not_exists()
                .col(id_col(Inquiry::Id))
                .col(uuid_col(Inquiry::TenantId))
                .col(uuid_col(Inquiry::DeptId))
                .col(ColumnDef::new(Inquiry::InquiryNo).string().not_null())
                .col(ColumnDef::new(Inquiry::Subject).string().not_null())
                .col(ColumnDef::new(Inquiry::Message).text().not_null())
                .col(ColumnDef::new(Inquiry::Status).string().not_null())
                .col(ColumnDef::new(Inquiry::ExporterId).uuid().null())
                .col(uuid_col(Inquiry::CreatedBy))
                .col(ts_col(Inquiry::CreatedAt))
                .col(ts_col(Inquiry::UpdatedAt))
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ux_inquiry_tenant_no")
                .table(Inquiry::Table)
                .col(Inquiry::TenantId)
                .col(Inquiry::InquiryNo)
                .unique()
                .to_owned(),
        )
        .await
}

async fn create_daily_sequence(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(DailySequence::Table)
                .if_not_exists()
                .col(id_col(DailySequence::Id))
                .col(uuid_col(DailySequence::TenantId))
                .col(ColumnDef::new(DailySequence::Prefix).string().not_null())
                .col(ColumnDef::new(DailySequence::Day).string().not_null())
                .col(
                    ColumnDef::new(DailySequence::LastValue)
                        .big_integer()
                        .not_null(),
                )
                .col(ts_col(DailySequence::UpdatedAt))
                .to_owned(),
        )
        .await?;
    manager
        .create_index(
            Index::create()
                .name("ux_daily_sequence_tenant_prefix_day")
                .table(DailySequence::Table)
                .col(DailySequence::TenantId)
                .col(DailySequence::Prefix)
                .col(DailySequence::Day)
                .unique()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_site_config(manager).await?;
        create_master_category(manager).await?;
        create_product(manager).await?;
        create_sku(manager).await?;
        create_ad(manager).await?;
        create_inquiry(manager).await?;
        create_daily_sequence(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailySequence::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inquiry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ad::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sku::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MasterCategory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SiteConfig::Table).to_owned())
            .await
    }
}
