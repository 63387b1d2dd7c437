#![allow(dead_code)]

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, NotSet, Set};
use sea_orm_migration::prelude as mig;
use storefront_db::crud::CrudEntity;
use storefront_db::migration_runner::run_migrations_for_testing;
use storefront_db::secure::{Db, RequestContext};
use storefront_db::{ConnectOpts, connect_db};

pub mod note {
    use sea_orm::entity::prelude::*;
    use storefront_db::secure::Scopable;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
    #[sea_orm(table_name = "note")]
    #[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub site_id: Uuid,
        pub title: String,
        pub body: String,
        pub created_at: TimeDateTimeWithTimeZone,
        pub updated_at: TimeDateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub struct NewNote {
    pub title: String,
    pub body: String,
    /// Lets tests try to smuggle a foreign site into the insert.
    pub site_id: Option<Uuid>,
}

impl NewNote {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            body: format!("body of {title}"),
            site_id: None,
        }
    }
}

#[derive(Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub site_id: Option<Uuid>,
}

fn opt<V: Into<sea_orm::Value>>(v: Option<V>) -> ActiveValue<V> {
    v.map_or(NotSet, Set)
}

impl CrudEntity for note::Entity {
    const NAME: &'static str = "note";
    type Create = NewNote;
    type Patch = NotePatch;

    fn search_col() -> Option<note::Column> {
        Some(note::Column::Title)
    }

    fn created_at_col() -> Option<note::Column> {
        Some(note::Column::CreatedAt)
    }

    fn updated_at_col() -> Option<note::Column> {
        Some(note::Column::UpdatedAt)
    }

    fn new_active_model(input: NewNote) -> note::ActiveModel {
        note::ActiveModel {
            title: Set(input.title),
            body: Set(input.body),
            site_id: opt(input.site_id),
            ..Default::default()
        }
    }

    fn patch_active_model(patch: NotePatch) -> note::ActiveModel {
        note::ActiveModel {
            title: opt(patch.title),
            body: opt(patch.body),
            site_id: opt(patch.site_id),
            ..Default::default()
        }
    }
}

struct CreateNote;

impl mig::MigrationName for CreateNote {
    fn name(&self) -> &'static str {
        "m001_create_note"
    }
}

#[async_trait::async_trait]
impl mig::MigrationTrait for CreateNote {
    async fn up(&self, manager: &mig::SchemaManager) -> Result<(), mig::DbErr> {
        manager
            .create_table(
                mig::Table::create()
                    .table(mig::Alias::new("note"))
                    .if_not_exists()
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("id"))
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("site_id"))
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("title"))
                            .string()
                            .not_null(),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("body"))
                            .string()
                            .not_null(),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        mig::ColumnDef::new(mig::Alias::new("updated_at"))
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &mig::SchemaManager) -> Result<(), mig::DbErr> {
        manager
            .drop_table(mig::Table::drop().table(mig::Alias::new("note")).to_owned())
            .await
    }
}

/// Fresh shared-cache in-memory database named `name`, with the note table.
pub async fn setup(name: &str) -> Db {
    let opts = ConnectOpts {
        max_conns: Some(1),
        min_conns: Some(1),
        ..Default::default()
    };
    let db = connect_db(&format!("sqlite:file:{name}?mode=memory&cache=shared"), opts)
        .await
        .expect("Failed to connect to database");
    run_migrations_for_testing(&db, vec![Box::new(CreateNote)])
        .await
        .expect("migrate");
    db
}

pub fn site_ctx(site: Uuid) -> RequestContext {
    RequestContext::builder()
        .user_id(Uuid::new_v4())
        .site_id(site)
        .build()
}
