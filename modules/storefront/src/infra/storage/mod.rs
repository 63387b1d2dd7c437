//! Persistence: `SeaORM` entities and schema migrations.

pub mod entity;
pub mod migrations;
