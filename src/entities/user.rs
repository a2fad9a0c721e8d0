//! User entity - The read-mostly directory of people who can share finances.
//!
//! User ids are the Discord snowflake ids of the people using the bot, stored as text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Discord user ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name shown next to shares and members
    pub name: String,
    /// Contact email, used to invite the user to a budget diary
    #[sea_orm(unique)]
    pub email: String,
}

/// Users are referenced by id only; no foreign keys point here
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
