use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Login identifier, unique across all users.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub is_admin: bool,

    /// New accounts start unverified until an admin verifies them.
    pub is_verified: bool,

    pub home_location: Option<String>,

    /// Random API key (64-char hex string)
    pub api_key: String,

    /// One-shot password reset token, valid until `reset_token_expires`.
    pub reset_token: Option<String>,

    pub reset_token_expires: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
