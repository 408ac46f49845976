use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Case-sensitive as stored. The unique constraint is what keeps
    /// concurrent sign-ups from creating two rows.
    #[sea_orm(unique)]
    pub username: String,

    /// Argon2id PHC string.
    pub password_hash: String,

    #[sea_orm(has_many)]
    pub assets: HasMany<super::asset::Entity>,

    #[sea_orm(has_many)]
    pub sessions: HasMany<super::session::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
