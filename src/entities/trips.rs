use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Weak reference to a passenger. Not a foreign key; integrity is
    /// maintained by the cascade delete in the passenger repository.
    pub passenger_id: i32,

    pub origin: String,

    pub destination: String,

    pub trip_date: String,

    pub confirmed: bool,

    /// Headcount for the trip. Absent means "unspecified"; when present
    /// it is always >= 1.
    pub number_of_passengers: Option<i32>,

    /// Per-user display ordering, JSON map of email -> position.
    pub sort_order: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
