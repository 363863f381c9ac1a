use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "water_bills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub month: String,
    pub year: i32,
    #[sea_orm(column_type = "String(StringLen::N(10))")]
    pub status: String,
    #[sea_orm(column_type = "String(StringLen::N(50))", nullable)]
    pub payment_method: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub reference_no: Option<String>,
    pub date_paid: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
