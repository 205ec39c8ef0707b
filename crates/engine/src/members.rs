//! Members table (minimal entity).
//!
//! The engine stores memberships by `member_id`. Any entity joined to
//! `group_memberships` the same way can implement [`NamedGroupQueries`];
//! this one ships as the default host.

use sea_orm::entity::prelude::*;

use crate::{NamedGroupCollection, NamedGroupQueries};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::group_memberships::Entity> for Entity {
    fn to() -> RelationDef {
        super::group_memberships::Relation::Members.def().rev()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl NamedGroupQueries for Entity {
    fn identity_column() -> Self::Column {
        Column::Id
    }
}

impl Model {
    /// Fresh collection bound to this member. Hosts should keep the returned
    /// value around: it memoizes the loaded name set until invalidated.
    pub fn named_groups(&self) -> NamedGroupCollection {
        NamedGroupCollection::new(self.id.clone())
    }
}
