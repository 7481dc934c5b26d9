//! Post interaction entity for SeaORM.
//!
//! The composite primary key `(post_id, user_id)` is what makes the upsert
//! atomic: concurrent writers for the same pair collide on it.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::{Interaction, Reaction};

/// Stored reaction. A NULL column means no reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ReactionKind {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "dislike")]
    Dislike,
}

impl ReactionKind {
    pub fn from_reaction(reaction: Reaction) -> Option<Self> {
        match reaction {
            Reaction::None => None,
            Reaction::Like => Some(ReactionKind::Like),
            Reaction::Dislike => Some(ReactionKind::Dislike),
        }
    }

    pub fn into_reaction(kind: Option<Self>) -> Reaction {
        match kind {
            None => Reaction::None,
            Some(ReactionKind::Like) => Reaction::Like,
            Some(ReactionKind::Dislike) => Reaction::Dislike,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_interactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub reaction: Option<ReactionKind>,
    pub viewed: bool,
    pub interacted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Interaction {
    fn from(model: Model) -> Self {
        Self {
            post_id: model.post_id,
            user_id: model.user_id,
            reaction: ReactionKind::into_reaction(model.reaction),
            viewed: model.viewed,
            interacted_at: model.interacted_at.into(),
        }
    }
}

impl From<&Interaction> for ActiveModel {
    fn from(interaction: &Interaction) -> Self {
        Self {
            post_id: Set(interaction.post_id),
            user_id: Set(interaction.user_id),
            reaction: Set(ReactionKind::from_reaction(interaction.reaction)),
            viewed: Set(interaction.viewed),
            interacted_at: Set(interaction.interacted_at.into()),
        }
    }
}
