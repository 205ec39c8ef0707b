//! Per-member, set-like view over the `group_memberships` relation.

use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, group_memberships};

/// Mutable collection of the named groups one member belongs to, optionally
/// restricted to a single membership type via [`as_type`].
///
/// The distinct name set is loaded once per instance and memoized until
/// [`invalidate`] is called, so repeated set predicates on the same instance
/// do not re-query. A collection instance is meant for single-threaded,
/// request-scoped use; `add`/`remove` are read-modify-write against the store
/// and the store is responsible for the atomicity of each row operation.
///
/// [`as_type`]: NamedGroupCollection::as_type
/// [`invalidate`]: NamedGroupCollection::invalidate
#[derive(Clone, Debug)]
pub struct NamedGroupCollection {
    member_id: String,
    membership_type: Option<String>,
    cache: Option<BTreeSet<String>>,
}

impl NamedGroupCollection {
    /// Unloaded, unscoped collection bound to one member.
    pub fn new(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            membership_type: None,
            cache: None,
        }
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn membership_type(&self) -> Option<&str> {
        self.membership_type.as_deref()
    }

    /// View of the same member restricted to memberships of the given type.
    ///
    /// The view starts unloaded and memoizes independently, so it can be
    /// chained with any read operation.
    pub fn as_type(&self, membership_type: &str) -> Self {
        Self {
            member_id: self.member_id.clone(),
            membership_type: Some(membership_type.to_string()),
            cache: None,
        }
    }

    /// Drops the memoized name set. Hosts call this after mutating the
    /// relation outside of this instance.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Ensures a relation row exists for `(member, group, membership_type)`.
    ///
    /// Idempotent: adding an already-present pairing is a no-op and never
    /// creates a duplicate row. `None` means an untyped membership.
    pub async fn add<C: ConnectionTrait>(
        &mut self,
        db: &C,
        group_name: &str,
        membership_type: Option<&str>,
    ) -> ResultEngine<()> {
        let group_name = normalize_group_name(group_name)?;

        if self
            .find_row(db, &group_name, membership_type)
            .await?
            .is_none()
        {
            let active = group_memberships::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                member_id: ActiveValue::Set(self.member_id.clone()),
                group_name: ActiveValue::Set(group_name.clone()),
                membership_type: ActiveValue::Set(membership_type.map(ToString::to_string)),
                created_at: ActiveValue::Set(Utc::now()),
            };
            active.insert(db).await?;
            tracing::debug!(
                member_id = %self.member_id,
                group_name = %group_name,
                membership_type,
                "named group added"
            );
        }

        if self.visible_in_scope(membership_type) {
            if let Some(cache) = self.cache.as_mut() {
                cache.insert(group_name);
            }
        }
        Ok(())
    }

    /// Adds several groups at once under the same membership type.
    pub async fn add_all<C: ConnectionTrait>(
        &mut self,
        db: &C,
        group_names: &[&str],
        membership_type: Option<&str>,
    ) -> ResultEngine<()> {
        for group_name in group_names {
            self.add(db, group_name, membership_type).await?;
        }
        Ok(())
    }

    /// Deletes relation rows for the group. `None` removes the group across
    /// all membership types; `Some(t)` removes only that pairing.
    pub async fn remove<C: ConnectionTrait>(
        &mut self,
        db: &C,
        group_name: &str,
        membership_type: Option<&str>,
    ) -> ResultEngine<()> {
        let mut delete = group_memberships::Entity::delete_many()
            .filter(group_memberships::Column::MemberId.eq(self.member_id.as_str()))
            .filter(group_memberships::Column::GroupName.eq(group_name));
        if let Some(t) = membership_type {
            delete = delete.filter(group_memberships::Column::MembershipType.eq(t));
        }
        delete.exec(db).await?;
        tracing::debug!(
            member_id = %self.member_id,
            group_name,
            membership_type,
            "named group removed"
        );

        match (membership_type, self.membership_type.as_deref()) {
            // Every row for the group is gone, no scope can still see it.
            (None, _) => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.remove(group_name);
                }
            }
            (Some(t), Some(scope)) if t == scope => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.remove(group_name);
                }
            }
            // The removed rows were never visible under this scope.
            (Some(_), Some(_)) => {}
            // Rows of other types may remain; reload on next read.
            (Some(_), None) => self.invalidate(),
        }
        Ok(())
    }

    /// True iff a relation row exists for `(member, group)`. A per-call
    /// `membership_type` wins over the view's scope; `None` falls back to it
    /// (or to "any type" on an unscoped collection).
    pub async fn contains<C: ConnectionTrait>(
        &self,
        db: &C,
        group_name: &str,
        membership_type: Option<&str>,
    ) -> ResultEngine<bool> {
        let effective = membership_type.or(self.membership_type.as_deref());
        if effective == self.membership_type.as_deref() {
            if let Some(cache) = &self.cache {
                return Ok(cache.contains(group_name));
            }
        }

        let mut query = group_memberships::Entity::find()
            .filter(group_memberships::Column::MemberId.eq(self.member_id.as_str()))
            .filter(group_memberships::Column::GroupName.eq(group_name));
        if let Some(t) = effective {
            query = query.filter(group_memberships::Column::MembershipType.eq(t));
        }
        Ok(query.one(db).await?.is_some())
    }

    /// Distinct group names under the current scope, loaded once and
    /// memoized.
    pub async fn names<C: ConnectionTrait>(&mut self, db: &C) -> ResultEngine<&BTreeSet<String>> {
        if self.cache.is_none() {
            self.cache = Some(self.load(db).await?);
        }
        Ok(self.cache.get_or_insert_default())
    }

    /// Sorted list of the distinct group names under the current scope.
    pub async fn to_vec<C: ConnectionTrait>(&mut self, db: &C) -> ResultEngine<Vec<String>> {
        Ok(self.names(db).await?.iter().cloned().collect())
    }

    /// True iff the member belongs to at least one of the given groups.
    /// An empty input has nothing to intersect with and yields `false`.
    pub async fn in_any_named_group<C: ConnectionTrait>(
        &mut self,
        db: &C,
        group_names: &[&str],
    ) -> ResultEngine<bool> {
        let names = self.names(db).await?;
        Ok(group_names.iter().any(|name| names.contains(*name)))
    }

    /// True iff the given groups are a subset of the member's set. An empty
    /// input is vacuously `true`.
    pub async fn in_all_named_groups<C: ConnectionTrait>(
        &mut self,
        db: &C,
        group_names: &[&str],
    ) -> ResultEngine<bool> {
        let names = self.names(db).await?;
        Ok(group_names.iter().all(|name| names.contains(*name)))
    }

    /// True iff the given groups equal the member's set exactly. An empty
    /// input matches only a member with no groups under the scope.
    pub async fn in_only_named_groups<C: ConnectionTrait>(
        &mut self,
        db: &C,
        group_names: &[&str],
    ) -> ResultEngine<bool> {
        let requested: BTreeSet<&str> = group_names.iter().copied().collect();
        let current: BTreeSet<&str> = self
            .names(db)
            .await?
            .iter()
            .map(String::as_str)
            .collect();
        Ok(current == requested)
    }

    /// True iff this member's and `other`'s (scoped) group sets intersect.
    pub async fn shares_any_named_group<C: ConnectionTrait>(
        &mut self,
        db: &C,
        other: &mut NamedGroupCollection,
    ) -> ResultEngine<bool> {
        let other_names = other.to_vec(db).await?;
        let other_refs: Vec<&str> = other_names.iter().map(String::as_str).collect();
        self.in_any_named_group(db, &other_refs).await
    }

    /// Row lookup with the full `(member, group, type)` identity; a `None`
    /// type matches only untyped rows, unlike [`contains`].
    ///
    /// [`contains`]: NamedGroupCollection::contains
    async fn find_row<C: ConnectionTrait>(
        &self,
        db: &C,
        group_name: &str,
        membership_type: Option<&str>,
    ) -> ResultEngine<Option<group_memberships::Model>> {
        let mut query = group_memberships::Entity::find()
            .filter(group_memberships::Column::MemberId.eq(self.member_id.as_str()))
            .filter(group_memberships::Column::GroupName.eq(group_name));
        query = match membership_type {
            Some(t) => query.filter(group_memberships::Column::MembershipType.eq(t)),
            None => query.filter(group_memberships::Column::MembershipType.is_null()),
        };
        query.one(db).await.map_err(Into::into)
    }

    async fn load<C: ConnectionTrait>(&self, db: &C) -> ResultEngine<BTreeSet<String>> {
        let mut query = group_memberships::Entity::find()
            .filter(group_memberships::Column::MemberId.eq(self.member_id.as_str()));
        if let Some(t) = &self.membership_type {
            query = query.filter(group_memberships::Column::MembershipType.eq(t.as_str()));
        }
        let rows = query.all(db).await?;
        Ok(rows.into_iter().map(|row| row.group_name).collect())
    }

    fn visible_in_scope(&self, membership_type: Option<&str>) -> bool {
        match self.membership_type.as_deref() {
            None => true,
            Some(scope) => membership_type == Some(scope),
        }
    }
}

fn normalize_group_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(
            "group name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
