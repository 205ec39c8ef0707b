//! Class-level set predicates over named groups.
//!
//! These translate into joins plus grouped `COUNT(DISTINCT ...)` comparisons
//! (relational division) so "all"/"only" checks run inside the database
//! instead of loading relation rows into memory. Every predicate returns a
//! composable [`Select`] the caller can filter, order, or paginate further,
//! and every predicate is duplicate-free on member rows.

use std::collections::BTreeSet;

use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, Related, Select,
    sea_query::{Expr, Func},
};

use crate::group_memberships;

/// Bulk named-group predicates for a member-like entity.
///
/// Implementors only provide the join to `group_memberships` (the
/// [`Related`] bound) and the identity column the aggregates group by.
pub trait NamedGroupQueries: EntityTrait + Related<group_memberships::Entity> {
    /// Member identity column for `GROUP BY`, usually the primary key.
    fn identity_column() -> Self::Column;

    /// Members having at least one membership of the given type.
    fn with_membership_type(membership_type: &str) -> Select<Self> {
        Self::find()
            .join(JoinType::InnerJoin, <Self as Related<group_memberships::Entity>>::to())
            .filter(group_memberships::Column::MembershipType.eq(membership_type))
            .distinct()
    }

    /// Members belonging to the named group. A blank name matches nothing
    /// rather than widening into a full-table match.
    fn in_named_group(group_name: &str) -> Select<Self> {
        if group_name.trim().is_empty() {
            return none::<Self>();
        }
        Self::find()
            .join(JoinType::InnerJoin, <Self as Related<group_memberships::Entity>>::to())
            .filter(group_memberships::Column::GroupName.eq(group_name))
            .distinct()
    }

    /// Members belonging to at least one of the given groups. An empty input
    /// matches nothing.
    fn in_any_named_group(group_names: &[&str]) -> Select<Self> {
        let names = dedup(group_names);
        if names.is_empty() {
            return none::<Self>();
        }
        Self::find()
            .join(JoinType::InnerJoin, <Self as Related<group_memberships::Entity>>::to())
            .filter(group_memberships::Column::GroupName.is_in(names))
            .distinct()
    }

    /// Members belonging to every one of the given groups.
    ///
    /// Relational division: the join is restricted to the requested names and
    /// a member qualifies when the distinct names it is linked to cover the
    /// whole request. Groups outside the request do not disqualify. An empty
    /// input matches nothing.
    fn in_all_named_groups(group_names: &[&str]) -> Select<Self> {
        let names = dedup(group_names);
        if names.is_empty() {
            return none::<Self>();
        }
        let expected = names.len() as i64;
        Self::find()
            .join(JoinType::InnerJoin, <Self as Related<group_memberships::Entity>>::to())
            .filter(group_memberships::Column::GroupName.is_in(names))
            .group_by(Self::identity_column())
            .having(count_distinct_group_names().eq(expected))
    }

    /// Members whose group set equals the given set exactly.
    ///
    /// The join covers all of the member's rows and two aggregates are
    /// compared: the member's total distinct group count must match the
    /// request, and so must the distinct count of groups inside the request.
    /// A bare count match would also accept members with the same number of
    /// unrelated groups. An empty input matches nothing.
    fn in_only_named_groups(group_names: &[&str]) -> Select<Self> {
        let names = dedup(group_names);
        if names.is_empty() {
            return none::<Self>();
        }
        let expected = names.len() as i64;
        let requested_only = Func::count_distinct(Expr::case(
            group_memberships::Column::GroupName.is_in(names),
            Expr::col((
                group_memberships::Entity,
                group_memberships::Column::GroupName,
            )),
        ));
        Self::find()
            .join(JoinType::InnerJoin, <Self as Related<group_memberships::Entity>>::to())
            .group_by(Self::identity_column())
            .having(count_distinct_group_names().eq(expected))
            .having(Expr::expr(requested_only).eq(expected))
    }

    /// Members sharing at least one named group with the given set, taken
    /// from another member's current groups.
    fn shares_any_named_group(other_group_names: &[&str]) -> Select<Self> {
        Self::in_any_named_group(other_group_names)
    }
}

/// Requested names follow set semantics; duplicates would skew the aggregate
/// count comparisons.
fn dedup(group_names: &[&str]) -> Vec<String> {
    let set: BTreeSet<&str> = group_names.iter().copied().collect();
    set.into_iter().map(ToString::to_string).collect()
}

/// A query matching no rows.
fn none<E: EntityTrait>() -> Select<E> {
    E::find().filter(Expr::val(1).eq(2))
}

fn count_distinct_group_names() -> Expr {
    Expr::expr(Func::count_distinct(Expr::col((
        group_memberships::Entity,
        group_memberships::Column::GroupName,
    ))))
}
