use sea_orm_migration::prelude::*;

use crate::m20260810_090000_members::Members;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum GroupMemberships {
    Table,
    Id,
    MemberId,
    GroupName,
    MembershipType,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupMemberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupMemberships::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupMemberships::MemberId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupMemberships::GroupName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GroupMemberships::MembershipType).string())
                    .col(
                        ColumnDef::new(GroupMemberships::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-group_memberships-member_id")
                            .from(GroupMemberships::Table, GroupMemberships::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-group_memberships-member_id")
                    .table(GroupMemberships::Table)
                    .col(GroupMemberships::MemberId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-group_memberships-group_name")
                    .table(GroupMemberships::Table)
                    .col(GroupMemberships::GroupName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GroupMemberships::Table).to_owned())
            .await
    }
}
