//! Database migrations for the company service

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::prelude::Uuid;

/// Fixed identifiers of the seeded roles
pub const MANAGER_ROLE_ID: Uuid = Uuid::from_u128(0x3b9a_c1f0_6d5e_4c7b_9a41_2f0e_8d13_a601);
pub const ADMINISTRATOR_ROLE_ID: Uuid = Uuid::from_u128(0x7c24_e8b9_15a3_4f60_b2d8_90c5_4e7f_1b02);

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_companies::Migration),
            Box::new(m20250301_000002_create_employees::Migration),
            Box::new(m20250301_000003_create_identity::Migration),
            Box::new(m20250301_000004_seed_roles::Migration),
        ]
    }
}

mod m20250301_000001_create_companies {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_companies"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Companies::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Companies::Name).string_len(60).not_null())
                        .col(ColumnDef::new(Companies::Address).string_len(60).not_null())
                        .col(ColumnDef::new(Companies::Country).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Companies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
        Name,
        Address,
        Country,
    }
}

mod m20250301_000002_create_employees {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_employees"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Employees::Name).string_len(30).not_null())
                        .col(ColumnDef::new(Employees::Age).integer().not_null())
                        .col(ColumnDef::new(Employees::Position).string_len(20).not_null())
                        .col(ColumnDef::new(Employees::CompanyId).uuid().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employees_company")
                                .from(Employees::Table, Employees::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_employees_company_id")
                        .table(Employees::Table)
                        .col(Employees::CompanyId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        Id,
        Name,
        Age,
        Position,
        CompanyId,
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
    }
}

mod m20250301_000003_create_identity {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_identity"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Users::FirstName).string())
                        .col(ColumnDef::new(Users::LastName).string())
                        .col(ColumnDef::new(Users::UserName).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Email).string().unique_key())
                        .col(ColumnDef::new(Users::PhoneNumber).string())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::RefreshToken).string())
                        .col(ColumnDef::new(Users::RefreshTokenExpiry).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Roles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Roles::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Roles::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Roles::NormalizedName).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(UserRoles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(UserRoles::UserId).uuid().not_null())
                        .col(ColumnDef::new(UserRoles::RoleId).uuid().not_null())
                        .primary_key(
                            Index::create()
                                .col(UserRoles::UserId)
                                .col(UserRoles::RoleId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_roles_user")
                                .from(UserRoles::Table, UserRoles::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_roles_role")
                                .from(UserRoles::Table, UserRoles::RoleId)
                                .to(Roles::Table, Roles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UserRoles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Roles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        FirstName,
        LastName,
        UserName,
        Email,
        PhoneNumber,
        PasswordHash,
        RefreshToken,
        RefreshTokenExpiry,
    }

    #[derive(DeriveIden)]
    enum Roles {
        Table,
        Id,
        Name,
        NormalizedName,
    }

    #[derive(DeriveIden)]
    enum UserRoles {
        Table,
        UserId,
        RoleId,
    }
}

/// Inserts the Manager and Administrator roles
mod m20250301_000004_seed_roles {
    use super::*;
    use crate::contract::{ROLE_ADMINISTRATOR, ROLE_MANAGER};

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_seed_roles"
        }
    }

    fn seeded() -> [(Uuid, &'static str); 2] {
        [
            (MANAGER_ROLE_ID, ROLE_MANAGER),
            (ADMINISTRATOR_ROLE_ID, ROLE_ADMINISTRATOR),
        ]
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut insert = Query::insert();
            insert
                .into_table(Roles::Table)
                .columns([Roles::Id, Roles::Name, Roles::NormalizedName]);

            for (id, name) in seeded() {
                insert
                    .values([id.into(), name.into(), name.to_uppercase().into()])
                    .map_err(|err| DbErr::Migration(err.to_string()))?;
            }

            manager.exec_stmt(insert).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let ids: Vec<Uuid> = seeded().iter().map(|(id, _)| *id).collect();
            let delete = Query::delete()
                .from_table(Roles::Table)
                .and_where(Expr::col(Roles::Id).is_in(ids))
                .to_owned();

            manager.exec_stmt(delete).await
        }
    }

    #[derive(DeriveIden)]
    enum Roles {
        Table,
        Id,
        Name,
        NormalizedName,
    }
}
