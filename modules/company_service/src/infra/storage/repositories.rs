//! SeaORM repository implementations

use crate::contract::{Company, Employee, User};
use crate::domain::paging::{EmployeeParameters, PagedList, SortField};
use crate::domain::repository::{CompanyRepository, EmployeeRepository, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::{
    prelude::Expr, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{company, employee, role, user, user_role};

/// `%term%` with LIKE wildcards in the term matched literally
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// ===== Company Repository =====

pub struct SeaOrmCompanyRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

async fn insert_employees<C: ConnectionTrait>(conn: &C, employees: &[Employee]) -> Result<()> {
    // insert_many rejects an empty batch
    if employees.is_empty() {
        return Ok(());
    }
    let models: Vec<employee::ActiveModel> = employees.iter().map(Into::into).collect();
    employee::Entity::insert_many(models).exec(conn).await?;
    Ok(())
}

#[async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn find_all(&self) -> Result<Vec<Company>> {
        let results = company::Entity::find()
            .order_by_asc(company::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        let result = company::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let results = company::Entity::find()
            .filter(company::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn create(&self, company: &Company, employees: &[Employee]) -> Result<()> {
        let txn = self.db.begin().await?;

        let active: company::ActiveModel = company.into();
        company::Entity::insert(active).exec(&txn).await?;
        insert_employees(&txn, employees).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn create_many(&self, companies: &[(Company, Vec<Employee>)]) -> Result<()> {
        let txn = self.db.begin().await?;

        for (company, employees) in companies {
            let active: company::ActiveModel = company.into();
            company::Entity::insert(active).exec(&txn).await?;
            insert_employees(&txn, employees).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn update(&self, company: &Company, new_employees: &[Employee]) -> Result<()> {
        let txn = self.db.begin().await?;

        let active: company::ActiveModel = company.into();
        company::Entity::update(active).exec(&txn).await?;
        insert_employees(&txn, new_employees).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // employees follow through the cascading foreign key
        company::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }
}

// ===== Employee Repository =====

pub struct SeaOrmEmployeeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn sort_column(field: SortField) -> employee::Column {
    match field {
        SortField::Name => employee::Column::Name,
        SortField::Age => employee::Column::Age,
        SortField::Position => employee::Column::Position,
    }
}

#[async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    async fn find_page(
        &self,
        company_id: Uuid,
        params: &EmployeeParameters,
    ) -> Result<PagedList<Employee>> {
        let mut query = employee::Entity::find()
            .filter(employee::Column::CompanyId.eq(company_id))
            .filter(employee::Column::Age.gte(params.min_age))
            .filter(employee::Column::Age.lte(params.max_age));

        if let Some(term) = params.search() {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(employee::Column::Name)))
                    .like(LikeExpr::new(contains_pattern(&term)).escape('\\')),
            );
        }

        for key in params.sort_keys() {
            let column = sort_column(key.field);
            query = if key.descending {
                query.order_by_desc(column)
            } else {
                query.order_by_asc(column)
            };
        }
        // stable paging across equal sort keys
        query = query.order_by_asc(employee::Column::Id);

        let paginator = query.paginate(&*self.db, params.page_size);
        let total = paginator.num_items().await?;
        let rows = paginator
            .fetch_page(params.page_number.saturating_sub(1))
            .await?;

        Ok(PagedList::new(
            rows.into_iter().map(Into::into).collect(),
            total,
            params.page_number,
            params.page_size,
        ))
    }

    async fn find_by_id(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>> {
        let result = employee::Entity::find_by_id(id)
            .filter(employee::Column::CompanyId.eq(company_id))
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, employee: &Employee) -> Result<()> {
        let active: employee::ActiveModel = employee.into();
        employee::Entity::insert(active).exec(&*self.db).await?;
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> Result<()> {
        let active: employee::ActiveModel = employee.into();
        employee::Entity::update(active).exec(&*self.db).await?;
        Ok(())
    }

    async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<()> {
        employee::Entity::delete_many()
            .filter(employee::Column::Id.eq(id))
            .filter(employee::Column::CompanyId.eq(company_id))
            .exec(&*self.db)
            .await?;

        Ok(())
    }
}

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::UserName.eq(user_name))
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, user: &User, roles: &[String]) -> Result<()> {
        let txn = self.db.begin().await?;

        let active: user::ActiveModel = user.into();
        user::Entity::insert(active).exec(&txn).await?;

        if !roles.is_empty() {
            let granted = role::Entity::find()
                .filter(role::Column::Name.is_in(roles.iter().cloned()))
                .all(&txn)
                .await?;

            if !granted.is_empty() {
                let grants: Vec<user_role::ActiveModel> = granted
                    .into_iter()
                    .map(|role| user_role::ActiveModel {
                        user_id: Set(user.id),
                        role_id: Set(role.id),
                    })
                    .collect();
                user_role::Entity::insert_many(grants).exec(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<String>> {
        let role_ids: Vec<Uuid> = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|grant| grant.role_id)
            .collect();

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let roles = role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .order_by_asc(role::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn existing_roles(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let roles = role::Entity::find()
            .filter(role::Column::Name.is_in(names.iter().cloned()))
            .all(&*self.db)
            .await?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn save_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut update = user::Entity::update_many()
            .col_expr(user::Column::RefreshToken, Expr::value(token))
            .filter(user::Column::Id.eq(user_id));

        if let Some(expiry) = expiry {
            update = update.col_expr(user::Column::RefreshTokenExpiry, Expr::value(expiry));
        }

        update.exec(&*self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn search_pattern_matches_wildcards_literally() {
        assert_eq!(contains_pattern("ann"), "%ann%");
        assert_eq!(contains_pattern("_"), r"%\_%");
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
