//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{company, employee, user};
use crate::contract::{Company, Employee, User};
use sea_orm::ActiveValue::Set;

// ===== Company Conversions =====

impl From<company::Model> for Company {
    fn from(entity: company::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            address: entity.address,
            country: entity.country,
        }
    }
}

impl From<&Company> for company::ActiveModel {
    fn from(model: &Company) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            address: Set(model.address.clone()),
            country: Set(model.country.clone()),
        }
    }
}

// ===== Employee Conversions =====

impl From<employee::Model> for Employee {
    fn from(entity: employee::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            age: entity.age,
            position: entity.position,
            company_id: entity.company_id,
        }
    }
}

impl From<&Employee> for employee::ActiveModel {
    fn from(model: &Employee) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            age: Set(model.age),
            position: Set(model.position.clone()),
            company_id: Set(model.company_id),
        }
    }
}

// ===== User Conversions =====

impl From<user::Model> for User {
    fn from(entity: user::Model) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            user_name: entity.user_name,
            email: entity.email,
            phone_number: entity.phone_number,
            password_hash: entity.password_hash,
            refresh_token: entity.refresh_token,
            refresh_token_expiry: entity.refresh_token_expiry,
        }
    }
}

impl From<&User> for user::ActiveModel {
    fn from(model: &User) -> Self {
        Self {
            id: Set(model.id),
            first_name: Set(model.first_name.clone()),
            last_name: Set(model.last_name.clone()),
            user_name: Set(model.user_name.clone()),
            email: Set(model.email.clone()),
            phone_number: Set(model.phone_number.clone()),
            password_hash: Set(model.password_hash.clone()),
            refresh_token: Set(model.refresh_token.clone()),
            refresh_token_expiry: Set(model.refresh_token_expiry),
        }
    }
}
