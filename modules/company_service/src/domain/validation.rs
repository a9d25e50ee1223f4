//! Request body validation for companies, employees and registrations

use crate::contract::{
    CompanyDraft, CompanyInput, EmployeeDraft, EmployeeInput, FieldErrors, Registration,
    ServiceError,
};

pub const COMPANY_NAME_MAX: usize = 60;
pub const COMPANY_ADDRESS_MAX: usize = 60;
pub const EMPLOYEE_NAME_MAX: usize = 30;
pub const EMPLOYEE_POSITION_MAX: usize = 20;
pub const EMPLOYEE_MIN_AGE: i32 = 18;
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Collects messages per field before turning them into an error
#[derive(Debug, Default)]
struct Violations {
    errors: FieldErrors,
}

impl Violations {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Required string with an upper length bound, measured in characters
    fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max: usize,
        required_message: &str,
        label: &str,
    ) -> String {
        match value.map(str::trim) {
            None | Some("") => {
                self.add(field, required_message);
                String::new()
            }
            Some(text) => {
                if text.chars().count() > max {
                    self.add(
                        field,
                        format!("Maximum length for the {label} is {max} characters."),
                    );
                }
                text.to_string()
            }
        }
    }

    fn merge_prefixed(&mut self, prefix: &str, other: Violations) {
        for (field, messages) in other.errors {
            self.errors
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(messages);
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ServiceError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ServiceError::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Validate an employee payload
pub fn validate_employee(draft: &EmployeeDraft) -> Result<EmployeeInput, ServiceError> {
    let mut violations = Violations::default();
    let input = check_employee(&mut violations, draft);
    violations.finish(input)
}

fn check_employee(violations: &mut Violations, draft: &EmployeeDraft) -> EmployeeInput {
    let name = violations.required_text(
        "name",
        draft.name.as_deref(),
        EMPLOYEE_NAME_MAX,
        "Employee name is a required field.",
        "Name",
    );

    let age = match draft.age {
        Some(age) if age >= EMPLOYEE_MIN_AGE => age,
        other => {
            violations.add("age", "Age is required and it can't be lower than 18.");
            other.unwrap_or_default()
        }
    };

    let position = violations.required_text(
        "position",
        draft.position.as_deref(),
        EMPLOYEE_POSITION_MAX,
        "Position is a required field.",
        "Position",
    );

    EmployeeInput {
        name,
        age,
        position,
    }
}

/// Validate a company payload including any nested employees
pub fn validate_company(draft: &CompanyDraft) -> Result<CompanyInput, ServiceError> {
    let mut violations = Violations::default();

    let name = violations.required_text(
        "name",
        draft.name.as_deref(),
        COMPANY_NAME_MAX,
        "Company name is a required field.",
        "Name",
    );
    let address = violations.required_text(
        "address",
        draft.address.as_deref(),
        COMPANY_ADDRESS_MAX,
        "Company address is a required field.",
        "Address",
    );
    let country = draft
        .country
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let mut employees = Vec::with_capacity(draft.employees.len());
    for (index, employee) in draft.employees.iter().enumerate() {
        let mut nested = Violations::default();
        employees.push(check_employee(&mut nested, employee));
        violations.merge_prefixed(&format!("employees[{index}]"), nested);
    }

    violations.finish(CompanyInput {
        name,
        address,
        country,
        employees,
    })
}

/// Validate the presence and shape of registration fields.
///
/// Identity policy (password strength, uniqueness, roles) is checked by the
/// authentication service.
pub fn validate_registration(registration: &Registration) -> Result<(), ServiceError> {
    let mut violations = Violations::default();

    if registration
        .user_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .is_empty()
    {
        violations.add("userName", "Username is required");
    }

    if registration.password.as_deref().unwrap_or_default().is_empty() {
        violations.add("password", "Password is required");
    }

    if let Some(email) = registration.email.as_deref() {
        if !email.is_empty() && !looks_like_email(email) {
            violations.add("email", format!("Email '{email}' is invalid."));
        }
    }

    violations.finish(())
}

/// Login payload must carry both a user name and a password
pub fn validate_credentials(
    user_name: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String), ServiceError> {
    let mut violations = Violations::default();

    let user_name = user_name.map(str::trim).unwrap_or_default();
    if user_name.is_empty() {
        violations.add("userName", "User name is required");
    }
    let password = password.unwrap_or_default();
    if password.is_empty() {
        violations.add("password", "Password is required");
    }

    violations.finish((user_name.to_string(), password.to_string()))
}

/// Password policy enforced on registration
pub fn password_policy_violations(password: &str) -> Vec<String> {
    let mut messages = Vec::new();
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        messages.push(format!(
            "Passwords must be at least {PASSWORD_MIN_LENGTH} characters."
        ));
    }
    messages
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
