use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use entity::employee::{self, EmployeeType, Status};

use crate::model::{DEFAULT_PROFILE_PIC, EmployeeFields};

/// Field name → human readable message.
pub type FieldErrors = BTreeMap<String, String>;

/// A merged record that passed every field-local rule. Uniqueness is checked by the store.
#[derive(Clone, Debug)]
pub(crate) struct Validated {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    pub status: Status,
    pub hire_date: Option<DateTime<FixedOffset>>,
    pub employee_type: EmployeeType,
    pub address: String,
    pub profile_pic: String,
}

/// Merge `fields` over `existing` (if any) and apply every field rule, collecting all failures.
pub(crate) fn validate(
    existing: Option<&employee::Model>,
    fields: &EmployeeFields,
) -> Result<Validated, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required(
        &mut errors,
        "name",
        "Name is required",
        fields.name.as_deref(),
        existing.map(|m| m.name.as_str()),
    );
    let phone = required(
        &mut errors,
        "phone",
        "Phone number is required",
        fields.phone.as_deref(),
        existing.map(|m| m.phone.as_str()),
    );
    let position = required(
        &mut errors,
        "position",
        "Position is required",
        fields.position.as_deref(),
        existing.map(|m| m.position.as_str()),
    );
    let department = required(
        &mut errors,
        "department",
        "Department is required",
        fields.department.as_deref(),
        existing.map(|m| m.department.as_str()),
    );
    let address = required(
        &mut errors,
        "address",
        "Address is required",
        fields.address.as_deref(),
        existing.map(|m| m.address.as_str()),
    );

    let email = required(
        &mut errors,
        "email",
        "Email is required",
        fields.email.as_deref(),
        existing.map(|m| m.email.as_str()),
    )
    .to_lowercase();
    if !errors.contains_key("email") && !entity::email::is_valid(&email) {
        errors.insert("email".into(), "Please enter a valid email".into());
    }

    let status = match non_blank(fields.status.as_deref()) {
        Some(value) => Status::parse(value).unwrap_or_else(|| {
            errors.insert("status".into(), format!("{value} is not supported"));
            Status::default()
        }),
        None => existing.map(|m| m.status).unwrap_or_default(),
    };

    let employee_type = match non_blank(fields.employee_type.as_deref()) {
        Some(value) => {
            let parsed = EmployeeType::parse(value);
            if parsed.is_none() {
                errors.insert(
                    "employeeType".into(),
                    format!("{value} is not a valid employee type"),
                );
            }
            parsed
        }
        None => {
            let stored = existing.map(|m| m.employee_type);
            if stored.is_none() {
                errors.insert("employeeType".into(), "Employee type is required".into());
            }
            stored
        }
    };

    let hire_date = match non_blank(fields.hire_date.as_deref()) {
        Some(value) => {
            let parsed = parse_hire_date(value);
            if parsed.is_none() {
                errors.insert("hireDate".into(), "Invalid hire date".into());
            }
            parsed
        }
        None => existing.map(|m| m.hire_date),
    };

    let profile_pic = non_blank(fields.profile_pic.as_deref())
        .filter(|value| *value != "null")
        .map(str::to_string)
        .or_else(|| existing.map(|m| m.profile_pic.clone()))
        .unwrap_or_else(|| DEFAULT_PROFILE_PIC.to_string());

    match employee_type {
        Some(employee_type) if errors.is_empty() => Ok(Validated {
            name,
            email,
            phone,
            position,
            department,
            status,
            hire_date,
            employee_type,
            address,
            profile_pic,
        }),
        _ => Err(errors),
    }
}

/// The normalized email the merged record would carry, if it is syntactically valid.
pub(crate) fn candidate_email(
    existing: Option<&employee::Model>,
    fields: &EmployeeFields,
) -> Option<String> {
    let email = non_blank(fields.email.as_deref())
        .or_else(|| existing.map(|m| m.email.as_str()))?
        .to_lowercase();
    entity::email::is_valid(&email).then_some(email)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_hire_date(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc).into())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required(
    errors: &mut FieldErrors,
    field: &str,
    message: &str,
    supplied: Option<&str>,
    stored: Option<&str>,
) -> String {
    // A supplied blank value clears the field, which then fails the rule.
    let value = match supplied {
        Some(v) => v.trim(),
        None => stored.unwrap_or_default().trim(),
    };
    if value.is_empty() {
        errors.insert(field.to_string(), message.to_string());
    }
    value.to_string()
}
