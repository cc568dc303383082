use chrono::{DateTime, FixedOffset};
use entity::employee::{self, EmployeeType, Status};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PROFILE_PIC: &str = "https://randomuser.me/api/portraits/lego/1.jpg";

/// Employee as returned to API clients.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub department: String,
    pub status: Status,
    pub hire_date: DateTime<FixedOffset>,
    pub employee_type: EmployeeType,
    pub address: String,
    pub profile_pic: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<employee::Model> for Employee {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            position: model.position,
            department: model.department,
            status: model.status,
            hire_date: model.hire_date,
            employee_type: model.employee_type,
            address: model.address,
            profile_pic: model.profile_pic,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Client-writable employee fields.
///
/// Used both for creation (absent required fields fail validation) and for
/// partial updates (absent fields keep their stored value). Keys outside this
/// list, such as `id` or `createdAt`, are dropped during deserialization.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub hire_date: Option<String>,
    pub employee_type: Option<String>,
    pub address: Option<String>,
    pub profile_pic: Option<String>,
}

impl EmployeeFields {
    /// Assign a field by its wire name. Returns `false` for names outside the allow-list.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "position" => &mut self.position,
            "department" => &mut self.department,
            "status" => &mut self.status,
            "hireDate" => &mut self.hire_date,
            "employeeType" => &mut self.employee_type,
            "address" => &mut self.address,
            "profilePic" => &mut self.profile_pic,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Headline numbers for the dashboard view.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub total_employees: u64,
    pub active_employees: u64,
    pub inactive_employees: u64,
    pub recently_added: Vec<Employee>,
}

/// Exact-match list filter. Blank values are treated as absent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeFilter {
    pub status: Option<String>,
    pub department: Option<String>,
    pub employee_type: Option<String>,
}
