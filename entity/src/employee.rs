use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub position: String,
    #[sea_orm(indexed)]
    pub department: String,
    pub status: Status,
    pub hire_date: DateTimeWithTimeZone,
    pub employee_type: EmployeeType,
    pub address: String,
    pub profile_pic: String,
    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[derive(
    Copy, Clone, Debug, Default, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "active")]
    #[serde(rename = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    #[serde(rename = "inactive")]
    Inactive,
}

impl Status {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Status::Active),
            "inactive" => Some(Status::Inactive),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum EmployeeType {
    #[sea_orm(string_value = "Full-time")]
    #[serde(rename = "Full-time")]
    FullTime,
    #[sea_orm(string_value = "Part-time")]
    #[serde(rename = "Part-time")]
    PartTime,
    #[sea_orm(string_value = "Contract")]
    #[serde(rename = "Contract")]
    Contract,
    #[sea_orm(string_value = "Internship")]
    #[serde(rename = "Internship")]
    Internship,
}

impl EmployeeType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Full-time" => Some(EmployeeType::FullTime),
            "Part-time" => Some(EmployeeType::PartTime),
            "Contract" => Some(EmployeeType::Contract),
            "Internship" => Some(EmployeeType::Internship),
            _ => None,
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
