use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::FromRow;

pub const TABLE_NAME: &str = "public.users";

pub const COLUMNS: &str = "id, email, first_name, last_name, country, city, phone_number, \
profile_picture, created_at, updated_at";

#[derive(Clone, Debug, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// Every column a create or update writes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserFields {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}
