pub mod db;
pub mod uploads;
pub mod user;
