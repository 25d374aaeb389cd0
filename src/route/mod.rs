pub mod health;
#[cfg(test)]
mod health_test;
pub mod user;
