pub mod db;
pub mod error;
pub mod file_store;
#[cfg(test)]
pub mod test_utils;
pub mod upload;
pub mod utils;
