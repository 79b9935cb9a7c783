pub mod context;
pub mod credentials;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod github;
pub mod metrics;

#[cfg(test)]
mod test_utils;
