mod calendar;
mod dashboard;
mod timeperiod;

#[cfg(feature = "github")]
pub mod github;

pub use calendar::*;
pub use dashboard::*;
pub use timeperiod::*;

pub type GithubHandle = String;
