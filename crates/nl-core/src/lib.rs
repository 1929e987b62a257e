pub mod error;
pub mod report;
pub mod types;

pub use error::NodeLinkError;
pub use report::*;
pub use types::*;
