mod error;
mod rule;
mod schema;
pub mod schemas;

pub use error::*;
pub use rule::*;
pub use schema::*;
