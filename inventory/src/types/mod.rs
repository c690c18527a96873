//! Inventory data types

mod category;
mod facts;
mod record;
mod service;

pub use category::*;
pub use facts::*;
pub use record::*;
pub use service::*;
