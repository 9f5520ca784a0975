//! Domain models for the Business Management Platform

pub mod notification;
pub mod order;
pub mod party;
pub mod product;
pub mod stock;
pub mod tax;
pub mod user;

pub use notification::*;
pub use order::*;
pub use party::*;
pub use product::*;
pub use stock::*;
pub use tax::*;
pub use user::*;
