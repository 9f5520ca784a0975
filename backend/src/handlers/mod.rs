//! HTTP handlers for the management backend API

pub mod health;
pub mod notification;
pub mod order;
pub mod party;
pub mod product;
pub mod report;
pub mod stock;
pub mod tax;
pub mod user;

pub use health::*;
pub use notification::*;
pub use order::*;
pub use party::*;
pub use product::*;
pub use report::*;
pub use stock::*;
pub use tax::*;
pub use user::*;
