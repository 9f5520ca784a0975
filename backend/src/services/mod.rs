//! Business logic services for the management backend

pub mod notification;
pub mod order;
pub mod party;
pub mod product;
pub mod report;
pub mod stock;
pub mod tax;
pub mod user;

pub use notification::NotificationService;
pub use order::OrderService;
pub use party::PartyService;
pub use product::ProductService;
pub use report::ReportService;
pub use stock::StockService;
pub use tax::TaxService;
pub use user::UserService;
