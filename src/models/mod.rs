pub mod car;
pub mod mileage_log;
pub mod reminder;
pub mod service_item;
pub mod user;
