pub mod alert;
pub mod driver;
pub mod trip;
