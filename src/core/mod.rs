pub mod alerts;
pub mod dispatch;
pub mod drivers;
pub mod ledger;
