pub mod prelude;

pub mod delivery_logs;
pub mod relay_requests;
pub mod users;
