pub use super::delivery_logs::Entity as DeliveryLogs;
pub use super::relay_requests::Entity as RelayRequests;
pub use super::users::Entity as Users;
