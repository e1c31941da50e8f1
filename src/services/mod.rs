pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthUser, Claims, TokenBundle, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod relay_service;
pub mod relay_service_impl;
pub use relay_service::{
    DeliveryLogEntry, NewRelayRequest, RelayError, RelayRequestInfo, RelayService,
};
pub use relay_service_impl::SeaOrmRelayService;
