pub mod config_service;
pub mod identity_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::identity_service::FileIdentityProvider;
pub use crate::paths::ReveriePaths;
