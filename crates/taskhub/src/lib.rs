//! TaskHub dashboard core.
//!
//! Calendar projections, permission checks, backend access and the local
//! state (session, preferences, permission matrix) behind the dashboard.

pub mod api;
pub mod cache;
pub mod config;
pub mod draft;
pub mod error;
pub mod ingest;
pub mod permissions;
pub mod preferences;
pub mod projection;
pub mod session;
pub mod storage;
pub mod summary;

pub use api::{DashboardApi, HttpApi};
pub use cache::DataCache;
pub use config::AppConfig;
pub use error::{ApiError, ApiResult, StoreError};
pub use permissions::{MatrixStore, PermissionGate};
pub use projection::EventProjector;
pub use session::{AuthSession, IdentityProvider};
pub use storage::{FileStore, KeyValueStore, LocalStore, MemoryStore};

pub use taskhub_types as types;
