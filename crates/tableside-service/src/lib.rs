//! # tableside-service: Operator Session for Tableside POS
//!
//! Wraps the pure order core in the entry points a front end calls.
//!
//! ## Modules
//!
//! - [`session`] - `PosSession`, one register's tables, bills and menu
//! - [`config`] - `ServiceConfig` loaded from TOML and `TABLESIDE_*` env
//! - [`error`] - `ApiError` returned to the front end, `ConfigError` at startup
//! - [`seed`] - Built-in sample menu
//!
//! ## Example Usage
//!
//! ```rust
//! use tableside_service::{PosSession, ServiceConfig};
//!
//! let config = ServiceConfig::default();
//! let mut session = PosSession::from_config(&config).unwrap();
//!
//! session.select_table("table-2").unwrap();
//! session.add_product_to_table("table-2", "4", &[]).unwrap();
//! let bill = session.generate_bill("table-2").unwrap();
//!
//! assert_eq!(config.format_money(bill.total), "$3.29");
//! ```

pub mod config;
pub mod error;
pub mod seed;
pub mod session;

pub use config::ServiceConfig;
pub use error::{ApiError, ApiResult, ConfigError, ErrorCode};
pub use session::PosSession;
