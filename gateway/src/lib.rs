//! GridRisk Gateway
//!
//! HTTP surface for site analysis:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET  | `/health`            | Liveness, always `{"status": "ok"}` |
//! | POST | `/analyze`           | Score, persist and render a site |
//! | GET  | `/sites/:id`         | Stored record with derived rating |
//! | GET  | `/sites/:id/report`  | PDF report for a stored site |

pub mod analyzer;
pub mod config;
pub mod error;
pub mod routes;

pub use analyzer::{Analysis, SiteAnalyzer};
pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::{build_router, AppState};
