//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer order)
//!     → request.rs (request ID, cookie parsing → RequestContext)
//!     → [security: headers, anti-forgery guard]
//!     → [routing: /api dispatcher]
//!     → response.rs (Set-Cookie helpers)
//!     → [errors: classify and serialize faults]
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Cookies, RequestContext, X_REQUEST_ID};
pub use response::{SameSite, SetCookie};
pub use server::{build_pipeline, AppServer};
