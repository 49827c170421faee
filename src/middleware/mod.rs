//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: Authentication extractor validating bearer JWTs
//! - [`role`]: Role checking middleware and helpers
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::AuthUser`] validates the JWT and extracts claims
//! 3. Role middleware/helpers check the claims' role where required
//! 4. Handler executes if all checks pass

pub mod auth;
pub mod role;
