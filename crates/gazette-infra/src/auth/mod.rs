//! Identity token infrastructure.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenService};
