//! Provider assembly exposed to the hosting identity framework.
//!
//! `descriptor` holds the static registration data (`ProviderDescriptor`), `contract`
//! defines [`IdentityProvider`], the four-callback plugin surface a host drives
//! (authorization, token exchange, userinfo, profile mapping), and `steam` wires the
//! OpenID and profile modules into [`SteamProvider`], which implements it.

pub mod contract;
pub mod descriptor;
pub mod steam;

pub use contract::*;
pub use descriptor::*;
pub use steam::*;
