//! OpenID 2.0 assertion handling for Steam sign-in.
//!
//! Steam's OpenID assertions are unsigned from the relying party's point of view: anyone
//! can hit the callback URL with arbitrary parameters. Trust therefore comes from two
//! steps run in order. [`validate`] rejects structurally wrong assertions locally, then
//! [`verify`] asks Steam to confirm the assertion with `check_authentication` and only
//! afterwards extracts the SteamID through [`pattern`].

pub mod params;
pub mod pattern;
pub mod request;
pub mod validate;
pub mod verify;

pub use params::*;
pub use pattern::*;
pub use request::*;
pub use validate::*;
pub use verify::*;
