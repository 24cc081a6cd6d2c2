// Identity bridge: deterministic keypair derivation from an external
// (LinkedIn) identity, principal caching, and the provider handshake that
// makes a derived principal usable for writes.

pub mod bridge;
pub mod derivation;

pub use bridge::{HttpIdentityProvider, IdentityBridge, IdentityProvider, ProviderError};
pub use derivation::{derive_identity, DerivedIdentity, Principal};
