//! License token format and verification for ShopKit.
//!
//! License tokens are minted by the Hub and use the format:
//! `base64url(payload).base64url(signature)`
//!
//! The payload is a JSON object carrying the claims a license grants
//! (tenant, device, plan, entitlements, validity window). The signature
//! is Ed25519 over the base64url-encoded payload string, matching the
//! Hub's signing side.
//!
//! Verification here is purely cryptographic and structural. Whether the
//! claims are still within their validity or grace window is a question
//! of (claims, now) and belongs to the licensing service, so signature
//! validity and business-time validity stay independently testable.

mod claims;
mod error;
mod verify;

pub use claims::Claims;
pub use error::{TokenError, TokenResult};
pub use verify::TokenVerifier;
