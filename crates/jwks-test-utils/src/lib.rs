//! # JWKS Test Utilities
//!
//! Shared test utilities for the JWKS client.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed RSA keys for reproducible tests)
//! - Claims builders and unsigned-token helpers
//! - A mock identity provider serving discovery and JWKS documents
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jwks_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let keypair = test_keypair(1)?;
//!     let idp = MockIdentityProvider::start().await;
//!     idp.mount_key_set(vec![keypair.jwk_json()]).await;
//!
//!     let token = keypair.sign(&TestClaimsBuilder::new().for_user("alice").build());
//! }
//! ```

pub mod crypto_fixtures;
pub mod mock_idp;
pub mod token_builders;

// Re-export commonly used items
pub use crypto_fixtures::*;
pub use mock_idp::*;
pub use token_builders::*;
