//! Client-generated record identifiers.
//!
//! Measurements and community posts are keyed by identifiers minted on the
//! client before the record is sent. The generator is injected into the
//! write path so tests can pin ids.

/// Capability for minting unique record identifiers.
pub trait IdGenerator {
    /// Mint a fresh identifier carrying a semantic prefix,
    /// e.g. `post_3f9c...`.
    fn mint(&self, prefix: &str) -> String;
}

/// Default generator: a random 128-bit token rendered as hex. Collision
/// probability is negligible even under rapid repeated submission.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn mint(&self, prefix: &str) -> String {
        format!("{}_{:032x}", prefix, rand::random::<u128>())
    }
}
