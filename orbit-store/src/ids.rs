use uuid::Uuid;

/// Fresh id for posts, comments and messages created at runtime
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Stable id for seed records, so seed data can cross-reference itself
pub const fn seed_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}
