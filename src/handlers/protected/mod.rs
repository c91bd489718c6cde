// Tier 2: bearer token required (/auth/profile)
pub mod profile;
