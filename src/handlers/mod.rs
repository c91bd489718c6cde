// handlers/mod.rs - three security tiers:
// Public (no auth) → Protected (bearer token) → Elevated (administrator role)

pub mod elevated;
pub mod protected;
pub mod public;
