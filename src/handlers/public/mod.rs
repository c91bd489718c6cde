// Tier 1: no authentication required (/auth/login, /auth/register)
pub mod auth;
