// Tier 3: administrator role required (/users)
pub mod users;
