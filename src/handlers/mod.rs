// handlers/mod.rs - Two tiers: public (no auth) and protected (role-gated /api/*)

pub mod protected;
pub mod public;
