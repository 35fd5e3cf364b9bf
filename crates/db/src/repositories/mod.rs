//! Repository layer: one zero-sized struct per table, all methods take `&PgPool`.

pub mod claim_repo;
pub mod idea_repo;
pub mod role_repo;
pub mod user_repo;

pub use claim_repo::ClaimRepo;
pub use idea_repo::IdeaRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
