pub mod repo;
mod repo_types;

#[cfg(test)]
pub mod memory;

pub use repo::{PgUserStore, UserStore};
pub use repo_types::{StoreError, User};
