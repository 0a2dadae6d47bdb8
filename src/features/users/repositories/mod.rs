mod pg_user_directory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::users::models::{User, UserRole};

pub use pg_user_directory::PgUserDirectory;

/// Lookup of company users by role.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users of `company_id` holding `role`, most recently created first.
    async fn find_by_company_and_role(&self, company_id: Uuid, role: UserRole)
        -> Result<Vec<User>>;
}
