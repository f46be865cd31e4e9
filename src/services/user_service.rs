//! User management service.
//!
//! Administration of user accounts: creation with password hashing,
//! profile updates, soft deletion and restore. Non-admin callers may
//! only read and update their own account.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(feature = "test-utils")]
use mockall::automock;

use crate::domain::policy::{self, Action};
use crate::domain::{NewUser, Password, Principal, UpdateUser, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserFilter};
use crate::types::{Paginated, PaginationParams};

/// Service-layer input for user creation; carries the plaintext password,
/// which is hashed before it reaches the repository.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub organization_name: Option<String>,
    pub recipient_type: Option<String>,
    pub donor_type: Option<String>,
    pub notes: Option<String>,
}

/// User service trait for dependency injection.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user account. Admin only.
    async fn create_user(&self, principal: Principal, input: CreateUser) -> AppResult<User>;

    /// Get a user. Admins may read anyone, others only themselves.
    async fn get_user(&self, principal: Principal, id: Uuid) -> AppResult<User>;

    /// List active users with filters. Admin only.
    async fn list_users(
        &self,
        principal: Principal,
        filter: UserFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<User>>;

    /// Update profile fields. Admins may update anyone, others only themselves.
    async fn update_user(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateUser,
    ) -> AppResult<User>;

    /// Soft delete a user account. Admin only.
    async fn delete_user(&self, principal: Principal, id: Uuid) -> AppResult<()>;

    /// Restore a soft-deleted user account. Admin only.
    async fn restore_user(&self, principal: Principal, id: Uuid) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn authorize_self_or_admin(principal: &Principal, id: Uuid) -> AppResult<()> {
        if principal.role.is_admin() || principal.id == id {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create_user(&self, principal: Principal, input: CreateUser) -> AppResult<User> {
        policy::authorize(&principal, Action::ManageUsers, None)?;

        // Deleted accounts still hold their email address, so the
        // uniqueness check must look past the soft-delete filter
        if self
            .uow
            .users()
            .find_by_email_with_deleted(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email address"));
        }

        let password = Password::new(&input.password)?;
        let new_user = NewUser {
            email: input.email,
            password_hash: password.into_string(),
            name: input.name,
            role: input.role,
            phone: input.phone,
            address: input.address,
            organization_name: input.organization_name,
            recipient_type: input.recipient_type,
            donor_type: input.donor_type,
            notes: input.notes,
        };

        let user = self.uow.users().create(new_user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    async fn get_user(&self, principal: Principal, id: Uuid) -> AppResult<User> {
        Self::authorize_self_or_admin(&principal, id)?;
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_users(
        &self,
        principal: Principal,
        filter: UserFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<User>> {
        policy::authorize(&principal, Action::ManageUsers, None)?;

        let (data, total) = self.uow.users().list(filter, page.clone()).await?;
        Ok(Paginated::new(data, page.page, page.limit(), total))
    }

    async fn update_user(
        &self,
        principal: Principal,
        id: Uuid,
        fields: UpdateUser,
    ) -> AppResult<User> {
        Self::authorize_self_or_admin(&principal, id)?;

        // Ensure the target exists and is active before updating
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.users().update(id, fields).await
    }

    async fn delete_user(&self, principal: Principal, id: Uuid) -> AppResult<()> {
        policy::authorize(&principal, Action::ManageUsers, None)?;

        if principal.id == id {
            return Err(AppError::validation("Admins cannot delete their own account"));
        }

        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, "User soft-deleted");
        Ok(())
    }

    async fn restore_user(&self, principal: Principal, id: Uuid) -> AppResult<User> {
        policy::authorize(&principal, Action::ManageUsers, None)?;

        let user = self
            .uow
            .users()
            .find_by_id_with_deleted(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.is_deleted() {
            return Err(AppError::invalid_state("User is not deleted"));
        }

        let user = self.uow.users().restore(id).await?;
        tracing::info!(user_id = %id, "User restored");
        Ok(user)
    }
}
