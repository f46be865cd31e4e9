//! Role-based authorization policy.
//!
//! A pure rule table deciding which principal may invoke which lifecycle
//! transition. Services consult it before any mutation, never after.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

use super::user::{Principal, UserRole};

/// Actions gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateDonation,
    UpdateDonation,
    DeleteDonation,
    AssignDonation,
    CompleteDonation,
    CreateRequest,
    UpdateRequest,
    DeleteRequest,
    CreateFeedback,
    ManageFeedback,
    ManageUsers,
}

/// Decide whether a principal may perform an action.
///
/// `resource_owner_id` is the id of the user owning the affected resource:
/// the donor for donation create/update/delete, the foodbank for request
/// operations and donation assignment/completion, the recipient for
/// feedback. `None` means the action has no meaningful owner for this
/// caller (e.g. creation with ownership still to be established).
pub fn can_perform(
    role: UserRole,
    principal_id: Uuid,
    action: Action,
    resource_owner_id: Option<Uuid>,
) -> bool {
    if role.is_admin() {
        return true;
    }

    let owns = resource_owner_id == Some(principal_id);

    match action {
        Action::CreateDonation => role == UserRole::Donor,
        Action::UpdateDonation | Action::DeleteDonation => role == UserRole::Donor && owns,
        Action::AssignDonation | Action::CompleteDonation => role == UserRole::Foodbank && owns,
        Action::CreateRequest | Action::UpdateRequest | Action::DeleteRequest => {
            role == UserRole::Foodbank && owns
        }
        Action::CreateFeedback | Action::ManageFeedback => role == UserRole::Recipient && owns,
        Action::ManageUsers => false,
    }
}

/// `can_perform` lifted into the error taxonomy: denial is an
/// authorization error surfaced as HTTP 403.
pub fn authorize(
    principal: &Principal,
    action: Action,
    resource_owner_id: Option<Uuid>,
) -> AppResult<()> {
    if can_perform(principal.role, principal.id, action, resource_owner_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
