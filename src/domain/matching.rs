//! Donation-to-request matching rules.
//!
//! Pure functions producing either the fully updated donation/request pair
//! or an error that leaves both entities untouched. The persistence layer
//! commits the pair inside one transaction.

use crate::errors::{AppError, AppResult};

use super::donation::{Donation, DonationStatus};
use super::request::{DonationRequest, RequestStatus};

/// Check compatibility: types must match exactly and the donation must
/// cover the requested quantity.
pub fn check_match(donation: &Donation, request: &DonationRequest) -> AppResult<()> {
    if donation.category != request.category {
        return Err(AppError::mismatch(format!(
            "Donation type '{}' does not match requested type '{}'",
            donation.category, request.category
        )));
    }
    if donation.quantity < request.quantity {
        return Err(AppError::mismatch(format!(
            "Donation quantity {} is below requested quantity {}",
            donation.quantity, request.quantity
        )));
    }
    Ok(())
}

/// Apply a donation-to-request assignment.
///
/// Validates lifecycle state and compatibility, then returns the updated
/// pair: the request becomes fulfilled, the donation becomes assigned and
/// records the request it fulfills. Any error is returned before either
/// entity is modified.
pub fn apply_assignment(
    mut donation: Donation,
    mut request: DonationRequest,
) -> AppResult<(Donation, DonationRequest)> {
    if !request.is_open() {
        return Err(AppError::invalid_state("Request is already fulfilled"));
    }
    donation.ensure_can_assign()?;
    check_match(&donation, &request)?;

    donation.status = DonationStatus::Assigned;
    donation.assigned_request_id = Some(request.id);
    request.status = RequestStatus::Fulfilled;

    Ok((donation, request))
}
