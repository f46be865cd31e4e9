//! Donation service unit tests.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use foodbridge::domain::{
    DonationStatus, NewDonation, Principal, RequestStatus, UpdateDonation, UserRole,
};
use foodbridge::errors::AppError;
use foodbridge::infra::{
    MockDonationRepository, MockFeedbackRepository, MockRequestRepository, MockUserRepository,
};
use foodbridge::services::{DonationManager, DonationService};

use common::{test_donation, test_request, test_user, TestUnitOfWork};

fn service(
    users: MockUserRepository,
    donations: MockDonationRepository,
) -> DonationManager<TestUnitOfWork> {
    let uow = TestUnitOfWork::new(
        users,
        donations,
        MockRequestRepository::new(),
        MockFeedbackRepository::new(),
    );
    DonationManager::new(Arc::new(uow))
}

/// Service plus a handle on its unit of work, for seeding and inspecting
/// the transactional row store.
fn tx_service() -> (DonationManager<TestUnitOfWork>, Arc<TestUnitOfWork>) {
    let uow = Arc::new(TestUnitOfWork::new(
        MockUserRepository::new(),
        MockDonationRepository::new(),
        MockRequestRepository::new(),
        MockFeedbackRepository::new(),
    ));
    (DonationManager::new(uow.clone()), uow)
}

fn new_donation(donor_id: Uuid, foodbank_id: Uuid) -> NewDonation {
    NewDonation {
        donor_id,
        foodbank_id,
        recipient_id: None,
        category: "food".to_string(),
        quantity: 10,
    }
}

#[tokio::test]
async fn donor_creates_own_donation() {
    let donor_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(donor_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Donor))));
    users
        .expect_find_by_id()
        .with(eq(foodbank_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Foodbank))));

    let mut donations = MockDonationRepository::new();
    donations.expect_create().returning(move |new| {
        let mut d = test_donation(Uuid::new_v4(), new.donor_id, new.foodbank_id, DonationStatus::Pending);
        d.quantity = new.quantity;
        Ok(d)
    });

    let service = service(users, donations);
    let result = service
        .create_donation(
            Principal::new(donor_id, UserRole::Donor),
            new_donation(donor_id, foodbank_id),
        )
        .await;

    let donation = result.unwrap();
    assert_eq!(donation.donor_id, donor_id);
    assert_eq!(donation.status, DonationStatus::Pending);
}

#[tokio::test]
async fn donor_cannot_create_for_another_donor() {
    let service = service(MockUserRepository::new(), MockDonationRepository::new());

    let result = service
        .create_donation(
            Principal::new(Uuid::new_v4(), UserRole::Donor),
            new_donation(Uuid::new_v4(), Uuid::new_v4()),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn recipient_cannot_create_donations() {
    let service = service(MockUserRepository::new(), MockDonationRepository::new());

    let principal = Principal::new(Uuid::new_v4(), UserRole::Recipient);
    let result = service
        .create_donation(principal, new_donation(Uuid::new_v4(), Uuid::new_v4()))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn create_rejects_foodbank_id_with_wrong_role() {
    let donor_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(donor_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Donor))));
    // The referenced "foodbank" is actually a donor account
    users
        .expect_find_by_id()
        .with(eq(foodbank_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Donor))));

    let service = service(users, MockDonationRepository::new());
    let result = service
        .create_donation(
            Principal::new(donor_id, UserRole::Donor),
            new_donation(donor_id, foodbank_id),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_missing_donor() {
    let donor_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let service = service(users, MockDonationRepository::new());
    let result = service
        .create_donation(
            Principal::new(Uuid::new_v4(), UserRole::Admin),
            new_donation(donor_id, Uuid::new_v4()),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_zero_quantity() {
    let donor_id = Uuid::new_v4();
    let mut input = new_donation(donor_id, Uuid::new_v4());
    input.quantity = 0;

    let service = service(MockUserRepository::new(), MockDonationRepository::new());
    let result = service
        .create_donation(Principal::new(donor_id, UserRole::Donor), input)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn get_donation_not_found() {
    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(|_| Ok(None));

    let service = service(MockUserRepository::new(), donations);
    let result = service.get_donation(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn detail_keeps_last_known_name_of_deleted_donor() {
    let donation_id = Uuid::new_v4();
    let donor_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();
    let recipient_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        let mut d = test_donation(id, donor_id, foodbank_id, DonationStatus::Completed);
        d.recipient_id = Some(recipient_id);
        Ok(Some(d))
    });

    let mut users = MockUserRepository::new();
    // The donor account was removed after the donation completed
    users
        .expect_find_by_id_with_deleted()
        .with(eq(donor_id))
        .returning(move |id| {
            let mut u = test_user(id, UserRole::Donor);
            u.name = "Former Donor".to_string();
            u.deleted_at = Some(chrono::Utc::now());
            Ok(Some(u))
        });
    users
        .expect_find_by_id_with_deleted()
        .with(eq(foodbank_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Foodbank))));
    users
        .expect_find_by_id_with_deleted()
        .with(eq(recipient_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Recipient))));

    let service = service(users, donations);
    let detail = service.get_donation_detail(donation_id).await.unwrap();

    let donor = detail.donor.unwrap();
    assert_eq!(donor.name, "Former Donor");
    assert!(donor.deleted);
    assert!(!detail.foodbank.unwrap().deleted);
    assert!(!detail.recipient.unwrap().deleted);
}

#[tokio::test]
async fn owning_foodbank_assigns_recipient() {
    let donation_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();
    let recipient_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().with(eq(donation_id)).returning(move |id| {
        Ok(Some(test_donation(id, Uuid::new_v4(), foodbank_id, DonationStatus::Pending)))
    });
    donations
        .expect_assign_recipient()
        .with(eq(donation_id), eq(recipient_id))
        .returning(move |id, rid| {
            let mut d = test_donation(id, Uuid::new_v4(), foodbank_id, DonationStatus::Assigned);
            d.recipient_id = Some(rid);
            Ok(d)
        });

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(recipient_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Recipient))));

    let service = service(users, donations);
    let result = service
        .assign_recipient(
            Principal::new(foodbank_id, UserRole::Foodbank),
            donation_id,
            recipient_id,
        )
        .await;

    let donation = result.unwrap();
    assert_eq!(donation.status, DonationStatus::Assigned);
    assert_eq!(donation.recipient_id, Some(recipient_id));
}

#[tokio::test]
async fn other_foodbank_cannot_assign_recipient() {
    let donation_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, Uuid::new_v4(), Uuid::new_v4(), DonationStatus::Pending)))
    });

    let service = service(MockUserRepository::new(), donations);
    let result = service
        .assign_recipient(
            Principal::new(Uuid::new_v4(), UserRole::Foodbank),
            donation_id,
            Uuid::new_v4(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn completed_donation_cannot_receive_recipient() {
    let donation_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, Uuid::new_v4(), foodbank_id, DonationStatus::Completed)))
    });

    let service = service(MockUserRepository::new(), donations);
    let result = service
        .assign_recipient(
            Principal::new(foodbank_id, UserRole::Foodbank),
            donation_id,
            Uuid::new_v4(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
}

#[tokio::test]
async fn assigning_unknown_recipient_is_not_found() {
    let donation_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, Uuid::new_v4(), foodbank_id, DonationStatus::Pending)))
    });

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let service = service(users, donations);
    let result = service
        .assign_recipient(
            Principal::new(foodbank_id, UserRole::Foodbank),
            donation_id,
            Uuid::new_v4(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn foodbank_matches_donation_to_own_request() {
    let donation_id = Uuid::new_v4();
    let request_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let (service, uow) = tx_service();
    uow.tx().insert_donation(test_donation(
        donation_id,
        Uuid::new_v4(),
        foodbank_id,
        DonationStatus::Pending,
    ));
    uow.tx()
        .insert_request(test_request(request_id, foodbank_id, RequestStatus::Open));

    let result = service
        .assign_to_request(
            Principal::new(foodbank_id, UserRole::Foodbank),
            donation_id,
            request_id,
        )
        .await;

    let donation = result.unwrap();
    assert_eq!(donation.status, DonationStatus::Assigned);
    assert_eq!(donation.assigned_request_id, Some(request_id));

    // Both rows committed together
    let stored_donation = uow.tx().donation(donation_id).unwrap();
    assert_eq!(stored_donation.status, DonationStatus::Assigned);
    let stored_request = uow.tx().request(request_id).unwrap();
    assert_eq!(stored_request.status, RequestStatus::Fulfilled);
}

#[tokio::test]
async fn other_foodbank_cannot_match_requests() {
    let donation_id = Uuid::new_v4();
    let request_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let (service, uow) = tx_service();
    uow.tx().insert_donation(test_donation(
        donation_id,
        Uuid::new_v4(),
        owner_id,
        DonationStatus::Pending,
    ));
    uow.tx()
        .insert_request(test_request(request_id, owner_id, RequestStatus::Open));

    let result = service
        .assign_to_request(
            Principal::new(Uuid::new_v4(), UserRole::Foodbank),
            donation_id,
            request_id,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    assert_eq!(
        uow.tx().donation(donation_id).unwrap().status,
        DonationStatus::Pending
    );
    assert_eq!(
        uow.tx().request(request_id).unwrap().status,
        RequestStatus::Open
    );
}

#[tokio::test]
async fn matching_missing_donation_is_not_found() {
    let request_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let (service, uow) = tx_service();
    uow.tx()
        .insert_request(test_request(request_id, foodbank_id, RequestStatus::Open));

    let result = service
        .assign_to_request(
            Principal::new(foodbank_id, UserRole::Foodbank),
            Uuid::new_v4(),
            request_id,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
    assert_eq!(
        uow.tx().request(request_id).unwrap().status,
        RequestStatus::Open
    );
}

#[tokio::test]
async fn matching_missing_request_is_not_found() {
    let donation_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let (service, uow) = tx_service();
    uow.tx().insert_donation(test_donation(
        donation_id,
        Uuid::new_v4(),
        foodbank_id,
        DonationStatus::Pending,
    ));

    let result = service
        .assign_to_request(
            Principal::new(foodbank_id, UserRole::Foodbank),
            donation_id,
            Uuid::new_v4(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
    assert_eq!(
        uow.tx().donation(donation_id).unwrap().status,
        DonationStatus::Pending
    );
}

#[tokio::test]
async fn failed_donation_write_rolls_back_the_request() {
    let donation_id = Uuid::new_v4();
    let request_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let (service, uow) = tx_service();
    uow.tx().insert_donation(test_donation(
        donation_id,
        Uuid::new_v4(),
        foodbank_id,
        DonationStatus::Pending,
    ));
    uow.tx()
        .insert_request(test_request(request_id, foodbank_id, RequestStatus::Open));

    // The request write lands first; the donation write then fails and
    // must take the request with it
    uow.tx().fail_donation_writes();

    let result = service
        .assign_to_request(
            Principal::new(foodbank_id, UserRole::Foodbank),
            donation_id,
            request_id,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Internal(_)));
    assert_eq!(
        uow.tx().request(request_id).unwrap().status,
        RequestStatus::Open
    );
    let donation = uow.tx().donation(donation_id).unwrap();
    assert_eq!(donation.status, DonationStatus::Pending);
    assert_eq!(donation.assigned_request_id, None);
}

#[tokio::test]
async fn foodbank_completes_assigned_donation() {
    let donation_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, Uuid::new_v4(), foodbank_id, DonationStatus::Assigned)))
    });
    donations
        .expect_complete()
        .with(eq(donation_id))
        .returning(move |id| {
            Ok(test_donation(id, Uuid::new_v4(), foodbank_id, DonationStatus::Completed))
        });

    let service = service(MockUserRepository::new(), donations);
    let result = service
        .complete_donation(Principal::new(foodbank_id, UserRole::Foodbank), donation_id)
        .await;

    assert_eq!(result.unwrap().status, DonationStatus::Completed);
}

#[tokio::test]
async fn double_completion_is_rejected() {
    let donation_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, Uuid::new_v4(), foodbank_id, DonationStatus::Completed)))
    });

    let service = service(MockUserRepository::new(), donations);
    let result = service
        .complete_donation(Principal::new(foodbank_id, UserRole::Foodbank), donation_id)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
}

#[tokio::test]
async fn donor_cannot_complete_donation() {
    let donation_id = Uuid::new_v4();
    let donor_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, donor_id, Uuid::new_v4(), DonationStatus::Assigned)))
    });

    let service = service(MockUserRepository::new(), donations);
    let result = service
        .complete_donation(Principal::new(donor_id, UserRole::Donor), donation_id)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn update_rejects_zero_quantity() {
    let donation_id = Uuid::new_v4();
    let donor_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, donor_id, Uuid::new_v4(), DonationStatus::Pending)))
    });

    let service = service(MockUserRepository::new(), donations);
    let result = service
        .update_donation(
            Principal::new(donor_id, UserRole::Donor),
            donation_id,
            UpdateDonation {
                category: None,
                quantity: Some(0),
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn owning_donor_deletes_donation() {
    let donation_id = Uuid::new_v4();
    let donor_id = Uuid::new_v4();

    let mut donations = MockDonationRepository::new();
    donations.expect_find_by_id().returning(move |id| {
        Ok(Some(test_donation(id, donor_id, Uuid::new_v4(), DonationStatus::Pending)))
    });
    donations.expect_delete().with(eq(donation_id)).returning(|_| Ok(()));

    let service = service(MockUserRepository::new(), donations);
    let result = service
        .delete_donation(Principal::new(donor_id, UserRole::Donor), donation_id)
        .await;

    assert!(result.is_ok());
}
