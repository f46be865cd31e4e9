//! Feedback service unit tests.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use foodbridge::domain::{NewFeedback, Principal, UpdateFeedback, UserRole};
use foodbridge::errors::AppError;
use foodbridge::infra::{
    MockDonationRepository, MockFeedbackRepository, MockRequestRepository, MockUserRepository,
};
use foodbridge::services::{FeedbackManager, FeedbackService};

use common::{test_feedback, test_user, TestUnitOfWork};

fn service(
    users: MockUserRepository,
    feedbacks: MockFeedbackRepository,
) -> FeedbackManager<TestUnitOfWork> {
    let uow = TestUnitOfWork::new(
        users,
        MockDonationRepository::new(),
        MockRequestRepository::new(),
        feedbacks,
    );
    FeedbackManager::new(Arc::new(uow))
}

fn new_feedback(recipient_id: Uuid, foodbank_id: Uuid) -> NewFeedback {
    NewFeedback {
        recipient_id,
        foodbank_id,
        thank_you_note: "Thank you for everything".to_string(),
        rating: 5,
    }
}

#[tokio::test]
async fn recipient_leaves_feedback() {
    let recipient_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(foodbank_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Foodbank))));
    users
        .expect_find_by_id()
        .with(eq(recipient_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Recipient))));

    let mut feedbacks = MockFeedbackRepository::new();
    feedbacks.expect_create().returning(|new| {
        Ok(test_feedback(Uuid::new_v4(), new.recipient_id, new.foodbank_id))
    });

    let service = service(users, feedbacks);
    let result = service
        .create_feedback(
            Principal::new(recipient_id, UserRole::Recipient),
            new_feedback(recipient_id, foodbank_id),
        )
        .await;

    assert_eq!(result.unwrap().recipient_id, recipient_id);
}

#[tokio::test]
async fn recipient_cannot_write_as_someone_else() {
    let service = service(MockUserRepository::new(), MockFeedbackRepository::new());

    let result = service
        .create_feedback(
            Principal::new(Uuid::new_v4(), UserRole::Recipient),
            new_feedback(Uuid::new_v4(), Uuid::new_v4()),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn rating_outside_scale_is_rejected() {
    let recipient_id = Uuid::new_v4();
    let mut input = new_feedback(recipient_id, Uuid::new_v4());
    input.rating = 6;

    let service = service(MockUserRepository::new(), MockFeedbackRepository::new());
    let result = service
        .create_feedback(Principal::new(recipient_id, UserRole::Recipient), input)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn feedback_target_must_be_a_foodbank() {
    let recipient_id = Uuid::new_v4();
    let foodbank_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(foodbank_id))
        .returning(move |id| Ok(Some(test_user(id, UserRole::Donor))));

    let service = service(users, MockFeedbackRepository::new());
    let result = service
        .create_feedback(
            Principal::new(recipient_id, UserRole::Recipient),
            new_feedback(recipient_id, foodbank_id),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn author_updates_own_feedback() {
    let feedback_id = Uuid::new_v4();
    let recipient_id = Uuid::new_v4();

    let mut feedbacks = MockFeedbackRepository::new();
    feedbacks.expect_find_by_id().returning(move |id| {
        Ok(Some(test_feedback(id, recipient_id, Uuid::new_v4())))
    });
    feedbacks.expect_update().returning(move |id, fields| {
        let mut feedback = test_feedback(id, recipient_id, Uuid::new_v4());
        if let Some(rating) = fields.rating {
            feedback.rating = rating;
        }
        Ok(feedback)
    });

    let service = service(MockUserRepository::new(), feedbacks);
    let result = service
        .update_feedback(
            Principal::new(recipient_id, UserRole::Recipient),
            feedback_id,
            UpdateFeedback {
                thank_you_note: None,
                rating: Some(3),
            },
        )
        .await;

    assert_eq!(result.unwrap().rating, 3);
}

#[tokio::test]
async fn non_author_cannot_update_feedback() {
    let feedback_id = Uuid::new_v4();

    let mut feedbacks = MockFeedbackRepository::new();
    feedbacks.expect_find_by_id().returning(move |id| {
        Ok(Some(test_feedback(id, Uuid::new_v4(), Uuid::new_v4())))
    });

    let service = service(MockUserRepository::new(), feedbacks);
    let result = service
        .update_feedback(
            Principal::new(Uuid::new_v4(), UserRole::Recipient),
            feedback_id,
            UpdateFeedback::default(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn admin_deletes_any_feedback() {
    let feedback_id = Uuid::new_v4();

    let mut feedbacks = MockFeedbackRepository::new();
    feedbacks.expect_find_by_id().returning(move |id| {
        Ok(Some(test_feedback(id, Uuid::new_v4(), Uuid::new_v4())))
    });
    feedbacks.expect_delete().with(eq(feedback_id)).returning(|_| Ok(()));

    let service = service(MockUserRepository::new(), feedbacks);
    let result = service
        .delete_feedback(Principal::new(Uuid::new_v4(), UserRole::Admin), feedback_id)
        .await;

    assert!(result.is_ok());
}
