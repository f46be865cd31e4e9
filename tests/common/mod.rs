//! Shared test fixtures.
//!
//! Provides a `TestUnitOfWork` wrapping mock repositories, plus entity
//! builders used across the service test suites.

// Not every test binary uses every fixture
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use foodbridge::domain::{
    Donation, DonationRequest, DonationStatus, Feedback, Principal, RequestStatus, User, UserRole,
};
use foodbridge::errors::AppResult;
use foodbridge::infra::{
    DonationRepository, FeedbackRepository, MemoryTxStore, MockDonationRepository,
    MockFeedbackRepository, MockRequestRepository, MockUserRepository, RequestRepository,
    TransactionContext, UnitOfWork, UserRepository,
};

/// Unit of Work backed by mock repositories.
///
/// Transactional operations run against an in-memory row store, with
/// snapshot/restore standing in for commit/rollback: an error from the
/// closure leaves the store exactly as it was.
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    donations: Arc<MockDonationRepository>,
    requests: Arc<MockRequestRepository>,
    feedbacks: Arc<MockFeedbackRepository>,
    tx: MemoryTxStore,
}

impl TestUnitOfWork {
    pub fn new(
        users: MockUserRepository,
        donations: MockDonationRepository,
        requests: MockRequestRepository,
        feedbacks: MockFeedbackRepository,
    ) -> Self {
        Self {
            users: Arc::new(users),
            donations: Arc::new(donations),
            requests: Arc::new(requests),
            feedbacks: Arc::new(feedbacks),
            tx: MemoryTxStore::new(),
        }
    }

    /// Rows visible to transactional operations; seed and inspect from
    /// tests.
    pub fn tx(&self) -> &MemoryTxStore {
        &self.tx
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn donations(&self) -> Arc<dyn DonationRepository> {
        self.donations.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.requests.clone()
    }

    fn feedbacks(&self) -> Arc<dyn FeedbackRepository> {
        self.feedbacks.clone()
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let snapshot = self.tx.snapshot();
        match f(TransactionContext::in_memory(&self.tx)).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.tx.restore(snapshot);
                Err(e)
            }
        }
    }
}

pub fn principal(role: UserRole) -> Principal {
    Principal::new(Uuid::new_v4(), role)
}

pub fn test_user(id: Uuid, role: UserRole) -> User {
    User {
        id,
        email: format!("{}@example.com", id.simple()),
        password_hash: "hashed".to_string(),
        name: "Test User".to_string(),
        role,
        phone: None,
        address: None,
        organization_name: None,
        recipient_type: None,
        donor_type: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

pub fn test_donation(id: Uuid, donor_id: Uuid, foodbank_id: Uuid, status: DonationStatus) -> Donation {
    Donation {
        id,
        donor_id,
        foodbank_id,
        recipient_id: None,
        category: "food".to_string(),
        quantity: 10,
        status,
        assigned_request_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

pub fn test_request(id: Uuid, foodbank_id: Uuid, status: RequestStatus) -> DonationRequest {
    DonationRequest {
        id,
        foodbank_id,
        category: "food".to_string(),
        quantity: 10,
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

pub fn test_feedback(id: Uuid, recipient_id: Uuid, foodbank_id: Uuid) -> Feedback {
    Feedback {
        id,
        recipient_id,
        foodbank_id,
        thank_you_note: "Thank you for the support".to_string(),
        rating: 5,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}
