//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and manages transaction lifecycle
//! (begin, commit, rollback). The donation-to-request assignment is the
//! one multi-row mutation in the system and runs through
//! `transaction_serializable`: both rows commit together or neither does.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{donation, request};
use super::repositories::{
    DonationRepository, DonationStore, FeedbackRepository, FeedbackStore, RequestRepository,
    RequestStore, UserRepository, UserStore,
};
use crate::domain::{Donation, DonationRequest};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. The transaction method is generic and keeps this trait
/// out of `dyn` position; services are generic over it instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get donation repository
    fn donations(&self) -> Arc<dyn DonationRepository>;

    /// Get request repository
    fn requests(&self) -> Arc<dyn RequestRepository>;

    /// Get feedback repository
    fn feedbacks(&self) -> Arc<dyn FeedbackRepository>;

    /// Execute a closure within a serializable transaction.
    ///
    /// The transaction is automatically committed on success or rolled
    /// back on error. Serializable isolation: the donation/request
    /// assignment must not interleave with a competing assignment.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Storage a transaction context reads and writes through.
///
/// Production always runs against a live database transaction; the
/// in-memory variant backs service-level tests of the transactional
/// paths.
#[derive(Clone, Copy)]
enum TxBackend<'a> {
    Database(&'a DatabaseTransaction),
    #[cfg(feature = "test-utils")]
    Memory(&'a MemoryTxStore),
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part of
/// the same database transaction.
pub struct TransactionContext<'a> {
    backend: TxBackend<'a>,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self {
            backend: TxBackend::Database(txn),
        }
    }

    /// Build a context over an in-memory store, for exercising
    /// transactional service paths without a database.
    #[cfg(feature = "test-utils")]
    pub fn in_memory(store: &'a MemoryTxStore) -> Self {
        Self {
            backend: TxBackend::Memory(store),
        }
    }

    /// Get donation repository for this transaction
    pub fn donations(&self) -> TxDonationRepository<'a> {
        TxDonationRepository {
            backend: self.backend,
        }
    }

    /// Get request repository for this transaction
    pub fn requests(&self) -> TxRequestRepository<'a> {
        TxRequestRepository {
            backend: self.backend,
        }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    donation_repo: Arc<DonationStore>,
    request_repo: Arc<RequestStore>,
    feedback_repo: Arc<FeedbackStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let donation_repo = Arc::new(DonationStore::new(db.clone()));
        let request_repo = Arc::new(RequestStore::new(db.clone()));
        let feedback_repo = Arc::new(FeedbackStore::new(db.clone()));
        Self {
            db,
            user_repo,
            donation_repo,
            request_repo,
            feedback_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn donations(&self) -> Arc<dyn DonationRepository> {
        self.donation_repo.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.request_repo.clone()
    }

    fn feedbacks(&self) -> Arc<dyn FeedbackRepository> {
        self.feedback_repo.clone()
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                // Rollback on error; both rows stay untouched
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware donation repository.
///
/// Executes all operations within the provided transaction. Borrows the
/// transaction so repository operations cannot outlive it.
pub struct TxDonationRepository<'a> {
    backend: TxBackend<'a>,
}

impl<'a> TxDonationRepository<'a> {
    /// Find active donation by ID (excludes soft-deleted)
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Donation>> {
        match self.backend {
            TxBackend::Database(txn) => {
                let result = donation::Entity::find_by_id(id)
                    .filter(donation::Column::DeletedAt.is_null())
                    .one(txn)
                    .await
                    .map_err(AppError::from)?;

                Ok(result.map(Donation::from))
            }
            #[cfg(feature = "test-utils")]
            TxBackend::Memory(store) => Ok(store.donation(id)),
        }
    }

    /// Persist the assignment side of a matched donation: status and the
    /// fulfilled request link.
    pub async fn store_assignment(&self, updated: &Donation) -> AppResult<Donation> {
        match self.backend {
            TxBackend::Database(txn) => {
                let model = donation::Entity::find_by_id(updated.id)
                    .filter(donation::Column::DeletedAt.is_null())
                    .one(txn)
                    .await?
                    .ok_or(AppError::NotFound)?;

                let mut active: donation::ActiveModel = model.into();
                active.status = Set(updated.status.to_string());
                active.assigned_request_id = Set(updated.assigned_request_id);
                active.updated_at = Set(chrono::Utc::now());

                let model = active.update(txn).await.map_err(AppError::from)?;
                Ok(Donation::from(model))
            }
            #[cfg(feature = "test-utils")]
            TxBackend::Memory(store) => store.store_donation_assignment(updated),
        }
    }
}

/// Transaction-aware request repository.
pub struct TxRequestRepository<'a> {
    backend: TxBackend<'a>,
}

impl<'a> TxRequestRepository<'a> {
    /// Find active request by ID (excludes soft-deleted)
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DonationRequest>> {
        match self.backend {
            TxBackend::Database(txn) => {
                let result = request::Entity::find_by_id(id)
                    .filter(request::Column::DeletedAt.is_null())
                    .one(txn)
                    .await
                    .map_err(AppError::from)?;

                Ok(result.map(DonationRequest::from))
            }
            #[cfg(feature = "test-utils")]
            TxBackend::Memory(store) => Ok(store.request(id)),
        }
    }

    /// Persist the fulfillment side of a matched request.
    pub async fn store_assignment(&self, updated: &DonationRequest) -> AppResult<DonationRequest> {
        match self.backend {
            TxBackend::Database(txn) => {
                let model = request::Entity::find_by_id(updated.id)
                    .filter(request::Column::DeletedAt.is_null())
                    .one(txn)
                    .await?
                    .ok_or(AppError::NotFound)?;

                let mut active: request::ActiveModel = model.into();
                active.status = Set(updated.status.to_string());
                active.updated_at = Set(chrono::Utc::now());

                let model = active.update(txn).await.map_err(AppError::from)?;
                Ok(DonationRequest::from(model))
            }
            #[cfg(feature = "test-utils")]
            TxBackend::Memory(store) => store.store_request_assignment(updated),
        }
    }
}

/// In-memory rows backing a test transaction.
///
/// A test `UnitOfWork` builds a `TransactionContext` over this store and
/// emulates commit/rollback with [`MemoryTxStore::snapshot`] and
/// [`MemoryTxStore::restore`]. Write failures can be injected to drive
/// the rollback path.
#[cfg(feature = "test-utils")]
#[derive(Default)]
pub struct MemoryTxStore {
    donations: std::sync::Mutex<std::collections::HashMap<Uuid, Donation>>,
    requests: std::sync::Mutex<std::collections::HashMap<Uuid, DonationRequest>>,
    donation_write_failure: std::sync::atomic::AtomicBool,
}

/// Copy of the store contents taken before a test transaction runs.
#[cfg(feature = "test-utils")]
pub struct TxSnapshot {
    donations: std::collections::HashMap<Uuid, Donation>,
    requests: std::collections::HashMap<Uuid, DonationRequest>,
}

#[cfg(feature = "test-utils")]
impl MemoryTxStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_donation(&self, donation: Donation) {
        self.donations.lock().unwrap().insert(donation.id, donation);
    }

    pub fn insert_request(&self, request: DonationRequest) {
        self.requests.lock().unwrap().insert(request.id, request);
    }

    /// Active donation by ID, if present
    pub fn donation(&self, id: Uuid) -> Option<Donation> {
        self.donations
            .lock()
            .unwrap()
            .get(&id)
            .filter(|d| d.deleted_at.is_none())
            .cloned()
    }

    /// Active request by ID, if present
    pub fn request(&self, id: Uuid) -> Option<DonationRequest> {
        self.requests
            .lock()
            .unwrap()
            .get(&id)
            .filter(|r| r.deleted_at.is_none())
            .cloned()
    }

    /// Make every subsequent donation write fail, simulating a mid-
    /// transaction storage error.
    pub fn fail_donation_writes(&self) {
        self.donation_write_failure
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> TxSnapshot {
        TxSnapshot {
            donations: self.donations.lock().unwrap().clone(),
            requests: self.requests.lock().unwrap().clone(),
        }
    }

    pub fn restore(&self, snapshot: TxSnapshot) {
        *self.donations.lock().unwrap() = snapshot.donations;
        *self.requests.lock().unwrap() = snapshot.requests;
    }

    fn store_donation_assignment(&self, updated: &Donation) -> AppResult<Donation> {
        if self
            .donation_write_failure
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(AppError::internal("Donation write failed"));
        }

        let mut donations = self.donations.lock().unwrap();
        let row = donations
            .get_mut(&updated.id)
            .filter(|d| d.deleted_at.is_none())
            .ok_or(AppError::NotFound)?;

        row.status = updated.status;
        row.assigned_request_id = updated.assigned_request_id;
        row.updated_at = chrono::Utc::now();
        Ok(row.clone())
    }

    fn store_request_assignment(&self, updated: &DonationRequest) -> AppResult<DonationRequest> {
        let mut requests = self.requests.lock().unwrap();
        let row = requests
            .get_mut(&updated.id)
            .filter(|r| r.deleted_at.is_none())
            .ok_or(AppError::NotFound)?;

        row.status = updated.status;
        row.updated_at = chrono::Utc::now();
        Ok(row.clone())
    }
}
