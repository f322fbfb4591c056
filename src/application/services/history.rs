//! # History Service
//!
//! The caller's past quotes and reservations, newest first. Both reads
//! require a credential.

use crate::domain::entities::{Quote, Reservation};
use crate::infrastructure::remote::error::ServiceResult;
use crate::infrastructure::remote::traits::RemoteService;
use std::sync::Arc;

/// Reads the caller's history.
#[derive(Debug, Clone)]
pub struct HistoryService {
    remote: Arc<dyn RemoteService>,
}

impl HistoryService {
    /// Creates a new service.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self { remote }
    }

    /// Lists the caller's quotes.
    ///
    /// # Errors
    ///
    /// `ServiceError::Unauthenticated` without a credential, or any other
    /// `ServiceError` from the remote service.
    pub async fn my_quotes(&self) -> ServiceResult<Vec<Quote>> {
        self.remote.list_quotes().await
    }

    /// Lists the caller's reservations.
    ///
    /// # Errors
    ///
    /// `ServiceError::Unauthenticated` without a credential, or any other
    /// `ServiceError` from the remote service.
    pub async fn my_reservations(&self) -> ServiceResult<Vec<Reservation>> {
        self.remote.list_reservations().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{Selection, Vehicle};
    use crate::domain::value_objects::{Money, VehicleId, VehicleStatus};
    use crate::infrastructure::remote::credentials::{AccessToken, SessionCredentials};
    use crate::infrastructure::remote::in_memory::InMemoryRemoteService;

    #[tokio::test]
    async fn quotes_are_newest_first() {
        let vehicle = Vehicle::new(
            VehicleId::new_v4(),
            "Corolla",
            "Toyota",
            Money::from_units(20000),
            VehicleStatus::Available,
        );
        let session = SessionCredentials::with_token(AccessToken::new("buyer-1"));
        let remote =
            InMemoryRemoteService::new(vec![vehicle.clone()], Vec::new(), Arc::new(session));
        let request = Selection::new(vehicle).to_request();
        let older = remote.issue_quote(&request).await.unwrap();
        let newer = remote.issue_quote(&request).await.unwrap();

        let quotes = HistoryService::new(Arc::new(remote)).my_quotes().await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].id(), newer.id());
        assert_eq!(quotes[1].id(), older.id());
        assert!(!quotes[1].is_valid());
    }

    #[tokio::test]
    async fn reservations_need_credential() {
        let remote =
            InMemoryRemoteService::new(Vec::new(), Vec::new(), Arc::new(SessionCredentials::new()));
        let err = HistoryService::new(Arc::new(remote))
            .my_reservations()
            .await
            .unwrap_err();
        assert!(err.is_unauthenticated());
    }
}
