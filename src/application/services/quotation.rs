//! # Quotation Issuance Controller
//!
//! Turns a priced selection into a binding, time-limited [`Quote`].
//!
//! Issuance requires a credential. The controller checks for one before
//! any I/O, so an unauthenticated caller never creates a remote quote.
//! Every successful call creates a new quote on the server; callers must
//! not submit twice while a call is in flight.

use crate::domain::entities::{Quote, Selection};
use crate::infrastructure::remote::credentials::CredentialProvider;
use crate::infrastructure::remote::error::{ServiceError, ServiceResult};
use crate::infrastructure::remote::traits::RemoteService;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Quotation issuance controller.
#[derive(Debug, Clone)]
pub struct QuotationController {
    remote: Arc<dyn RemoteService>,
    credentials: Arc<dyn CredentialProvider>,
}

impl QuotationController {
    /// Creates a new controller.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            remote,
            credentials,
        }
    }

    /// Issues a quote for `selection`.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Unauthenticated` if no credential is available; no
    ///   request is sent
    /// - `ServiceError::InvalidResponse` if the server returns an invalid quote
    /// - Any other `ServiceError` from the remote service, unchanged
    pub async fn issue_quote(&self, selection: &Selection) -> ServiceResult<Quote> {
        if !self.credentials.is_authenticated() {
            debug!(vehicle_id = %selection.vehicle().id(), "quote issuance needs sign-in");
            return Err(ServiceError::Unauthenticated);
        }

        let quote = self.remote.issue_quote(&selection.to_request()).await?;
        if !quote.is_valid() {
            warn!(quote_id = %quote.id(), "server issued a quote that is not valid");
            return Err(ServiceError::invalid_response(format!(
                "issued quote {} is not valid",
                quote.id()
            )));
        }

        info!(
            quote_id = %quote.id(),
            final_amount = %quote.final_amount(),
            "quote issued"
        );
        Ok(quote)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{Accessory, Vehicle};
    use crate::domain::value_objects::{AccessoryId, Money, VehicleId, VehicleStatus};
    use crate::infrastructure::remote::credentials::{AccessToken, SessionCredentials};
    use crate::infrastructure::remote::in_memory::InMemoryRemoteService;

    struct Fixture {
        service: InMemoryRemoteService,
        session: SessionCredentials,
        controller: QuotationController,
        selection: Selection,
    }

    fn fixture() -> Fixture {
        let vehicle = Vehicle::new(
            VehicleId::new_v4(),
            "Corolla",
            "Toyota",
            Money::from_units(20000),
            VehicleStatus::Available,
        );
        let accessory = Accessory::new(AccessoryId::new_v4(), "Roof rack", Money::from_units(500));
        let session = SessionCredentials::with_token(AccessToken::new("buyer-1"));
        let service = InMemoryRemoteService::new(
            vec![vehicle.clone()],
            vec![accessory.clone()],
            Arc::new(session.clone()),
        );
        let controller =
            QuotationController::new(Arc::new(service.clone()), Arc::new(session.clone()));
        let mut selection = Selection::new(vehicle);
        selection.toggle_accessory(accessory.id());
        Fixture {
            service,
            session,
            controller,
            selection,
        }
    }

    #[tokio::test]
    async fn issues_valid_quote() {
        let f = fixture();
        let quote = f.controller.issue_quote(&f.selection).await.unwrap();

        assert!(quote.is_valid());
        assert_eq!(quote.final_amount(), Money::from_units(20500));
        assert_eq!(f.service.quote_count().await, 1);
    }

    #[tokio::test]
    async fn unauthenticated_sends_nothing() {
        let f = fixture();
        f.session.sign_out();

        let err = f.controller.issue_quote(&f.selection).await.unwrap_err();

        assert!(err.is_unauthenticated());
        assert_eq!(f.service.total_calls(), 0);
        assert_eq!(f.service.quote_count().await, 0);
    }

    #[tokio::test]
    async fn each_call_creates_a_new_quote() {
        let f = fixture();
        let first = f.controller.issue_quote(&f.selection).await.unwrap();
        let second = f.controller.issue_quote(&f.selection).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(f.service.quote_count().await, 2);
    }

    #[tokio::test]
    async fn remote_rejection_is_passed_through() {
        let f = fixture();
        f.service
            .fail_next("issue_quote", ServiceError::rejected(400, "vehicle not available"));

        let err = f.controller.issue_quote(&f.selection).await.unwrap_err();
        assert_eq!(err.message(), "vehicle not available");
    }
}
