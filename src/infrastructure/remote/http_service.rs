//! # HTTP Remote Service
//!
//! [`RemoteService`] implementation over the dealership's REST API.

use crate::config::ClientConfig;
use crate::domain::entities::{Accessory, Quote, Reservation, SimulationRequest, Vehicle};
use crate::domain::value_objects::{QuoteId, ReservationId, VehicleStatus};
use crate::infrastructure::remote::credentials::CredentialProvider;
use crate::infrastructure::remote::dto::{
    AccessoryDto, CancelDto, CreateReservationPayload, QuoteDto, ReservationDto,
    SelectionPayload, SimulationDto, VehicleDto,
};
use crate::infrastructure::remote::error::ServiceResult;
use crate::infrastructure::remote::http_client::HttpClient;
use crate::infrastructure::remote::operation::Operation;
use crate::infrastructure::remote::traits::{CancellationReceipt, PriceBreakdown, RemoteService};
use async_trait::async_trait;
use std::sync::Arc;

/// Remote service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemoteService {
    client: HttpClient,
}

impl HttpRemoteService {
    /// Wraps an existing client.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Builds the client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the client cannot be created.
    pub fn from_config(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ServiceResult<Self> {
        HttpClient::new(config, credentials).map(Self::new)
    }

    /// Returns the underlying client.
    #[inline]
    #[must_use]
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> ServiceResult<Vec<Vehicle>> {
        let vehicles: Vec<VehicleDto> = self
            .client
            .fetch_all(&Operation::ListVehicles { status })
            .await?;
        vehicles.into_iter().map(Vehicle::try_from).collect()
    }

    async fn list_accessories(&self) -> ServiceResult<Vec<Accessory>> {
        let accessories: Vec<AccessoryDto> =
            self.client.fetch_all(&Operation::ListAccessories).await?;
        Ok(accessories.into_iter().map(Accessory::from).collect())
    }

    async fn simulate(&self, request: &SimulationRequest) -> ServiceResult<PriceBreakdown> {
        let dto: SimulationDto = self
            .client
            .send(&Operation::Simulate, &SelectionPayload::from(request))
            .await?;
        Ok(dto.into())
    }

    async fn issue_quote(&self, request: &SimulationRequest) -> ServiceResult<Quote> {
        let dto: QuoteDto = self
            .client
            .send(&Operation::IssueQuote, &SelectionPayload::from(request))
            .await?;
        Ok(dto.into())
    }

    async fn create_reservation(&self, quote_id: &QuoteId) -> ServiceResult<Reservation> {
        let payload = CreateReservationPayload {
            cotizacion_id: *quote_id,
        };
        let dto: ReservationDto = self
            .client
            .send(&Operation::CreateReservation, &payload)
            .await?;
        Reservation::try_from(dto)
    }

    async fn cancel_reservation(&self, id: &ReservationId) -> ServiceResult<CancellationReceipt> {
        let dto: CancelDto = self
            .client
            .fetch(&Operation::CancelReservation { id: *id })
            .await?;
        Ok(CancellationReceipt {
            message: dto.status,
        })
    }

    async fn list_quotes(&self) -> ServiceResult<Vec<Quote>> {
        let quotes: Vec<QuoteDto> = self.client.fetch_all(&Operation::ListQuotes).await?;
        Ok(quotes.into_iter().map(Quote::from).collect())
    }

    async fn list_reservations(&self) -> ServiceResult<Vec<Reservation>> {
        let reservations: Vec<ReservationDto> =
            self.client.fetch_all(&Operation::ListReservations).await?;
        reservations
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }
}
