//! # Wire Types
//!
//! JSON shapes of the dealership API and their conversion into domain
//! entities.
//!
//! Field names follow the remote contract. Decimal amounts arrive as strings
//! (`"20000.00"`) or numbers; both are accepted. Any body that cannot be
//! turned into a domain entity yields `ServiceError::InvalidResponse`.

use crate::domain::entities::simulation::LineItem;
use crate::domain::entities::{Accessory, Quote, Reservation, SimulationRequest, Vehicle};
use crate::domain::value_objects::{
    AccessoryId, Money, QuoteId, ReservationId, ReservationStatus, Timestamp, VehicleId,
    VehicleStatus,
};
use crate::infrastructure::remote::error::{ServiceError, ServiceResult};
use crate::infrastructure::remote::traits::PriceBreakdown;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maps a vehicle status to its wire value.
#[must_use]
pub const fn vehicle_status_to_wire(status: VehicleStatus) -> &'static str {
    match status {
        VehicleStatus::Available => "DISPONIBLE",
        VehicleStatus::Reserved => "RESERVADO",
        VehicleStatus::Sold => "VENDIDO",
        VehicleStatus::Disabled => "DESHABILITADO",
    }
}

/// Parses a vehicle status from its wire value.
///
/// # Errors
///
/// Returns `ServiceError::InvalidResponse` for unknown values.
pub fn vehicle_status_from_wire(value: &str) -> ServiceResult<VehicleStatus> {
    match value {
        "DISPONIBLE" => Ok(VehicleStatus::Available),
        "RESERVADO" => Ok(VehicleStatus::Reserved),
        "VENDIDO" => Ok(VehicleStatus::Sold),
        "DESHABILITADO" => Ok(VehicleStatus::Disabled),
        other => Err(ServiceError::invalid_response(format!(
            "unknown vehicle status {other:?}"
        ))),
    }
}

/// Maps a reservation status to its wire value.
#[must_use]
pub const fn reservation_status_to_wire(status: ReservationStatus) -> &'static str {
    match status {
        ReservationStatus::Active => "ACTIVA",
        ReservationStatus::Cancelled => "CANCELADA",
        ReservationStatus::Expired => "VENCIDA",
        ReservationStatus::Completed => "COMPLETADA",
    }
}

/// Parses a reservation status from its wire value.
///
/// # Errors
///
/// Returns `ServiceError::InvalidResponse` for unknown values.
pub fn reservation_status_from_wire(value: &str) -> ServiceResult<ReservationStatus> {
    match value {
        "ACTIVA" => Ok(ReservationStatus::Active),
        "CANCELADA" => Ok(ReservationStatus::Cancelled),
        "VENCIDA" => Ok(ReservationStatus::Expired),
        "COMPLETADA" => Ok(ReservationStatus::Completed),
        other => Err(ServiceError::invalid_response(format!(
            "unknown reservation status {other:?}"
        ))),
    }
}

/// A list endpoint answer: either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// `[...]`
    Plain(Vec<T>),
    /// `{"count": n, "next": url, "results": [...]}`
    Paged {
        /// Items of this page.
        results: Vec<T>,
        /// Link to the following page; absent or null on the last one.
        #[serde(default)]
        next: Option<String>,
    },
}

impl<T> Listing<T> {
    /// Splits the answer into this page's items and the next page link.
    #[must_use]
    pub fn into_page(self) -> (Vec<T>, Option<String>) {
        match self {
            Self::Plain(items) => (items, None),
            Self::Paged { results, next } => (results, next.filter(|link| !link.is_empty())),
        }
    }
}

/// Catalog vehicle.
#[derive(Debug, Deserialize)]
pub struct VehicleDto {
    /// Identifier.
    pub id: VehicleId,
    /// List price.
    pub precio: Money,
    /// Model year.
    #[serde(default)]
    pub anio: Option<u16>,
    /// Availability, wire-encoded.
    #[serde(default)]
    pub estado: Option<String>,
    /// Model name.
    #[serde(default)]
    pub modelo_nombre: Option<String>,
    /// Brand name.
    #[serde(default)]
    pub marca_nombre: Option<String>,
}

impl TryFrom<VehicleDto> for Vehicle {
    type Error = ServiceError;

    fn try_from(dto: VehicleDto) -> Result<Self, Self::Error> {
        let status = match dto.estado.as_deref() {
            Some(value) => vehicle_status_from_wire(value)?,
            None => VehicleStatus::default(),
        };
        let vehicle = Vehicle::new(
            dto.id,
            dto.modelo_nombre.unwrap_or_default(),
            dto.marca_nombre.unwrap_or_default(),
            dto.precio,
            status,
        );
        Ok(match dto.anio {
            Some(year) => vehicle.with_year(year),
            None => vehicle,
        })
    }
}

/// Catalog accessory.
#[derive(Debug, Deserialize)]
pub struct AccessoryDto {
    /// Identifier.
    pub id: AccessoryId,
    /// Name.
    pub nombre: String,
    /// Unit price; absent on some catalog records.
    #[serde(default)]
    pub precio: Money,
    /// Description.
    #[serde(default)]
    pub descripcion: Option<String>,
}

impl From<AccessoryDto> for Accessory {
    fn from(dto: AccessoryDto) -> Self {
        let accessory = Accessory::new(dto.id, dto.nombre, dto.precio);
        match dto.descripcion.filter(|d| !d.is_empty()) {
            Some(description) => accessory.with_description(description),
            None => accessory,
        }
    }
}

/// Body of the simulate and issue-quote calls.
#[derive(Debug, Serialize)]
pub struct SelectionPayload {
    /// Priced vehicles; this client always sends exactly one.
    pub vehiculos: Vec<SelectedVehiclePayload>,
}

/// One vehicle with its accessories.
#[derive(Debug, Serialize)]
pub struct SelectedVehiclePayload {
    /// Vehicle to price.
    pub vehiculo_id: VehicleId,
    /// Accessories, in selection order.
    pub accesorios: Vec<AccessoryId>,
}

impl From<&SimulationRequest> for SelectionPayload {
    fn from(request: &SimulationRequest) -> Self {
        Self {
            vehiculos: vec![SelectedVehiclePayload {
                vehiculo_id: request.vehicle_id,
                accesorios: request.accessory_ids.as_slice().to_vec(),
            }],
        }
    }
}

/// Answer of the simulate call.
#[derive(Debug, Deserialize)]
pub struct SimulationDto {
    /// Total computed by the server.
    pub importe_total: Money,
    /// Per-vehicle breakdown.
    pub detalle: Vec<SimulationDetailDto>,
}

/// Breakdown of one vehicle.
#[derive(Debug, Deserialize)]
pub struct SimulationDetailDto {
    /// The vehicle line.
    pub vehiculo: PricedItemDto,
    /// Accessory lines.
    #[serde(default)]
    pub accesorios: Vec<PricedItemDto>,
}

/// A priced item of a simulation breakdown.
#[derive(Debug, Deserialize)]
pub struct PricedItemDto {
    /// Item identifier.
    pub id: Uuid,
    /// Vehicle model label.
    #[serde(default)]
    pub modelo: Option<String>,
    /// Accessory name.
    #[serde(default)]
    pub nombre: Option<String>,
    /// Price applied.
    pub precio: Money,
}

impl PricedItemDto {
    fn label(&self) -> String {
        self.nombre
            .clone()
            .or_else(|| self.modelo.clone())
            .unwrap_or_else(|| self.id.simple().to_string())
    }
}

impl From<SimulationDto> for PriceBreakdown {
    fn from(dto: SimulationDto) -> Self {
        let mut lines = Vec::new();
        for detail in dto.detalle {
            let label = detail.vehiculo.label();
            lines.push(LineItem::vehicle(
                VehicleId::new(detail.vehiculo.id),
                label,
                detail.vehiculo.precio,
            ));
            for accessory in detail.accesorios {
                let label = accessory.label();
                lines.push(LineItem::accessory(
                    AccessoryId::new(accessory.id),
                    label,
                    accessory.precio,
                ));
            }
        }
        PriceBreakdown {
            total: dto.importe_total,
            lines,
        }
    }
}

/// Issued quote.
#[derive(Debug, Deserialize)]
pub struct QuoteDto {
    /// Identifier.
    pub id: QuoteId,
    /// Issuance time.
    pub fecha_hora_generada: Timestamp,
    /// Committed amount.
    pub importe_final: Money,
    /// Validity flag.
    pub valida: bool,
    /// Expiry.
    #[serde(default)]
    pub fecha_hora_vencimiento: Option<Timestamp>,
    /// Vehicle lines.
    #[serde(default)]
    pub vehiculos: Vec<QuoteVehicleDto>,
    /// Accessory lines.
    #[serde(default)]
    pub accesorios: Vec<QuoteAccessoryDto>,
}

/// Vehicle line of a quote.
#[derive(Debug, Deserialize)]
pub struct QuoteVehicleDto {
    /// Quoted vehicle.
    pub vehiculo: VehicleId,
    /// Embedded vehicle record.
    #[serde(default)]
    pub vehiculo_detalle: Option<VehicleDto>,
    /// Unit price at issuance.
    pub precio_unitario: Money,
}

/// Accessory line of a quote.
#[derive(Debug, Deserialize)]
pub struct QuoteAccessoryDto {
    /// Quoted accessory.
    pub accesorio: AccessoryId,
    /// Embedded accessory record.
    #[serde(default)]
    pub accesorio_detalle: Option<AccessoryDto>,
    /// Unit price at issuance.
    pub precio_unitario: Money,
}

impl From<QuoteDto> for Quote {
    fn from(dto: QuoteDto) -> Self {
        let vehicle_lines = dto.vehiculos.into_iter().map(|line| {
            let label = line
                .vehiculo_detalle
                .and_then(|v| v.modelo_nombre)
                .unwrap_or_else(|| line.vehiculo.short());
            LineItem::vehicle(line.vehiculo, label, line.precio_unitario)
        });
        let accessory_lines = dto.accesorios.into_iter().map(|line| {
            let label = line
                .accesorio_detalle
                .map(|a| a.nombre)
                .unwrap_or_else(|| line.accesorio.short());
            LineItem::accessory(line.accesorio, label, line.precio_unitario)
        });

        let builder = Quote::builder(dto.id, dto.importe_final)
            .created_at(dto.fecha_hora_generada)
            .valid(dto.valida)
            .lines(vehicle_lines.chain(accessory_lines).collect());
        match dto.fecha_hora_vencimiento {
            Some(expires_at) => builder.expires_at(expires_at).build(),
            None => builder.build(),
        }
    }
}

/// Body of the create-reservation call.
#[derive(Debug, Serialize)]
pub struct CreateReservationPayload {
    /// Quote to consume.
    pub cotizacion_id: QuoteId,
}

/// Deposit payment embedded in a reservation.
#[derive(Debug, Deserialize)]
pub struct PaymentDto {
    /// External payment reference.
    pub nro_pago: String,
}

/// Reservation record.
#[derive(Debug, Deserialize)]
pub struct ReservationDto {
    /// Identifier.
    pub id: ReservationId,
    /// Human-facing number.
    pub nro_reserva: String,
    /// Creation time.
    pub fecha_hora_generada: Timestamp,
    /// Status, wire-encoded.
    pub estado: String,
    /// Deposit charged.
    pub importe: Money,
    /// Hold expiry.
    pub fecha_hora_vencimiento: Timestamp,
    /// Consumed quote.
    pub cotizacion: QuoteId,
    /// Embedded payment.
    #[serde(default)]
    pub pago_detalle: Option<PaymentDto>,
}

impl TryFrom<ReservationDto> for Reservation {
    type Error = ServiceError;

    fn try_from(dto: ReservationDto) -> Result<Self, Self::Error> {
        let builder = Reservation::builder(dto.id, dto.cotizacion)
            .number(dto.nro_reserva)
            .status(reservation_status_from_wire(&dto.estado)?)
            .deposit(dto.importe)
            .created_at(dto.fecha_hora_generada)
            .expires_at(dto.fecha_hora_vencimiento);
        Ok(match dto.pago_detalle {
            Some(payment) => builder.payment_number(payment.nro_pago).build(),
            None => builder.build(),
        })
    }
}

/// Answer of the cancel call.
#[derive(Debug, Deserialize)]
pub struct CancelDto {
    /// Human-readable outcome.
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body. The server uses `error`, `detail` or field lists.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBodyDto {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    non_field_errors: Vec<String>,
}

impl ErrorBodyDto {
    /// Extracts the server message from a raw error body, if any.
    #[must_use]
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        parsed
            .error
            .or(parsed.detail)
            .or_else(|| parsed.non_field_errors.into_iter().next())
    }
}
