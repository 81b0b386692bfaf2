use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use vrm_service::{EnrichedLookup, EnrichmentError};
use vrm_types::{CanonicalVehicleRecord, CheckStatus, DataSource};

/// Query parameters for a vehicle lookup
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LookupParams {
	/// Serve a fresh cached record when available (default true)
	#[serde(default = "default_use_cache")]
	pub use_cache: bool,
	/// Known mileage for the valuation; estimated when omitted
	pub mileage: Option<u32>,
}

fn default_use_cache() -> bool {
	true
}

/// Response body for a vehicle lookup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
	pub plate: String,
	pub status: CheckStatus,
	pub sources: Vec<DataSource>,
	pub warnings: Vec<String>,
	pub from_cache: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cache_id: Option<String>,
	pub checked_at: DateTime<Utc>,
	pub record: CanonicalVehicleRecord,
}

impl From<EnrichedLookup> for LookupResponse {
	fn from(lookup: EnrichedLookup) -> Self {
		Self {
			plate: lookup.record.plate.as_str().to_string(),
			status: lookup.status,
			sources: lookup.sources,
			warnings: lookup.warnings,
			from_cache: lookup.from_cache,
			cache_id: lookup.cache_id,
			checked_at: lookup.checked_at,
			record: lookup.record,
		}
	}
}

/// GET /v1/vehicles/{plate} - Enrichment lookup
pub async fn get_vehicle(
	State(state): State<AppState>,
	Path(plate): Path<String>,
	Query(params): Query<LookupParams>,
) -> Result<Json<LookupResponse>, (StatusCode, Json<ErrorResponse>)> {
	info!(
		"Received lookup request for plate {} (use_cache: {}, mileage: {:?})",
		plate, params.use_cache, params.mileage
	);

	let lookup = state
		.enrichment_service
		.lookup(&plate, params.use_cache, params.mileage)
		.await
		.map_err(|e| match e {
			EnrichmentError::InvalidPlate(plate_error) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse::new(
					"VALIDATION_ERROR",
					format!("Invalid request: {}", plate_error),
				)),
			),
		})?;

	Ok(Json(LookupResponse::from(lookup)))
}

/// DELETE /v1/vehicles/{plate}/cache - Drop the cached record for a plate
pub async fn delete_vehicle_cache(
	State(state): State<AppState>,
	Path(plate): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
	let existed = state
		.enrichment_service
		.clear(&plate)
		.await
		.map_err(|e| match e {
			EnrichmentError::InvalidPlate(plate_error) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse::new(
					"VALIDATION_ERROR",
					format!("Invalid request: {}", plate_error),
				)),
			),
		})?;

	if existed {
		info!("Cleared cached lookup for plate {}", plate);
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err((
			StatusCode::NOT_FOUND,
			Json(ErrorResponse::new(
				"NOT_FOUND",
				format!("No cached lookup for plate {}", plate),
			)),
		))
	}
}
