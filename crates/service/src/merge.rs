//! Payload reconciliation
//!
//! Pure, deterministic merge of the two provider payloads into one
//! canonical record. Where both providers define a field the spec/history
//! value wins; there is no averaging and no per-field recency, so the same
//! inputs always produce the same record. Fields defined by neither input
//! stay absent, with one named exception: zero-emission vehicles get an
//! explicit zero CO2 / zero tax fallback.

use vrm_types::{
	CanonicalVehicleRecord, FuelEconomy, MileageReading, MotTest, Plate, Sourced, SpecPayload,
	ValuationFigures, ValuationPayload,
};

/// Merge at most one spec/history payload and at most one valuation payload
/// into a canonical record.
///
/// Both payloads absent yields a structurally valid, entirely-absent record;
/// deciding whether that constitutes an overall failure is the caller's
/// concern.
pub fn merge_payloads(
	plate: Plate,
	spec: Option<&SpecPayload>,
	valuation: Option<&ValuationPayload>,
) -> CanonicalVehicleRecord {
	let mut record = CanonicalVehicleRecord::empty(plate);

	let details = spec.and_then(|s| s.details.as_ref());
	let history = spec.and_then(|s| s.history.as_ref());
	let mot = spec.and_then(|s| s.mot.as_ref());

	record.make = pick(
		details.and_then(|d| d.make.as_ref()),
		valuation.and_then(|v| v.make.as_ref()),
	);
	record.model = pick(
		details.and_then(|d| d.model.as_ref()),
		valuation.and_then(|v| v.model.as_ref()),
	);
	record.variant = details
		.and_then(|d| d.variant.clone())
		.map(Sourced::spec);
	record.colour = pick(
		details.and_then(|d| d.colour.as_ref()),
		valuation.and_then(|v| v.colour.as_ref()),
	);
	record.body_type = details
		.and_then(|d| d.body_style.clone())
		.map(Sourced::spec);
	record.year_of_manufacture = details
		.and_then(|d| d.year_of_manufacture)
		.map(Sourced::spec);

	record.fuel_type = pick(
		details.and_then(|d| d.fuel_type.as_ref()),
		valuation.and_then(|v| v.fuel_type.as_ref()),
	);
	record.transmission = details
		.and_then(|d| d.transmission.clone())
		.map(Sourced::spec);
	record.engine_size_cc = details
		.and_then(|d| d.engine_capacity_cc)
		.map(Sourced::spec);

	record.door_count = details.and_then(|d| d.doors).map(Sourced::spec);
	record.seat_count = details.and_then(|d| d.seats).map(Sourced::spec);

	record.co2_emissions = details.and_then(|d| d.co2_g_km).map(Sourced::spec);
	record.annual_tax = details.and_then(|d| d.annual_ved_gbp).map(Sourced::spec);
	record.insurance_group = details
		.and_then(|d| d.insurance_group.clone())
		.map(Sourced::spec);

	record.fuel_economy = details.and_then(|d| {
		let economy = FuelEconomy {
			urban_mpg: d.mpg_urban,
			extra_urban_mpg: d.mpg_extra_urban,
			combined_mpg: d.mpg_combined,
		};
		if economy.is_empty() {
			None
		} else {
			Some(Sourced::spec(economy))
		}
	});

	record.valuation = valuation.map(|v| {
		Sourced::valuation(ValuationFigures {
			private_sale: v.estimated_value.private_sale,
			retail: v.estimated_value.retail,
			trade: v.estimated_value.trade,
			confidence: v.confidence,
		})
	});

	record.mot_history = mot.map(|m| {
		Sourced::spec(
			m.tests
				.iter()
				.map(|t| MotTest {
					completed_date: t.completed_date,
					result: t.result.clone(),
					expiry_date: t.expiry_date,
					odometer_miles: t.odometer_miles,
					advisories: t.advisories.clone(),
				})
				.collect::<Vec<_>>(),
		)
	});

	record.mileage_history = build_mileage_history(spec).map(Sourced::spec);

	record.previous_owners = history
		.and_then(|h| h.previous_keepers)
		.map(Sourced::spec);
	record.written_off = history.and_then(|h| h.written_off).map(Sourced::spec);
	record.scrapped = history.and_then(|h| h.scrapped).map(Sourced::spec);
	record.stolen = history.and_then(|h| h.stolen).map(Sourced::spec);
	record.outstanding_finance = history
		.and_then(|h| h.outstanding_finance)
		.map(Sourced::spec);

	apply_zero_emission_defaults(&mut record);

	record
}

/// Spec/history wins over valuation wherever both define a field
fn pick<T: Clone>(spec_value: Option<&T>, valuation_value: Option<&T>) -> Option<Sourced<T>> {
	spec_value
		.cloned()
		.map(Sourced::spec)
		.or_else(|| valuation_value.cloned().map(Sourced::valuation))
}

/// Collect every dated odometer reading the spec payload carries: keeper
/// changes with a recorded mileage plus MOT test readings, oldest first.
fn build_mileage_history(spec: Option<&SpecPayload>) -> Option<Vec<MileageReading>> {
	let spec = spec?;
	let mut readings = Vec::new();

	if let Some(history) = &spec.history {
		for change in &history.keeper_changes {
			if let Some(mileage) = change.mileage {
				readings.push(MileageReading {
					recorded_at: change.date,
					mileage,
				});
			}
		}
	}

	if let Some(mot) = &spec.mot {
		for test in &mot.tests {
			if let Some(mileage) = test.odometer_miles {
				readings.push(MileageReading {
					recorded_at: test.completed_date,
					mileage,
				});
			}
		}
	}

	if readings.is_empty() {
		return None;
	}

	readings.sort_by_key(|r| r.recorded_at);
	Some(readings)
}

/// Zero-emission vehicles pay no vehicle excise duty and emit no CO2; when
/// neither provider states either figure for an electric vehicle, both are
/// populated as zero and tagged as rule-derived.
fn apply_zero_emission_defaults(record: &mut CanonicalVehicleRecord) {
	let is_electric = record
		.fuel_type
		.as_ref()
		.map(|f| f.value.eq_ignore_ascii_case("electric"))
		.unwrap_or(false);

	if !is_electric {
		return;
	}

	if record.co2_emissions.is_none() {
		record.co2_emissions = Some(Sourced::derived(0));
	}
	if record.annual_tax.is_none() {
		record.annual_tax = Some(Sourced::derived(0));
	}
}
