use crate::directions::{Step, TransitDetails};
use crate::error::AggregateError;
use crate::models::TransitStep;

/// Collects the public-transit segments of a leg in document order.
///
/// Steps are visited depth-first, each step before its own sub-steps, so a
/// walking step that wraps several rides yields those rides where it sits.
/// A ride whose details lack a required field fails the whole walk.
pub fn extract_transit_details(steps: &[Step]) -> Result<Vec<TransitStep>, AggregateError> {
    let mut out = Vec::new();
    collect(steps, &mut out)?;
    Ok(out)
}

fn collect(steps: &[Step], out: &mut Vec<TransitStep>) -> Result<(), AggregateError> {
    for step in steps {
        if let Some(details) = step.transit() {
            out.push(to_transit_step(&details?));
        }
        collect(&step.steps, out)?;
    }
    Ok(())
}

fn to_transit_step(details: &TransitDetails) -> TransitStep {
    TransitStep {
        line: details.line.display_name().to_string(),
        vehicle: details.line.vehicle.name.clone(),
        departure: details.departure_stop.name.clone(),
        arrival: details.arrival_stop.name.clone(),
        num_stops: details.num_stops,
    }
}
