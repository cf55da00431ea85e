//! Sizing through its JSON wire format, the way a caller of the calculator sees it.

use {
    ab_pilot::{
        SizeEstimator,
        domain::{SizingMethod, SizingPayload, SizingRequest, SizingResponse},
        errors::SizingError,
    },
    pretty_assertions::assert_eq,
    serde_json::{Value, json},
};

fn size(body: Value) -> Result<Value, SizingError> {
    let payload: SizingPayload = serde_json::from_value(body).expect("well-formed payload");
    let request = SizingRequest::try_from(payload)?;
    let result = SizeEstimator::estimate(&request)?;
    Ok(serde_json::to_value(SizingResponse::from(result)).expect("serializable response"))
}

#[test]
fn frequentist_estimate_over_the_wire() {
    let response = size(json!({
        "visits": 1000, "conversions": 100, "traffic": 50, "variations": 2,
        "improvement": 5, "confidence": 95, "method": "frequentist"
    }))
    .unwrap();

    assert_eq!(response, json!({"days": 226, "minSample": 112896}));
}

#[test]
fn bayesian_estimate_over_the_wire() {
    let response = size(json!({
        "visits": 1000, "conversions": 100, "traffic": 50, "variations": 2,
        "improvement": 5, "confidence": 95, "method": "bayesian"
    }))
    .unwrap();

    assert_eq!(response, json!({"days": 2560, "minSample": 1280000}));
}

#[test]
fn omitted_confidence_and_method_fall_back_to_defaults() {
    let payload: SizingPayload = serde_json::from_value(json!({
        "visits": 1000, "conversions": 100, "traffic": 50, "variations": 2, "improvement": 5
    }))
    .unwrap();

    assert_eq!(payload.confidence, 95.0);
    assert_eq!(payload.method, SizingMethod::Frequentist);
    assert_eq!(
        size(serde_json::to_value(&payload).unwrap()).unwrap(),
        json!({"days": 226, "minSample": 112896})
    );
}

#[test]
fn more_variations_scale_sample_and_duration() {
    let response = size(json!({
        "visits": 1000, "conversions": 100, "traffic": 50, "variations": 3,
        "improvement": 5, "method": "frequentist"
    }))
    .unwrap();

    assert_eq!(response["minSample"], json!(169344));
    assert_eq!(response["days"], json!(339));
}

#[test]
fn degenerate_inputs_are_errors_not_nan() {
    let negative_variations = size(json!({
        "visits": 1000, "conversions": 100, "traffic": 50, "variations": -2, "improvement": 5
    }));
    assert!(matches!(
        negative_variations,
        Err(SizingError::InvalidInput { field: "variations", .. })
    ));

    let no_traffic = size(json!({
        "visits": 0, "conversions": 0, "traffic": 50, "variations": 2, "improvement": 5
    }));
    assert!(no_traffic.is_err());

    let no_effect = size(json!({
        "visits": 1000, "conversions": 100, "traffic": 50, "variations": 2, "improvement": 0
    }));
    assert!(no_effect.is_err());
}
