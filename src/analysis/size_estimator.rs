use crate::config::constants::sizing::{BAYESIAN_NUMERATOR, Z_ALPHA, Z_BETA};
#[cfg(debug_assertions)]
use crate::config::DF;
use crate::domain::{SizingMethod, SizingRequest, SizingResult};
use crate::errors::SizingError;
use crate::utils::ceil_to_u64;

/// Closed-form sample size and duration estimates for a planned experiment.
/// Pure and reentrant: same request, same answer.
pub struct SizeEstimator;

impl SizeEstimator {
    /// Dispatches on the request's method.
    pub fn estimate(req: &SizingRequest) -> Result<SizingResult, SizingError> {
        let result = match req.method {
            SizingMethod::Frequentist => Self::compute_frequentist(req),
            SizingMethod::Bayesian => Self::compute_bayesian(req),
        }?;

        #[cfg(debug_assertions)]
        if DF.log_sizing {
            log::info!(
                "SIZING [{}]: {} per variation x {} = {} visitors over {} days",
                req.method,
                result.per_variation_sample,
                req.variation_count,
                result.required_total_sample,
                result.required_days
            );
        }

        Ok(result)
    }

    /// Two-proportion z-test approximation with fixed z scores (1.96 / 0.84).
    /// `confidence_level` is carried on the request but does not move z_alpha.
    pub fn compute_frequentist(req: &SizingRequest) -> Result<SizingResult, SizingError> {
        check_inputs(req)?;

        let p = baseline_rate(req);
        let mde = p * req.expected_improvement_fraction;
        let numerator = (Z_ALPHA + Z_BETA).powi(2) * 2.0 * p * (1.0 - p);
        let denominator = mde.powi(2);

        finish(req, numerator / denominator)
    }

    /// Simplified Bayesian rule: 16 / effect².
    pub fn compute_bayesian(req: &SizingRequest) -> Result<SizingResult, SizingError> {
        check_inputs(req)?;

        let effect_size = baseline_rate(req) * req.expected_improvement_fraction;

        finish(req, BAYESIAN_NUMERATOR / effect_size.powi(2))
    }
}

fn baseline_rate(req: &SizingRequest) -> f64 {
    req.daily_conversions as f64 / req.daily_visits as f64
}

/// Rejects anything that would feed a zero, negative or non-finite value into the formulas.
fn check_inputs(req: &SizingRequest) -> Result<(), SizingError> {
    if req.daily_visits <= 0 {
        return Err(SizingError::invalid(
            "daily_visits",
            format!("must be greater than 0, got {}", req.daily_visits),
        ));
    }
    if req.daily_conversions <= 0 {
        return Err(SizingError::invalid(
            "daily_conversions",
            format!("must be greater than 0, got {}", req.daily_conversions),
        ));
    }
    if req.daily_conversions > req.daily_visits {
        return Err(SizingError::invalid(
            "daily_conversions",
            format!(
                "cannot exceed daily visits ({} > {})",
                req.daily_conversions, req.daily_visits
            ),
        ));
    }
    let improvement = req.expected_improvement_fraction;
    if !improvement.is_finite() || improvement <= 0.0 {
        return Err(SizingError::invalid(
            "expected_improvement_fraction",
            format!("must be a positive number, got {}", improvement),
        ));
    }
    let traffic = req.traffic_fraction;
    if !traffic.is_finite() || traffic <= 0.0 || traffic > 1.0 {
        return Err(SizingError::invalid(
            "traffic_fraction",
            format!("must be in (0, 1], got {}", traffic),
        ));
    }
    if req.variation_count < 2 {
        return Err(SizingError::invalid(
            "variation_count",
            format!("needs at least 2 groups, got {}", req.variation_count),
        ));
    }
    if !req.confidence_level.is_finite() {
        return Err(SizingError::invalid(
            "confidence_level",
            "must be a finite number",
        ));
    }
    Ok(())
}

/// Shared tail of both methods: ceil per variation, scale up, convert to days.
fn finish(req: &SizingRequest, raw_per_variation: f64) -> Result<SizingResult, SizingError> {
    let per_variation_sample = ceil_to_u64(raw_per_variation).ok_or_else(|| {
        SizingError::invalid(
            "expected_improvement_fraction",
            format!("produces an unusable sample size ({})", raw_per_variation),
        )
    })?;

    let required_total_sample = per_variation_sample
        .checked_mul(u64::from(req.variation_count))
        .ok_or_else(|| SizingError::invalid("variation_count", "total sample overflows"))?;

    let daily_test_visitors = req.daily_visits as f64 * req.traffic_fraction;
    let required_days = ceil_to_u64(required_total_sample as f64 / daily_test_visitors)
        .ok_or_else(|| {
            SizingError::invalid("traffic_fraction", "leaves no visitors in the test")
        })?;

    Ok(SizingResult {
        per_variation_sample,
        required_total_sample,
        required_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: SizingMethod) -> SizingRequest {
        SizingRequest {
            daily_visits: 1000,
            daily_conversions: 100,
            traffic_fraction: 0.5,
            variation_count: 2,
            expected_improvement_fraction: 0.05,
            confidence_level: 95.0,
            method,
        }
    }

    #[test]
    fn frequentist_reference_example() {
        let result = SizeEstimator::estimate(&request(SizingMethod::Frequentist)).unwrap();
        assert_eq!(result.per_variation_sample, 56448);
        assert_eq!(result.required_total_sample, 112896);
        assert_eq!(result.required_days, 226);
    }

    #[test]
    fn bayesian_reference_example() {
        let result = SizeEstimator::estimate(&request(SizingMethod::Bayesian)).unwrap();
        assert_eq!(result.per_variation_sample, 640000);
        assert_eq!(result.required_total_sample, 1280000);
        assert_eq!(result.required_days, 2560);
    }

    #[test]
    fn confidence_level_does_not_change_frequentist_result() {
        let base = SizeEstimator::estimate(&request(SizingMethod::Frequentist)).unwrap();
        for confidence in [80.0, 85.0, 90.0, 99.0] {
            let req = SizingRequest {
                confidence_level: confidence,
                ..request(SizingMethod::Frequentist)
            };
            assert_eq!(SizeEstimator::estimate(&req).unwrap(), base);
        }
    }

    #[test]
    fn total_is_exact_multiple_of_variation_count() {
        for variations in 2..=6 {
            for visits in [250_i64, 1_000, 7_919, 40_000] {
                let req = SizingRequest {
                    daily_visits: visits,
                    daily_conversions: visits / 13 + 1,
                    variation_count: variations,
                    expected_improvement_fraction: 0.07,
                    ..request(SizingMethod::Frequentist)
                };
                let result = SizeEstimator::estimate(&req).unwrap();
                assert_eq!(
                    result.required_total_sample,
                    result.per_variation_sample * u64::from(variations)
                );
            }
        }
    }

    #[test]
    fn per_variation_is_the_ceiling_not_the_floor() {
        let req = request(SizingMethod::Frequentist);
        let p = 0.1_f64;
        let raw = (Z_ALPHA + Z_BETA).powi(2) * 2.0 * p * (1.0 - p) / (p * 0.05).powi(2);
        let result = SizeEstimator::compute_frequentist(&req).unwrap();
        let n = result.per_variation_sample as f64;
        assert!(n >= raw);
        assert!(n - 1.0 < raw);
    }

    #[test]
    fn full_conversion_needs_no_frequentist_sample() {
        let req = SizingRequest {
            daily_conversions: 1000,
            ..request(SizingMethod::Frequentist)
        };
        let result = SizeEstimator::estimate(&req).unwrap();
        assert_eq!(result.required_total_sample, 0);
        assert_eq!(result.required_days, 0);
    }

    #[test]
    fn degenerate_inputs_fail_instead_of_dividing_by_zero() {
        let cases = [
            SizingRequest {
                daily_visits: 0,
                ..request(SizingMethod::Frequentist)
            },
            SizingRequest {
                daily_conversions: 0,
                ..request(SizingMethod::Bayesian)
            },
            SizingRequest {
                daily_conversions: -4,
                ..request(SizingMethod::Frequentist)
            },
            SizingRequest {
                expected_improvement_fraction: 0.0,
                ..request(SizingMethod::Bayesian)
            },
            SizingRequest {
                expected_improvement_fraction: f64::NAN,
                ..request(SizingMethod::Frequentist)
            },
            SizingRequest {
                traffic_fraction: 0.0,
                ..request(SizingMethod::Frequentist)
            },
            SizingRequest {
                daily_conversions: 1001,
                ..request(SizingMethod::Frequentist)
            },
            SizingRequest {
                variation_count: 1,
                ..request(SizingMethod::Frequentist)
            },
        ];
        for req in cases {
            assert!(
                matches!(
                    SizeEstimator::estimate(&req),
                    Err(SizingError::InvalidInput { .. })
                ),
                "expected InvalidInput for {:?}",
                req
            );
        }
    }

    #[test]
    fn error_names_the_offending_field() {
        let req = SizingRequest {
            daily_visits: -10,
            ..request(SizingMethod::Frequentist)
        };
        let err = SizeEstimator::estimate(&req).unwrap_err();
        assert!(err.to_string().contains("daily_visits"));
    }
}
