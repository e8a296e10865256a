use crate::models::{
    Classification, HiringOutlook, MarketState, RetentionRisk, SignalError, Volatility,
};

pub const FAVORABLE_EPI: f64 = 1.5;
pub const CHALLENGING_EPI: f64 = 0.8;
pub const HIGH_VELOCITY: f64 = 1.3;
pub const LOW_VELOCITY: f64 = 0.9;
pub const HIRING_SCORE_CAP: f64 = 3.0;

/// Classify one period from its composite scores. Pure and stateless; the
/// same pair always yields the same classification.
pub fn classify(epi: f64, velocity: f64) -> Result<Classification, SignalError> {
    if !epi.is_finite() || !velocity.is_finite() {
        return Err(SignalError::InvalidScore { epi, velocity });
    }

    let (hiring_outlook, hiring_score) = if epi > FAVORABLE_EPI {
        (
            HiringOutlook::Favorable,
            ((epi - 1.0) * 2.0).min(HIRING_SCORE_CAP),
        )
    } else if epi > CHALLENGING_EPI {
        (HiringOutlook::Balanced, 0.0)
    } else {
        (
            HiringOutlook::Challenging,
            ((epi - 1.0) * 2.0).max(-HIRING_SCORE_CAP),
        )
    };

    let (volatility, retention_risk) = if velocity > HIGH_VELOCITY {
        (Volatility::High, RetentionRisk::Elevated)
    } else if velocity > LOW_VELOCITY {
        (Volatility::Moderate, RetentionRisk::Normal)
    } else {
        (Volatility::Low, RetentionRisk::Low)
    };

    let state = if hiring_outlook == HiringOutlook::Favorable && volatility == Volatility::Low {
        MarketState::EmployersMarket
    } else if hiring_outlook == HiringOutlook::Challenging && volatility == Volatility::High {
        MarketState::EmployeesMarket
    } else {
        MarketState::Transitioning
    };

    let mut recommendations = Vec::new();
    match hiring_outlook {
        HiringOutlook::Favorable => {
            recommendations.push("Accelerate strategic hiring - conditions favorable".to_string());
            recommendations.push("Upgrade talent while availability is high".to_string());
        }
        HiringOutlook::Challenging => {
            recommendations.push("Focus on retention - hiring will be difficult".to_string());
            recommendations.push("Review compensation competitiveness".to_string());
        }
        HiringOutlook::Balanced => {}
    }
    match retention_risk {
        RetentionRisk::Elevated => {
            recommendations.push("Implement retention programs for key talent".to_string());
            recommendations.push("Monitor quit rates weekly, not monthly".to_string());
        }
        RetentionRisk::Low => {
            recommendations.push("Opportunity to optimize workforce costs".to_string());
            recommendations.push("Good time for organizational changes".to_string());
        }
        RetentionRisk::Normal => {}
    }

    Ok(Classification {
        state,
        hiring_outlook,
        hiring_score,
        retention_risk,
        volatility,
        epi,
        velocity,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epi_boundaries_are_exclusive_upward() {
        // 1.5 exactly is still BALANCED, 0.8 exactly is still CHALLENGING.
        assert_eq!(
            classify(1.5, 1.0).unwrap().hiring_outlook,
            HiringOutlook::Balanced
        );
        assert_eq!(
            classify(1.50001, 1.0).unwrap().hiring_outlook,
            HiringOutlook::Favorable
        );
        assert_eq!(
            classify(0.8, 1.0).unwrap().hiring_outlook,
            HiringOutlook::Challenging
        );
        assert_eq!(
            classify(0.80001, 1.0).unwrap().hiring_outlook,
            HiringOutlook::Balanced
        );
    }

    #[test]
    fn velocity_boundaries_are_exclusive_upward() {
        assert_eq!(classify(1.0, 1.3).unwrap().volatility, Volatility::Moderate);
        assert_eq!(classify(1.0, 1.30001).unwrap().volatility, Volatility::High);
        assert_eq!(classify(1.0, 0.9).unwrap().volatility, Volatility::Low);
        assert_eq!(
            classify(1.0, 0.90001).unwrap().volatility,
            Volatility::Moderate
        );
    }

    #[test]
    fn hiring_score_scales_and_caps() {
        let favorable = classify(2.0, 1.0).unwrap();
        assert!((favorable.hiring_score - 2.0).abs() < 1e-9);
        let capped = classify(4.0, 1.0).unwrap();
        assert!((capped.hiring_score - 3.0).abs() < 1e-9);
        let balanced = classify(1.2, 1.0).unwrap();
        assert_eq!(balanced.hiring_score, 0.0);
        let floor = classify(0.1, 1.0).unwrap();
        assert!((floor.hiring_score + 1.8).abs() < 1e-9);
        let floored = classify(-1.0, 1.0).unwrap();
        assert!((floored.hiring_score + 3.0).abs() < 1e-9);
    }

    #[test]
    fn combined_states_require_both_conditions() {
        assert_eq!(
            classify(1.8, 0.8).unwrap().state,
            MarketState::EmployersMarket
        );
        assert_eq!(
            classify(0.5, 1.5).unwrap().state,
            MarketState::EmployeesMarket
        );
        assert_eq!(
            classify(1.8, 1.5).unwrap().state,
            MarketState::Transitioning
        );
        assert_eq!(
            classify(0.5, 0.8).unwrap().state,
            MarketState::Transitioning
        );
    }

    #[test]
    fn recommendations_order_hiring_before_retention() {
        let c = classify(1.8, 1.5).unwrap();
        assert_eq!(c.recommendations.len(), 4);
        assert!(c.recommendations[0].contains("hiring"));
        assert!(c.recommendations[2].contains("retention programs"));
        assert_eq!(c.immediate_actions().len(), 2);
        assert_eq!(c.planning_considerations().len(), 2);

        let balanced = classify(1.0, 1.0).unwrap();
        assert!(balanced.recommendations.is_empty());
        assert!(balanced.immediate_actions().is_empty());
        assert!(balanced.planning_considerations().is_empty());
    }

    #[test]
    fn classification_is_pure() {
        let first = classify(1.23, 1.07).unwrap();
        let second = classify(1.23, 1.07).unwrap();
        assert_eq!(first.state, second.state);
        assert_eq!(first.hiring_outlook, second.hiring_outlook);
        assert_eq!(first.hiring_score, second.hiring_score);
        assert_eq!(first.recommendations, second.recommendations);
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        assert!(matches!(
            classify(f64::NAN, 1.0),
            Err(SignalError::InvalidScore { .. })
        ));
        assert!(matches!(
            classify(1.0, f64::INFINITY),
            Err(SignalError::InvalidScore { .. })
        ));
    }
}
