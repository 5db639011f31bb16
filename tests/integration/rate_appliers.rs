//! Rate strategies swapped behind one contract.

use seam::error::{EngineError, ProviderError};
use seam::facade::ResolutionFacade;
use seam::registry::StrategyRegistry;
use serde_json::json;
use std::sync::Arc;

use crate::integration::{rate_applier, rate_provider};

fn facade() -> ResolutionFacade {
    let registry = Arc::new(StrategyRegistry::new());
    let contract = rate_applier();
    registry
        .register("standard", &contract, rate_provider("StandardRate", 1.20))
        .unwrap();
    registry
        .register("tax_free", &contract, rate_provider("TaxFree", 1.0))
        .unwrap();
    ResolutionFacade::new(registry)
}

#[tokio::test]
async fn test_standard_rate_applies_twenty_percent() {
    let resolution = facade()
        .invoke("standard", &rate_applier(), "apply", json!(100))
        .await
        .unwrap();

    let total = resolution.as_f64().unwrap();
    assert!((total - 120.0).abs() < 1e-9, "got {}", total);
    assert_eq!(resolution.provider, "StandardRate");
}

#[tokio::test]
async fn test_tax_free_returns_amount_unchanged() {
    let resolution = facade()
        .invoke("tax_free", &rate_applier(), "apply", json!(100))
        .await
        .unwrap();
    assert_eq!(resolution.as_f64(), Some(100.0));
    assert_eq!(resolution.provider, "TaxFree");
}

#[tokio::test]
async fn test_second_tax_free_registration_is_rejected() {
    let facade = facade();
    let err = facade
        .registry()
        .register("tax_free", &rate_applier(), rate_provider("Impostor", 0.5))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::DuplicateRegistration { ref key, ref contract }
            if key == "tax_free" && contract == "RateApplier"
    ));

    // Original provider still answers
    let resolution = facade
        .invoke("tax_free", &rate_applier(), "apply", json!(100))
        .await
        .unwrap();
    assert_eq!(resolution.provider, "TaxFree");
    assert_eq!(resolution.as_f64(), Some(100.0));
}

#[tokio::test]
async fn test_consumer_code_is_identical_for_every_provider() {
    let facade = facade();
    let contract = rate_applier();

    let mut totals = Vec::new();
    for key in facade.registry().list(&contract).iter() {
        let total: f64 = facade.call(key, &contract, "apply", &50.0).await.unwrap();
        totals.push((key.to_string(), total));
    }

    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].0, "standard");
    assert!((totals[0].1 - 60.0).abs() < 1e-9);
    assert_eq!(totals[1], ("tax_free".to_string(), 50.0));
}

#[tokio::test]
async fn test_declared_failure_surfaces_with_provider_identity() {
    let err = facade()
        .invoke("standard", &rate_applier(), "apply", json!(-5))
        .await
        .unwrap_err();

    match err {
        EngineError::ProviderFailure { provider, detail } => {
            assert_eq!(provider, "StandardRate");
            match detail {
                ProviderError::Failed { condition, message } => {
                    assert_eq!(condition, "negative_amount");
                    assert_eq!(message, "amount -5 is below zero");
                }
                other => panic!("unexpected detail: {other}"),
            }
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unknown_key_has_no_fallback() {
    let err = facade()
        .invoke("reduced", &rate_applier(), "apply", json!(100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownKey { key, .. } if key == "reduced"));
}
