//! Consumer depends on a contract it owns; the backend is chosen by binding.

use seam::contract::{Contract, OperationSignature, Shape};
use seam::error::{EngineError, ProviderError};
use seam::facade::{Bindings, ResolutionFacade};
use seam::provider::{FnProvider, Provider};
use seam::registry::StrategyRegistry;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FetchRequest {
    limit: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u64,
    name: String,
}

/// Contract owned by the consumer, not by any backend
fn data_source() -> Contract {
    Contract::builder("DataSource")
        .operation(
            OperationSignature::new(
                "fetch",
                Shape::record([("limit", Shape::Integer)]),
                Shape::list(Shape::record([("id", Shape::Integer), ("name", Shape::Text)])),
            )
            .fails_with("unavailable"),
        )
        .build()
        .unwrap()
}

fn fetch_signature() -> OperationSignature {
    data_source().operation("fetch").cloned().unwrap()
}

fn in_memory(records: Vec<Record>) -> Arc<dyn Provider> {
    Arc::new(
        FnProvider::builder("in_memory")
            .typed_operation(fetch_signature(), move |req: serde_json::Value| {
                let limit = req["limit"].as_u64().unwrap_or(0) as usize;
                Ok(records.iter().take(limit).cloned().collect::<Vec<_>>())
            })
            .build(),
    )
}

fn offline() -> Arc<dyn Provider> {
    Arc::new(
        FnProvider::builder("offline")
            .operation(fetch_signature(), |_| {
                Err(ProviderError::failed("unavailable", "database unreachable"))
            })
            .build(),
    )
}

/// High-level module: never names a concrete backend
struct ReportService {
    facade: ResolutionFacade,
}

impl ReportService {
    async fn names(&self, limit: u64) -> Result<Vec<String>, EngineError> {
        let records: Vec<Record> = self
            .facade
            .call_bound(&data_source(), "fetch", &FetchRequest { limit })
            .await?;
        Ok(records.into_iter().map(|r| r.name).collect())
    }
}

fn registry() -> Arc<StrategyRegistry> {
    let registry = Arc::new(StrategyRegistry::new());
    let records = vec![
        Record { id: 1, name: "ada".to_string() },
        Record { id: 2, name: "grace".to_string() },
        Record { id: 3, name: "edsger".to_string() },
    ];
    registry.register("memory", &data_source(), in_memory(records)).unwrap();
    registry.register("offline", &data_source(), offline()).unwrap();
    registry
        .register("negative_ids", &data_source(), negative_ids())
        .unwrap();
    registry
}

/// Conforms to the contract's shapes, but its ids do not fit `Record`
fn negative_ids() -> Arc<dyn Provider> {
    Arc::new(
        FnProvider::builder("negative_ids")
            .operation(fetch_signature(), |_| Ok(json!([{ "id": -1, "name": "ghost" }])))
            .build(),
    )
}

fn service(bound_key: &str, registry: Arc<StrategyRegistry>) -> ReportService {
    let mut bindings = Bindings::new();
    bindings.bind("DataSource", bound_key);
    ReportService {
        facade: ResolutionFacade::new(registry).with_bindings(bindings),
    }
}

#[tokio::test]
async fn test_backend_swapped_by_binding_only() {
    let registry = registry();

    let names = service("memory", Arc::clone(&registry)).names(2).await.unwrap();
    assert_eq!(names, vec!["ada".to_string(), "grace".to_string()]);

    let err = service("offline", registry).names(2).await.unwrap_err();
    match err {
        EngineError::ProviderFailure { provider, detail } => {
            assert_eq!(provider, "offline");
            assert_eq!(detail.to_string(), "unavailable: database unreachable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_request_missing_required_field_is_invalid_input() {
    let facade = service("memory", registry()).facade;
    let err = facade
        .invoke_bound(&data_source(), "fetch", json!({ "max": 2 }))
        .await
        .unwrap_err();
    match err {
        EngineError::InvalidInput { reason, .. } => assert_eq!(reason, "$.limit: missing field"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_undecodable_records_are_contract_mismatch() {
    let err = service("negative_ids", registry()).names(1).await.unwrap_err();
    match err {
        EngineError::ContractMismatch {
            ref provider,
            at_invocation,
            ..
        } => {
            assert_eq!(provider, "negative_ids");
            assert!(at_invocation);
        }
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_fault());
}

#[tokio::test]
async fn test_unbound_contract_is_reported() {
    let facade = ResolutionFacade::new(registry());
    let err = facade
        .call_bound::<_, Vec<Record>>(&data_source(), "fetch", &FetchRequest { limit: 1 })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unbound(ref contract) if contract == "DataSource"));
}
