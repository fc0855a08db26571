// Unique short-code generation: alphabet shape, retry-on-collision, and the
// bounded-retry failure mode.

use std::cell::Cell;
use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use trailhub::core::error::AppError;
use trailhub::modules::adventures::models::{Adventure, ADVENTURE_POLICY};
use trailhub::service::{EntityService, CODE_ALPHABET, CODE_RETRY_BUDGET};
use trailhub::store::MemoryStore;

fn service() -> EntityService<Adventure> {
    EntityService::new(Arc::new(MemoryStore::<Adventure>::new()), &ADVENTURE_POLICY)
}

fn seeded_adventure(join_code: &str) -> Adventure {
    Adventure::new(
        Uuid::new_v4(),
        "Ridge traverse".to_string(),
        None,
        "Lofoten".to_string(),
        8,
        dec!(420.00),
        join_code.to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_generated_code_uses_alphabet_and_length() {
    let service = service();

    let code = service.generate_unique_code("join_code", 8).await.unwrap();

    assert_eq!(code.len(), 8);
    assert!(code.bytes().all(|byte| CODE_ALPHABET.contains(&byte)));
}

#[tokio::test]
async fn test_collision_triggers_regeneration() {
    let service = service();
    service.create(seeded_adventure("AAAAAAAA")).await.unwrap();

    let calls = Cell::new(0usize);
    let code = service
        .generate_unique_code_with("join_code", 8, |_| {
            let attempt = calls.get();
            calls.set(attempt + 1);
            if attempt == 0 {
                "AAAAAAAA".to_string()
            } else {
                "ZZZZZZZZ".to_string()
            }
        })
        .await
        .unwrap();

    assert_eq!(code, "ZZZZZZZZ");
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_full_collision_exhausts_retry_budget() {
    let service = service();
    service.create(seeded_adventure("AAAAAAAA")).await.unwrap();

    let calls = Cell::new(0usize);
    let err = service
        .generate_unique_code_with("join_code", 8, |_| {
            calls.set(calls.get() + 1);
            "AAAAAAAA".to_string()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::GenerationExhausted(_)));
    // Bounded: exactly the retry budget, never an unbounded loop
    assert_eq!(calls.get(), CODE_RETRY_BUDGET);
}
