/// Concurrent access tests
///
/// Tests for multi-task submission, reads, and deletes against one shared service
/// Run with: cargo test --test concurrent_access_tests

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Barrier;
use txrecords::{RecordId, ServiceConfig, TransactionRequest, TransactionService, TxnError};

fn shared_service() -> Arc<TransactionService> {
    Arc::new(TransactionService::from_config(&ServiceConfig::new(3, 7)).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_identical_submissions() {
    let service = shared_service();
    let num_tasks = 32;
    let barrier = Arc::new(Barrier::new(num_tasks));

    let mut handles = vec![];
    for _ in 0..num_tasks {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            service.create(TransactionRequest::new("A", "B", 100, "USD"))
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(TxnError::DuplicateSubmission(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, num_tasks - 1);
    assert_eq!(service.count().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_distinct_submissions() {
    let service = shared_service();
    let num_tasks = 10;
    let per_task = 200;

    let mut handles = vec![];
    for task_id in 0..num_tasks {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::with_capacity(per_task);
            for i in 0..per_task {
                let sender = format!("S{task_id}");
                let response = service
                    .create(TransactionRequest::new(sender, "R", i as i64 + 1, "USD"))
                    .unwrap();
                ids.push(response.id);
            }
            ids
        }));
    }

    let mut all: HashSet<RecordId> = HashSet::new();
    for handle in handles {
        all.extend(handle.await.unwrap());
    }

    assert_eq!(all.len(), num_tasks * per_task);
    assert_eq!(service.count().unwrap(), num_tasks * per_task);

    let page = service.list(1, num_tasks * per_task).unwrap();
    assert!(page.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_during_deletes() {
    let service = shared_service();
    let mut ids = Vec::new();
    for i in 0..100 {
        ids.push(
            service
                .create(TransactionRequest::new("A", "B", i + 1, "USD"))
                .unwrap()
                .id,
        );
    }
    let ids = Arc::new(ids);

    let reader = {
        let service = Arc::clone(&service);
        let ids = Arc::clone(&ids);
        tokio::spawn(async move {
            for id in ids.iter() {
                // either the record is still there or it is cleanly gone
                match service.get(*id) {
                    Ok(found) => assert_eq!(found.id, *id),
                    Err(TxnError::NotFound(missing)) => assert_eq!(missing, *id),
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        })
    };

    let deleter = {
        let service = Arc::clone(&service);
        let ids = Arc::clone(&ids);
        tokio::spawn(async move {
            for id in ids.iter().step_by(2) {
                service.delete(*id).unwrap();
            }
        })
    };

    reader.await.unwrap();
    deleter.await.unwrap();

    assert_eq!(service.count().unwrap(), 50);
    let survivors: Vec<RecordId> = service.list(1, 100).unwrap().iter().map(|r| r.id).collect();
    let expected: Vec<RecordId> = ids.iter().skip(1).step_by(2).copied().collect();
    assert_eq!(survivors, expected);
}
