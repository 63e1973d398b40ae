/// Transaction service tests
///
/// Create/get/update/delete/list behavior, duplicate rejection, and window expiry
/// Run with: cargo test --test service_tests

use std::sync::Arc;
use std::time::Duration;
use txrecords::{
    ManualClock, RecordId, ServiceConfig, TransactionRequest, TransactionService,
    TransactionStatus, TransactionType, TxnError,
};

const START_MS: u64 = 1_745_452_800_000;

fn service() -> (Arc<ManualClock>, TransactionService) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let config = ServiceConfig::new(1, 1).dedup_window(Duration::from_secs(60));
    let service = TransactionService::from_config_with_clock(&config, clock.clone()).unwrap();
    (clock, service)
}

fn transfer(sender: &str, receiver: &str, amount_minor: i64) -> TransactionRequest {
    TransactionRequest::new(sender, receiver, amount_minor, "CNY")
        .kind(TransactionType::Transfer)
        .channel("WeChat")
        .beneficiary_name("Li Lei")
        .client("192.168.1.1", "device-1")
}

#[test]
fn test_create_returns_stored_transaction() {
    let (_clock, service) = service();
    let created = service.create(transfer("1001", "2002", 8_888)).unwrap();

    assert_eq!(created.amount_minor, 8_888);
    assert_eq!(created.currency, "CNY");
    assert_eq!(created.sender_account, "1001");
    assert_eq!(created.status, TransactionStatus::Pending);
    assert_eq!(service.get(created.id).unwrap(), created);
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn test_create_duplicated_within_window() {
    let (_clock, service) = service();
    service.create(transfer("1001", "2002", 8_888)).unwrap();

    let err = service.create(transfer("1001", "2002", 8_888)).unwrap_err();
    assert!(matches!(err, TxnError::DuplicateSubmission(_)));
    assert!(err.is_client_error());
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn test_create_different_fields_not_duplicated() {
    let (_clock, service) = service();
    service.create(transfer("1001", "2002", 8_888)).unwrap();

    // only sender, receiver, amount, and currency take part in the fingerprint
    assert!(service.create(transfer("1001", "2002", 8_889)).is_ok());
    assert!(service.create(transfer("1001", "2003", 8_888)).is_ok());
    assert!(
        service
            .create(TransactionRequest::new("1001", "2002", 8_888, "USD"))
            .is_ok()
    );
    assert!(
        service
            .create(transfer("1001", "2002", 8_888).channel("Alipay"))
            .is_err()
    );
}

#[test]
fn test_get_unknown_id_is_not_found() {
    let (_clock, service) = service();
    let err = service.get(RecordId(0)).unwrap_err();

    assert!(matches!(err, TxnError::NotFound(RecordId(0))));
    assert_eq!(err.to_string(), "Transaction not found with id: 0");
}

#[test]
fn test_list_returns_created_in_id_order() {
    let (_clock, service) = service();
    let first = service.create(transfer("1001", "2002", 100)).unwrap();
    let second = service.create(transfer("1001", "2002", 200)).unwrap();

    let page = service.list(1, 10).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, first.id);
    assert_eq!(page[1].id, second.id);

    assert_eq!(service.list(2, 1).unwrap()[0].id, second.id);
    assert!(service.list(3, 1).unwrap().is_empty());
}

#[test]
fn test_update_existing_transaction() {
    let (_clock, service) = service();
    let created = service.create(transfer("1001", "2002", 8_888)).unwrap();

    let updated = service
        .update(
            created.id,
            transfer("1001", "2002", 9_999).status(TransactionStatus::Completed),
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.amount_minor, 9_999);
    assert_eq!(updated.status, TransactionStatus::Completed);
    assert_eq!(service.get(created.id).unwrap(), updated);
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let (_clock, service) = service();
    let err = service.update(RecordId(42), transfer("1001", "2002", 1)).unwrap_err();

    assert!(matches!(err, TxnError::NotFound(RecordId(42))));
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn test_delete_then_get_is_not_found() {
    let (_clock, service) = service();
    let created = service.create(transfer("1001", "2002", 8_888)).unwrap();

    service.delete(created.id).unwrap();

    assert!(matches!(service.get(created.id), Err(TxnError::NotFound(_))));
    assert!(matches!(service.delete(created.id), Err(TxnError::NotFound(_))));
}

#[test]
fn test_delete_unknown_id_is_not_found() {
    let (_clock, service) = service();
    assert!(matches!(
        service.delete(RecordId(7)),
        Err(TxnError::NotFound(RecordId(7)))
    ));
}

#[test]
fn test_response_omits_client_network_details() {
    let (_clock, service) = service();
    let created = service.create(transfer("1001", "2002", 8_888)).unwrap();

    let json = serde_json::to_value(&created).unwrap();
    assert!(json.get("ip_address").is_none());
    assert!(json.get("device_fingerprint").is_none());
    assert_eq!(json["type"], "TRANSFER");
    assert_eq!(json["status"], "PENDING");
}

#[test]
fn test_resubmission_after_window_gets_a_larger_id() {
    let (clock, service) = service();
    let request = TransactionRequest::new("A", "B", 100, "USD");
    assert_eq!(request.fingerprint(), "A_B_100_USD");

    let first = service.create(request.clone()).unwrap();

    clock.advance(Duration::from_secs(30));
    assert!(matches!(
        service.create(request.clone()),
        Err(TxnError::DuplicateSubmission(_))
    ));

    clock.advance(Duration::from_secs(31));
    let second = service.create(request).unwrap();

    assert!(second.id > first.id);
    let parts = service.id_generator().decompose(second.id);
    assert_eq!((parts.region, parts.instance), (1, 1));
    assert_eq!(service.count().unwrap(), 2);

    let stats = service.dedup_stats();
    assert_eq!(stats.lookups, 3);
    assert_eq!(stats.duplicates, 1);
}

#[test]
fn test_clock_regression_during_create_keeps_fingerprint_marked() {
    let (clock, service) = service();
    service.create(TransactionRequest::new("A", "B", 100, "USD")).unwrap();

    clock.rewind(Duration::from_millis(5));
    let request = TransactionRequest::new("C", "D", 1, "USD");
    let err = service.create(request.clone()).unwrap_err();
    assert!(matches!(err, TxnError::ClockRegressed { .. }));
    assert!(!err.is_client_error());
    assert_eq!(service.count().unwrap(), 1);

    // the failed create already marked its fingerprint for the full window
    clock.advance(Duration::from_millis(10));
    assert!(matches!(
        service.create(request.clone()),
        Err(TxnError::DuplicateSubmission(_))
    ));
    assert_eq!(service.count().unwrap(), 1);

    clock.advance(Duration::from_secs(60));
    assert!(service.create(request).is_ok());
    assert_eq!(service.count().unwrap(), 2);
}
