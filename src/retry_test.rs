use super::*;
use std::sync::atomic::{AtomicU32, Ordering};

fn fast() -> RetryPolicy {
    RetryPolicy { max_attempts: 3, base_delay: Duration::from_millis(1) }
}

fn http(status: u16) -> ApiError {
    ApiError::HttpStatus { status, message: None, payload: serde_json::Value::Null }
}

#[tokio::test]
async fn succeeds_after_two_server_errors() {
    let calls = AtomicU32::new(0);
    let result = retry_with_backoff(fast(), || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move { if n < 2 { Err(http(500)) } else { Ok("done") } }
    })
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let calls = AtomicU32::new(0);
    let result: Result<(), ApiError> = retry_with_backoff(fast(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(http(404)) }
    })
    .await;

    assert_eq!(result, Err(http(404)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhausted_attempts_return_last_error() {
    let calls = AtomicU32::new(0);
    let result: Result<(), ApiError> = retry_with_backoff(fast(), || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move { if n == 2 { Err(http(503)) } else { Err(ApiError::Timeout) } }
    })
    .await;

    assert_eq!(result, Err(http(503)));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn validation_and_auth_errors_are_terminal() {
    let invalid = ApiError::Validation { message: "Duração é obrigatório.".into(), fields: vec!["duration".into()] };
    for err in [invalid, ApiError::session_expired()] {
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = retry_with_backoff(fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            let err = err.clone();
            async move { Err(err) }
        })
        .await;
        assert_eq!(result, Err(err.clone()));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "{err:?}");
    }
}

#[tokio::test]
async fn works_with_classified_request_errors() {
    let calls = AtomicU32::new(0);
    let result: Result<u8, RequestError> = retry_with_backoff(fast(), || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move { if n == 0 { Err(RequestError::from(http(502))) } else { Ok(7) } }
    })
    .await;
    assert_eq!(result, Ok(7));
}

#[test]
fn delay_doubles_each_attempt() {
    let policy = RetryPolicy { max_attempts: 5, base_delay: Duration::from_millis(100) };
    assert_eq!(policy.delay_after(0), Duration::from_millis(100));
    assert_eq!(policy.delay_after(1), Duration::from_millis(200));
    assert_eq!(policy.delay_after(3), Duration::from_millis(800));
}

#[test]
fn default_policy_matches_documented_values() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.base_delay, Duration::from_secs(1));
}
