use std::time::Duration;

use reqwest::StatusCode;
use sporadio::spotify::RetryPolicy;

#[test]
fn test_rate_limit_retries_are_bounded() {
    let mut policy = RetryPolicy::default();

    for _ in 0..3 {
        assert_eq!(
            policy.delay_for(StatusCode::TOO_MANY_REQUESTS, Some("2")),
            Some(Duration::from_secs(2))
        );
    }
    assert_eq!(policy.delay_for(StatusCode::TOO_MANY_REQUESTS, Some("2")), None);
}

#[test]
fn test_rate_limit_without_header_waits_one_second() {
    let mut policy = RetryPolicy::default();

    assert_eq!(
        policy.delay_for(StatusCode::TOO_MANY_REQUESTS, None),
        Some(Duration::from_secs(1))
    );
    assert_eq!(
        policy.delay_for(StatusCode::TOO_MANY_REQUESTS, Some("soon")),
        Some(Duration::from_secs(1))
    );
}

#[test]
fn test_long_retry_after_gives_up() {
    let mut policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(StatusCode::TOO_MANY_REQUESTS, Some("3600")), None);
}

#[test]
fn test_bad_gateway_retries_are_bounded() {
    let mut policy = RetryPolicy::default();

    for _ in 0..5 {
        assert_eq!(
            policy.delay_for(StatusCode::BAD_GATEWAY, None),
            Some(Duration::from_secs(10))
        );
    }
    assert_eq!(policy.delay_for(StatusCode::BAD_GATEWAY, None), None);
}

#[test]
fn test_other_statuses_are_final() {
    let mut policy = RetryPolicy::default();

    assert_eq!(policy.delay_for(StatusCode::OK, None), None);
    assert_eq!(policy.delay_for(StatusCode::NOT_FOUND, None), None);
    assert_eq!(policy.delay_for(StatusCode::INTERNAL_SERVER_ERROR, Some("5")), None);
}
