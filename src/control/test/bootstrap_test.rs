use crate::{
    control::bootstrap::{connect, ConnectError, PARAMS_TIMEOUT},
    external::brightness::{
        mock::{MockEvent, MockPowerd, ParamsBehavior},
        BrightnessParams, CallError,
    },
};
use tokio::time::Instant;

const PARAMS: BrightnessParams = BrightnessParams {
    dim: 10,
    min: 0,
    max: 100,
    default: 50,
    ab_supported: true,
};

#[tokio::test]
async fn test_successful_bootstrap() {
    let mut bus = MockPowerd::new(PARAMS);
    let (_connection, params) = connect(&mut bus).await.expect("Bootstrap failed");
    assert_eq!(params, PARAMS);
    assert_eq!(
        bus.events(),
        vec![MockEvent::Connect, MockEvent::GetBrightnessParams]
    );
}

#[tokio::test]
async fn test_unreachable_bus() {
    let mut bus = MockPowerd::new(PARAMS);
    bus.set_connect_failure(true);
    let err = connect(&mut bus)
        .await
        .expect_err("Bootstrap succeeded without a bus");
    assert!(matches!(err, ConnectError::Unreachable(_)));
    // Parameters are never requested and nothing is there to be released
    assert_eq!(bus.events(), vec![MockEvent::Connect]);
}

#[tokio::test]
async fn test_service_unknown_releases_connection() {
    let mut bus = MockPowerd::new(PARAMS);
    bus.set_params_behavior(ParamsBehavior::Fail(CallError::ServiceUnknown(
        "com.canonical.powerd".to_owned(),
    )));
    let err = connect(&mut bus)
        .await
        .expect_err("Bootstrap succeeded without powerd");
    assert_eq!(
        err,
        ConnectError::ParamsUnavailable(CallError::ServiceUnknown(
            "com.canonical.powerd".to_owned()
        ))
    );
    assert_eq!(
        bus.events(),
        vec![
            MockEvent::Connect,
            MockEvent::GetBrightnessParams,
            MockEvent::Release { cancelled: false },
        ]
    );
}

#[tokio::test]
async fn test_other_failures_release_connection() {
    for failure in [
        CallError::MalformedReply("expected (iiiib)".to_owned()),
        CallError::Bus("Rejected send message".to_owned()),
    ] {
        let mut bus = MockPowerd::new(PARAMS);
        bus.set_params_behavior(ParamsBehavior::Fail(failure.clone()));
        let err = connect(&mut bus).await.expect_err("Bootstrap succeeded");
        assert_eq!(err, ConnectError::ParamsUnavailable(failure));
        assert_eq!(
            bus.events().last(),
            Some(&MockEvent::Release { cancelled: false })
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_params_timeout() {
    let mut bus = MockPowerd::new(PARAMS);
    bus.set_params_behavior(ParamsBehavior::Hang);
    let start = Instant::now();
    let err = connect(&mut bus)
        .await
        .expect_err("Bootstrap succeeded with a hanging powerd");
    assert_eq!(err, ConnectError::ParamsUnavailable(CallError::Timeout));
    assert!(start.elapsed() >= PARAMS_TIMEOUT);
    assert_eq!(
        bus.events(),
        vec![
            MockEvent::Connect,
            MockEvent::GetBrightnessParams,
            MockEvent::Release { cancelled: false },
        ]
    );
}
