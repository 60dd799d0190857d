use super::super::mock::{MockEvent, MockPowerd, ParamsBehavior, SetBehavior};
use crate::{
    cancel::CancelToken,
    external::brightness::{BrightnessParams, CallError, PowerdBus, PowerdConnection},
};
use std::time::Duration;

const PARAMS: BrightnessParams = BrightnessParams {
    dim: 10,
    min: 0,
    max: 100,
    default: 50,
    ab_supported: true,
};

#[tokio::test]
async fn test_params_and_setting() {
    let mut bus = MockPowerd::new(PARAMS);
    let connection = bus.connect().await.unwrap();
    assert_eq!(connection.get_brightness_params().await.unwrap(), PARAMS);
    connection
        .set_user_brightness(45, &CancelToken::new())
        .await
        .unwrap();
    connection.release();
    assert_eq!(
        bus.events(),
        vec![
            MockEvent::Connect,
            MockEvent::GetBrightnessParams,
            MockEvent::SetUserBrightness(45),
            MockEvent::Release { cancelled: false },
        ]
    );
    assert_eq!(bus.set_calls(), vec![45]);
}

#[tokio::test]
async fn test_errors() {
    let mut bus = MockPowerd::new(PARAMS);
    bus.set_connect_failure(true);
    assert!(bus.connect().await.is_err());

    bus.set_connect_failure(false);
    let connection = bus.connect().await.unwrap();
    bus.set_params_behavior(ParamsBehavior::Fail(CallError::Timeout));
    assert_eq!(
        connection.get_brightness_params().await,
        Err(CallError::Timeout)
    );
    bus.set_set_behavior(SetBehavior::Fail);
    assert!(connection
        .set_user_brightness(42, &CancelToken::new())
        .await
        .is_err());
}

#[tokio::test(start_paused = true)]
async fn test_hanging_set_is_cancellable() {
    let bus = MockPowerd::new(PARAMS);
    bus.set_set_behavior(SetBehavior::Hang);
    let token = CancelToken::new();
    assert!(tokio::time::timeout(
        Duration::from_secs(60),
        bus.set_user_brightness(30, &token)
    )
    .await
    .is_err());

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });
    assert_eq!(
        bus.set_user_brightness(30, &token).await,
        Err(CallError::Cancelled)
    );
    bus.clone().release();
    assert_eq!(
        bus.events().last(),
        Some(&MockEvent::Release { cancelled: true })
    );
}
