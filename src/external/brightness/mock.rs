use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{BrightnessParams, BusError, CallError, PowerdBus, PowerdConnection};
use crate::cancel::CancelToken;

/// Something that happened to a [MockPowerd] or one of its connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    Connect,
    GetBrightnessParams,
    SetUserBrightness(i32),
    /// The connection was released. `cancelled` records whether the token of
    /// the last set call had already been triggered at that point.
    Release { cancelled: bool },
}

/// How `getBrightnessParams` should behave
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsBehavior {
    Reply(BrightnessParams),
    /// Never reply
    Hang,
    Fail(CallError),
}

/// How `setUserBrightness` should behave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetBehavior {
    Succeed,
    Fail,
    /// Block until the call is cancelled
    Hang,
}

#[derive(Debug)]
struct MockState {
    connect_fails: bool,
    params: ParamsBehavior,
    set: SetBehavior,
    events: Vec<MockEvent>,
    last_token: Option<CancelToken>,
}

/// A mock [PowerdBus], usable when testing the code using the trait.
///
/// All the connections handed out share their state with the bus, so the
/// failure modes can be changed and the events inspected at any time.
#[derive(Debug, Clone)]
pub struct MockPowerd {
    state: Arc<Mutex<MockState>>,
}

impl MockPowerd {
    /// Create a new mock which will report the given parameters and accept
    /// all brightness changes
    pub fn new(params: BrightnessParams) -> MockPowerd {
        MockPowerd {
            state: Arc::new(Mutex::new(MockState {
                connect_fails: false,
                params: ParamsBehavior::Reply(params),
                set: SetBehavior::Succeed,
                events: Vec::new(),
                last_token: None,
            })),
        }
    }

    /// Set whether connecting to the bus should fail
    pub fn set_connect_failure(&self, should_fail: bool) {
        self.state.lock().unwrap().connect_fails = should_fail;
    }

    pub fn set_params_behavior(&self, behavior: ParamsBehavior) {
        self.state.lock().unwrap().params = behavior;
    }

    pub fn set_set_behavior(&self, behavior: SetBehavior) {
        self.state.lock().unwrap().set = behavior;
    }

    /// All events recorded so far, in order
    pub fn events(&self) -> Vec<MockEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// Values passed to `setUserBrightness` so far, in order
    pub fn set_calls(&self) -> Vec<i32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MockEvent::SetUserBrightness(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: MockEvent) {
        self.state.lock().unwrap().events.push(event);
    }
}

#[async_trait]
impl PowerdBus for MockPowerd {
    type Connection = MockPowerd;

    async fn connect(&mut self) -> Result<MockPowerd, BusError> {
        self.record(MockEvent::Connect);
        if self.state.lock().unwrap().connect_fails {
            Err(BusError::Connection("Mock bus is failing".to_owned()))
        } else {
            Ok(self.clone())
        }
    }
}

#[async_trait]
impl PowerdConnection for MockPowerd {
    async fn get_brightness_params(&self) -> Result<BrightnessParams, CallError> {
        self.record(MockEvent::GetBrightnessParams);
        let behavior = self.state.lock().unwrap().params.clone();
        match behavior {
            ParamsBehavior::Reply(params) => Ok(params),
            ParamsBehavior::Fail(e) => Err(e),
            ParamsBehavior::Hang => std::future::pending().await,
        }
    }

    async fn set_user_brightness(
        &self,
        value: i32,
        cancel: &CancelToken,
    ) -> Result<(), CallError> {
        let behavior = {
            let mut state = self.state.lock().unwrap();
            state.events.push(MockEvent::SetUserBrightness(value));
            state.last_token = Some(cancel.clone());
            state.set
        };
        if cancel.is_cancelled() {
            return Err(CallError::Cancelled);
        }
        match behavior {
            SetBehavior::Succeed => Ok(()),
            SetBehavior::Fail => Err(CallError::Bus("Mock powerd is failing".to_owned())),
            SetBehavior::Hang => {
                cancel.cancelled().await;
                Err(CallError::Cancelled)
            }
        }
    }

    fn release(self) {
        let mut state = self.state.lock().unwrap();
        let cancelled = state
            .last_token
            .as_ref()
            .map(CancelToken::is_cancelled)
            .unwrap_or(false);
        state.events.push(MockEvent::Release { cancelled });
    }
}
