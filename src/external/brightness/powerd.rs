use super::interface::{
    BrightnessParams, BusError, CallError, PowerdBus, PowerdConnection, OBJECT_PATH,
    SERVICE_NAME,
};
use crate::{
    cancel::CancelToken,
    external::dbus::{BusType, ConnectionFactory},
};
use async_trait::async_trait;

/// Error name the bus daemon replies with when a call is addressed to a name
/// nobody owns
const SERVICE_UNKNOWN_ERROR: &str = "org.freedesktop.DBus.Error.ServiceUnknown";

#[zbus::dbus_proxy(
    interface = "com.canonical.powerd",
    default_service = "com.canonical.powerd",
    default_path = "/com/canonical/powerd"
)]
trait Powerd {
    #[dbus_proxy(name = "getBrightnessParams")]
    fn get_brightness_params(&self) -> zbus::Result<BrightnessParams>;

    #[dbus_proxy(name = "setUserBrightness")]
    fn set_user_brightness(&self, brightness: i32) -> zbus::Result<()>;
}

impl From<zbus::Error> for CallError {
    fn from(error: zbus::Error) -> Self {
        match error {
            zbus::Error::MethodError(name, description, _)
                if name.as_str() == SERVICE_UNKNOWN_ERROR =>
            {
                CallError::ServiceUnknown(description.unwrap_or_default())
            }
            zbus::Error::FDO(fdo_error) => match *fdo_error {
                zbus::fdo::Error::ServiceUnknown(description) => {
                    CallError::ServiceUnknown(description)
                }
                other => CallError::Bus(other.to_string()),
            },
            zbus::Error::Variant(e) => CallError::MalformedReply(e.to_string()),
            other => CallError::Bus(other.to_string()),
        }
    }
}

/// A [PowerdBus] talking to the real powerd over D-Bus.
///
/// powerd lives on the system bus. The session bus can be selected to test
/// against a stand-in service without root privileges.
pub struct DBusPowerd {
    factory: ConnectionFactory,
    bus: BusType,
}

impl DBusPowerd {
    pub fn new(bus: BusType) -> DBusPowerd {
        DBusPowerd {
            factory: ConnectionFactory::new(),
            bus,
        }
    }
}

#[async_trait]
impl PowerdBus for DBusPowerd {
    type Connection = PowerdProxyConnection;

    async fn connect(&mut self) -> Result<PowerdProxyConnection, BusError> {
        let connection = self
            .factory
            .get(self.bus)
            .await
            .map_err(|e| BusError::Connection(e.to_string()))?;
        let proxy = PowerdProxy::builder(&connection)
            .destination(SERVICE_NAME)
            .and_then(|builder| builder.path(OBJECT_PATH))
            .map_err(|e| BusError::Proxy(e.to_string()))?
            .build()
            .await
            .map_err(|e| BusError::Proxy(e.to_string()))?;
        Ok(PowerdProxyConnection { proxy })
    }
}

/// A [PowerdConnection] backed by a zbus proxy
#[derive(Debug, Clone)]
pub struct PowerdProxyConnection {
    proxy: PowerdProxy<'static>,
}

#[async_trait]
impl PowerdConnection for PowerdProxyConnection {
    async fn get_brightness_params(&self) -> Result<BrightnessParams, CallError> {
        Ok(self.proxy.get_brightness_params().await?)
    }

    async fn set_user_brightness(
        &self,
        value: i32,
        cancel: &CancelToken,
    ) -> Result<(), CallError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CallError::Cancelled),
            result = self.proxy.set_user_brightness(value) => Ok(result?),
        }
    }

    fn release(self) {
        log::debug!("Releasing powerd proxy");
        drop(self.proxy);
    }
}
