use log::info;
use serde::Deserialize;

/// The message bus a connection should be opened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusType {
    /// The system-wide D-Bus, where powerd lives
    System,
    /// The session's / user's D-Bus
    Session,
}

impl Default for BusType {
    fn default() -> Self {
        BusType::System
    }
}

/// Handles initialization and cloning of [zbus::Connection]s. These are
/// clone-able and handle their own refcounts internally. This struct will
/// either create or provide clones of connections.
pub struct ConnectionFactory {
    system: Option<zbus::Connection>,
    session: Option<zbus::Connection>,
}

impl ConnectionFactory {
    /// Create a new ConnectionFactory.
    ///
    /// No connections are created upon calling this method.
    pub fn new() -> ConnectionFactory {
        ConnectionFactory {
            system: None,
            session: None,
        }
    }

    /// Get a connection to the given bus, creating it on first use
    pub async fn get(&mut self, bus: BusType) -> zbus::Result<zbus::Connection> {
        let slot = match bus {
            BusType::System => &mut self.system,
            BusType::Session => &mut self.session,
        };
        if let Some(c) = slot {
            return Ok(c.clone());
        }
        info!("Creating a new connection to the {:?} bus", bus);
        let connection = match bus {
            BusType::System => zbus::Connection::system().await?,
            BusType::Session => zbus::Connection::session().await?,
        };
        *slot = Some(connection.clone());
        Ok(connection)
    }
}

impl Default for ConnectionFactory {
    fn default() -> Self {
        ConnectionFactory::new()
    }
}

#[cfg(test)]
mod test {
    use super::{BusType, ConnectionFactory};
    use anyhow::Result;
    use zbus::fdo::{self, DBusProxy};
    use zbus::{self, Connection};

    #[tokio::test]
    #[ignore]
    async fn test_session() -> Result<()> {
        let mut factory = ConnectionFactory::new();
        let session_1 = factory.get(BusType::Session).await?;
        let session_2 = factory.get(BusType::Session).await?;
        assert_eq!(get_bus_id(session_1).await?, get_bus_id(session_2).await?);
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    async fn test_system() -> Result<()> {
        let mut factory = ConnectionFactory::new();
        let system_1 = factory.get(BusType::System).await?;
        let system_2 = factory.get(BusType::System).await?;
        assert_eq!(get_bus_id(system_1).await?, get_bus_id(system_2).await?);
        Ok(())
    }

    #[test]
    fn test_bus_type_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            bus: BusType,
        }
        let parsed: Wrapper = toml::from_str("bus = \"session\"").unwrap();
        assert_eq!(parsed.bus, BusType::Session);
        assert!(toml::from_str::<Wrapper>("bus = \"Session\"").is_err());
        assert_eq!(BusType::default(), BusType::System);
    }

    async fn get_bus_id(c: Connection) -> fdo::Result<String> {
        let proxy = DBusProxy::builder(&c)
            .destination("org.freedesktop.DBus")?
            .path("/org/freedesktop/DBus")?
            .build()
            .await?;
        Ok(proxy.get_id().await?)
    }
}
