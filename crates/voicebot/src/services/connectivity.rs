use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Answers whether the network is reachable right now.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Opens a TCP connection to a well-known address to decide reachability.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub const DEFAULT_ADDRESS: &'static str = "8.8.8.8:53";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADDRESS, Self::DEFAULT_TIMEOUT)
    }
}

impl Connectivity for TcpProbe {
    fn is_online(&self) -> bool {
        let addrs = match self.address.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(error) => {
                tracing::debug!(address = %self.address, %error, "connectivity probe address did not resolve");
                return false;
            }
        };
        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                return true;
            }
        }
        false
    }
}

/// Connectivity with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedConnectivity(pub bool);

impl Connectivity for FixedConnectivity {
    fn is_online(&self) -> bool {
        self.0
    }
}
