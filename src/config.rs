use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use clap::Parser;
use log::{debug, warn};

use crate::error::PlotError;
use crate::render::{Renderer, DEFAULT_SIZE};

/// Serve a live plot image next to a few counters.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Address to bind. Defaults to the address the host name resolves to.
    #[arg(long)]
    pub address: Option<IpAddr>,

    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Elapsed-time ticker period in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,

    #[arg(long, default_value_t = DEFAULT_SIZE.0)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_SIZE.1)]
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: None,
            port: 8000,
            tick_ms: 100,
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.tick_ms == 0 {
            return Err(PlotError::config("tick period must be at least 1ms"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::config(format!(
                "figure size {}x{} is empty",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.width, self.height)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self.address.unwrap_or_else(host_address);
        SocketAddr::new(ip, self.port)
    }
}

/// Resolve this machine's host name, falling back to all interfaces.
pub fn host_address() -> IpAddr {
    let fallback = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
    let Some(name) = host_name() else {
        warn!("could not determine host name, binding {fallback}");
        return fallback;
    };
    match (name.as_str(), 0).to_socket_addrs() {
        Ok(addrs) => {
            let addrs: Vec<_> = addrs.collect();
            let ip = addrs
                .iter()
                .find(|a| a.is_ipv4())
                .or(addrs.first())
                .map(|a| a.ip())
                .unwrap_or(fallback);
            debug!("host name '{name}' resolved to {ip}");
            ip
        }
        Err(e) => {
            warn!("could not resolve host name '{name}': {e}, binding {fallback}");
            fallback
        }
    }
}

/// Best effort: `HOSTNAME` is rarely exported, `/etc/hostname` is Linux only
/// and `COMPUTERNAME` covers Windows. Anything else falls back to `0.0.0.0`.
fn host_name() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| fs::read_to_string("/etc/hostname").ok())
        .or_else(|| std::env::var("COMPUTERNAME").ok())
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
