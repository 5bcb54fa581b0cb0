//! SSH tunnel guard.
//!
//! The archive is reachable only through a port forward to the host that
//! runs it. The tunnel is acquired once at the start of a run and released
//! exactly once when the guard goes out of scope, on normal completion,
//! fatal error, and interrupt alike.

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tracing::info;

use graft_core::{Config, Result};

/// Delay after spawning ssh before the forward is assumed usable.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Scoped SSH port forward to the archive host.
///
/// Dropping the guard kills the ssh child process. A disabled tunnel
/// (archive already reachable) yields a no-op guard.
pub struct Tunnel {
    child: Option<Child>,
}

impl Tunnel {
    /// Open the tunnel described by the configuration.
    pub async fn open(config: &Config) -> Result<Self> {
        if !config.tunnel_enabled {
            info!("tunnel disabled, using archive URL directly");
            return Ok(Self { child: None });
        }

        let forward = format!(
            "{}:localhost:{}",
            config.tunnel_local_port, config.tunnel_remote_port
        );
        info!(host = %config.tunnel_host, forward = %forward, "opening tunnel");
        let child = Command::new("ssh")
            .args(["-N", "-L", &forward, &config.tunnel_host])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // ssh offers no readiness signal in -N mode; give the forward a
        // moment to come up before the first request.
        tokio::time::sleep(SETTLE_DELAY).await;
        Ok(Self { child: Some(child) })
    }
}

impl Drop for Tunnel {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            info!("tunnel closed");
        }
    }
}
