use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the global Prometheus recorder with its own `/metrics` listener.
pub fn install_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("prometheus exporter on {addr}: {e}"))?;
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}
