use rovctl_client::{ClientConfig, ControlEvent, RemoteClient};
use rovctl_protocol::control_endpoint;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,rovctl_client=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // One optional argument: a JSON config file, or a plain host.
    let config = match std::env::args().nth(1) {
        Some(arg) if arg.ends_with(".json") => ClientConfig::from_file(&arg)?,
        Some(host) => ClientConfig {
            host,
            ..ClientConfig::default()
        },
        None => ClientConfig::default(),
    };

    tracing::info!("rovctl starting...");
    tracing::info!("   Control endpoint: {}", control_endpoint(&config.host));
    tracing::info!("");
    tracing::info!("Drive from this terminal:");
    tracing::info!("   forward | backward | left | right  - press that control");
    tracing::info!("   stop or an empty line              - release");
    tracing::info!("   Ctrl+C                             - quit");

    let client = RemoteClient::new(config);
    let input_tx = client.input_sender();
    let mut status_rx = client.status_receiver();

    // Spawn the connection manager
    let client_handle = tokio::spawn(client.run());

    // Project status transitions into the log
    let status_handle = tokio::spawn(async move {
        use tokio::sync::broadcast::error::RecvError;
        loop {
            match status_rx.recv().await {
                Ok(status) => tracing::info!("Status: {}", status.label()),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Map terminal lines to control events
    let input_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut held: Option<String> = None;

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            let event = match line.as_str() {
                "" | "release" => {
                    let control = held.take().unwrap_or_else(|| "stop".to_string());
                    ControlEvent::PressEnd(control)
                }
                "stop" => {
                    held = None;
                    ControlEvent::PressStart("stop".to_string())
                }
                control => {
                    held = Some(control.to_string());
                    ControlEvent::PressStart(control.to_string())
                }
            };
            if input_tx.send(event).await.is_err() {
                break;
            }
        }
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = client_handle => {
            tracing::warn!("Client stopped");
        }
        _ = input_handle => {
            tracing::info!("Input closed");
        }
    }

    status_handle.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
