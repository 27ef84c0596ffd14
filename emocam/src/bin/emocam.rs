//! emocam command line client

use clap::Parser;
use emocam::{
    enumerate_devices, ConsoleSurface, DisplayOrdering, EmotionDisplay, SessionBuilder,
    UploadPolicy,
};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emocam")]
#[command(about = "Segmented webcam capture client for remote emotion prediction", version)]
struct Args {
    /// Prediction endpoint URL
    #[arg(long, default_value = "http://127.0.0.1:5000/predict")]
    endpoint: String,

    /// Camera device id or name (default camera when omitted)
    #[arg(long)]
    device: Option<String>,

    /// List available cameras and exit
    #[arg(long)]
    list_devices: bool,

    /// Recording interval per segment, in seconds
    #[arg(long, default_value_t = 5)]
    segment_secs: u64,

    /// Upload one segment at a time instead of letting uploads overlap
    #[arg(long)]
    serial_uploads: bool,

    /// Discard prediction responses that arrive out of segment order
    #[arg(long)]
    ordered: bool,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_devices {
        let devices = enumerate_devices()?;
        if devices.is_empty() {
            println!("no cameras found");
        }
        for device in devices {
            println!("{}: {} ({})", device.id, device.name, device.description);
        }
        return Ok(());
    }

    let mut builder = SessionBuilder::new()
        .endpoint(&args.endpoint)
        .segment_duration(Duration::from_secs(args.segment_secs));

    if let Some(device) = &args.device {
        builder = builder.camera_device(device);
    }
    if args.serial_uploads {
        builder = builder.upload_policy(UploadPolicy::Sequential);
    }
    if args.ordered {
        builder = builder.display_ordering(DisplayOrdering::Sequential);
    }
    if let Some(secs) = args.timeout_secs {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }

    let session = match builder.start().await {
        Ok(session) => session,
        Err(err) => {
            error!("failed to start capture session: {}", err);
            std::process::exit(1);
        }
    };

    let display = EmotionDisplay::new(session.predictions(), ConsoleSurface);
    let display_task = tokio::spawn(display.run());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    session.stop();
    display_task.abort();

    Ok(())
}
