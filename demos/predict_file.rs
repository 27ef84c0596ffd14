//! Upload a recorded WebM file to a prediction endpoint and print the
//! rendered result line.
//!
//! Usage: predict_file <endpoint> <file.webm>

use emocam::display::render;
use emocam::{PredictClient, Segment};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let endpoint = args.next().unwrap_or_else(|| {
        eprintln!("usage: predict_file <endpoint> <file.webm>");
        std::process::exit(2);
    });
    let path = args.next().unwrap_or_else(|| {
        eprintln!("usage: predict_file <endpoint> <file.webm>");
        std::process::exit(2);
    });

    let data = std::fs::read(&path)?;
    let segment = Segment::new(0, data, Duration::from_secs(5));

    let client = PredictClient::new(&endpoint, Some(Duration::from_secs(30)))?;
    let prediction = client.predict(&segment).await?;

    println!("{}", render(&prediction));
    Ok(())
}
