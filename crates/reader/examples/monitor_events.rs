//! Example monitoring reader attach/detach events

use cardlink_reader::{ReaderEvent, ReaderService, UsbConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let service = ReaderService::new(UsbConfig::default())?;

    println!("Initially detected readers:");
    for (i, reader) in service.scan().iter().enumerate() {
        println!("  {}. {}", i + 1, reader.model);
    }

    println!("\nMonitoring for reader events. Press Ctrl+C to exit.");
    let events = service.events();

    loop {
        match events.recv()? {
            ReaderEvent::Attached(device) => {
                println!("Reader attached: {} [{}]", device.model, device.name);
            }
            ReaderEvent::Detached(device) => {
                println!("Reader detached: {} [{}]", device.model, device.name);
            }
        }
    }
}
