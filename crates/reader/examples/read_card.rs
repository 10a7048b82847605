//! Example reading a contactless card from the first available reader

use cardlink_reader::{ReadOutcome, ReaderService, ServiceError, UsbConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let service = ReaderService::new(UsbConfig::default())?;

    let readers = service.scan();
    let Some(reader) = readers.first() else {
        println!("No card readers found!");
        return Ok(());
    };
    println!("Using reader: {} ({})", reader.model, reader.name);

    if !reader.has_permission {
        match service.request_permission(reader.device_id) {
            Ok(_) => println!("Permission requested; grant arrives asynchronously"),
            Err(ServiceError::Permission(msg)) => {
                println!("Permission request failed: {msg}");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("Place a card on the reader...");
    match service.read_card(reader.device_id)? {
        ReadOutcome::Success { card } => {
            println!("Card read:");
            println!("  UID:      {}", card.uid_string());
            println!("  Type:     {}", card.type_label());
            println!("  Capacity: {}", card.capacity());
            println!("  ATR:      {}", card.atr_hex());
            println!("  Read at:  {}", card.timestamp());
        }
        ReadOutcome::NoCard { message } => {
            println!("{message}");
        }
    }

    Ok(())
}
