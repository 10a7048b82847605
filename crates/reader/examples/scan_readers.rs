//! Example listing attached card readers

use cardlink_reader::{ReaderService, UsbConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let service = ReaderService::new(UsbConfig::default())?;
    let readers = service.scan();

    if readers.is_empty() {
        println!("No card readers found!");
        return Ok(());
    }

    println!("Found {} card readers:", readers.len());
    for (i, reader) in readers.iter().enumerate() {
        println!("  {}. {} [{}]", i + 1, reader.model, reader.name);
        println!("     vendor: {:04x}:{:04x}", reader.vendor_id, reader.product_id);
        println!("     specifications: {}", reader.specifications);
        println!(
            "     permission: {}",
            if reader.has_permission { "granted" } else { "not granted" }
        );
    }

    Ok(())
}
