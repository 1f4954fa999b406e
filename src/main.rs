use clap::Parser;
use fieldbus_serial::config::{Config, ConfigError, ConfigLoader};
use fieldbus_serial::logging::init_logging;
use fieldbus_serial::port::{available_ports, NativeDriver, Parity};
use fieldbus_serial::BoundedPort;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Send one frame over a serial line and print the reply.",
    long_about = "Opens a serial device with the configured line parameters, writes an optional hex frame, reads up to N bytes within the timeout and prints them as hex."
)]
struct Args {
    /// Configuration file (defaults to the standard resolution order).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device path, overriding the configuration.
    #[arg(short, long)]
    address: Option<String>,

    /// Baud rate, overriding the configuration.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Parity (N, E or O), overriding the configuration.
    #[arg(long)]
    parity: Option<Parity>,

    /// Read/write timeout in milliseconds, overriding the configuration.
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// List serial devices and exit.
    #[arg(short, long)]
    list: bool,

    /// Frame to send, as hex (e.g. "01 03 00 00 00 01 84 0A").
    #[arg(short, long)]
    write: Option<String>,

    /// Number of bytes to read after writing.
    #[arg(short, long, default_value_t = 0)]
    read: usize,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ':' || c == ',')
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .collect();

    if !digits.is_ascii() {
        return Err(format!("invalid hex in '{input}'"));
    }
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{input}'"));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| format!("invalid hex byte '{}'", &digits[i..i + 2]))
        })
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// File and environment configuration with the command-line overrides on top.
fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?.into_config(),
        None => ConfigLoader::load()?.into_config(),
    };

    if let Some(address) = &args.address {
        config.serial.address = address.clone();
    }
    if let Some(baud) = args.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(parity) = args.parity {
        config.serial.parity = parity;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.serial.timeout_ms = timeout_ms;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;

    // Validation warnings need the subscriber in place.
    init_logging(&config.logging)?;
    config.validate()?;

    if args.list {
        for name in available_ports()? {
            println!("{name}");
        }
        return Ok(());
    }

    let frame = args.write.as_deref().map(parse_hex).transpose()?;
    let port_config = config.serial.to_port_config();

    let mut port = BoundedPort::new(NativeDriver::new());
    port.open(&port_config)?;
    info!(
        "Opened {} at {}",
        port_config.address,
        port_config.line_parameters()
    );

    let mut written = 0;
    if let Some(frame) = &frame {
        written = port.write(frame)?;
    }

    let mut received = Vec::new();
    if args.read > 0 {
        let mut buffer = vec![0u8; args.read];
        let n = port.read(&mut buffer)?;
        received.extend_from_slice(&buffer[..n]);
    }

    port.close()?;

    if args.json {
        let output = json!({
            "address": port_config.address,
            "line": port_config.line_parameters().to_string(),
            "bytes_written": written,
            "bytes_read": received.len(),
            "data": to_hex(&received),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !received.is_empty() {
        println!("{}", to_hex(&received));
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
