use clap::{Parser, Subcommand};
use drain_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

const BAR_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "drain")]
#[command(about = "Current consumption calculator for battery-powered devices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a device's current draw
    Add {
        /// Device name (defaults to "Unknown Device")
        #[arg(long, default_value = "")]
        name: String,

        /// Current in microamps
        #[arg(long, allow_hyphen_values = true)]
        current: String,

        /// Run time in seconds
        #[arg(long, allow_hyphen_values = true)]
        duration: String,
    },

    /// List logged devices
    List,

    /// Show battery usage against capacity (default)
    Status,

    /// Clear all logged devices and delete the ledger file
    Reset,
}

fn main() -> ExitCode {
    drain_core::logging::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let ledger_path = config.data.ledger_path();
    tracing::debug!("Using ledger file {:?}", ledger_path);

    let store = JsonFileStore::new(ledger_path);
    let capacity = MilliampHours(config.battery.capacity_mah);

    match cli.command {
        // Reset must work even when the file can no longer be read
        Some(Commands::Reset) => cmd_reset(store, capacity),
        Some(Commands::Add {
            name,
            current,
            duration,
        }) => {
            let mut ledger = Ledger::open(store, capacity)?;
            cmd_add(&mut ledger, &name, &current, &duration)
        }
        Some(Commands::List) => {
            cmd_list(&Ledger::open(store, capacity)?);
            Ok(())
        }
        Some(Commands::Status) | None => {
            cmd_status(&Ledger::open(store, capacity)?);
            Ok(())
        }
    }
}

fn cmd_add(
    ledger: &mut Ledger<JsonFileStore>,
    name: &str,
    current: &str,
    duration: &str,
) -> Result<()> {
    let outcome = ledger.add_record(name, current, duration)?;

    println!("✓ Added: {}", outcome.record);
    println!("  Total: {:.2} / {:.2}", outcome.total, ledger.capacity());

    if outcome.capacity_exceeded {
        println!("\n⚠ Battery capacity exceeded!");
    }

    Ok(())
}

fn cmd_list(ledger: &Ledger<JsonFileStore>) {
    if ledger.is_empty() {
        println!("No devices logged.");
        return;
    }

    for record in ledger.records() {
        println!("{}", record);
    }
    println!();
    println!("Total: {:.6}", ledger.total());
}

fn cmd_reset(mut store: JsonFileStore, capacity: MilliampHours) -> Result<()> {
    match Ledger::open(store.clone(), capacity) {
        Ok(mut ledger) => {
            let removed = ledger.len();
            ledger.reset()?;
            println!("✓ Ledger reset ({} records removed)", removed);
        }
        Err(e @ Error::CorruptStore { .. }) => {
            tracing::warn!("Discarding unreadable ledger: {}", e);
            store.delete()?;
            println!("✓ Ledger reset (unreadable ledger file removed)");
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

fn cmd_status(ledger: &Ledger<JsonFileStore>) {
    println!("Battery usage");
    println!(
        "[{}] {:.2} / {:.2}",
        usage_bar(ledger.usage_ratio(), BAR_WIDTH),
        ledger.total(),
        ledger.capacity()
    );
    println!("  Devices:   {}", ledger.len());
    println!("  Remaining: {:.2}", ledger.remaining());

    if ledger.is_over_capacity() {
        println!("\n⚠ Battery capacity exceeded!");
    }
}

/// Fill `width` cells in proportion to `ratio`, clamped to the bar
fn usage_bar(ratio: f64, width: usize) -> String {
    let filled = if ratio.is_finite() {
        (ratio.clamp(0.0, 1.0) * width as f64).round() as usize
    } else {
        0
    };
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_bar_bounds() {
        assert_eq!(usage_bar(0.0, 10), "..........");
        assert_eq!(usage_bar(0.5, 10), "#####.....");
        assert_eq!(usage_bar(3.0, 10), "##########");
        assert_eq!(usage_bar(f64::NAN, 4), "....");
    }
}
