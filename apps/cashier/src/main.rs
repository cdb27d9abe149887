//! # Cashier Shell
//!
//! A minimal line-oriented front end for a LanePOS register.
//!
//! ## Commands
//! ```text
//! scan <id>        resolve a product by exact catalog key
//! search <term>    resolve by name search (may need `pick`)
//! pick <n>         answer an ambiguous search (1-based)
//! remove <id>      remove a whole line from the cart
//! cash <amount>    settle with cash, e.g. `cash 40.00`
//! card             settle with the simulated card terminal
//! mobile           settle with the simulated mobile wallet
//! cancel           void the current transaction
//! quit             exit
//! ```
//!
//! Register events stream to stdout as JSON lines; a real deployment
//! points a proper UI at the same stream.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lane_core::CatalogEntry;
use lane_register::{InMemoryCatalog, Register, RegisterConfig, Tender};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = RegisterConfig::from_env();
    info!(tax_rate_bps = config.tax_rate_bps, "starting cashier shell");

    let register = Arc::new(Register::with_simulated_terminal(
        Arc::new(seed_catalog()),
        &config,
    ));

    // Event printer: everything the presentation layer would render
    let mut events = register.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(%err, "failed to serialize event"),
            }
        }
    });

    println!("lane-cashier ready. Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if !dispatch(&register, line.trim()).await {
            break;
        }
    }
}

/// Executes one command line. Returns false when the shell should exit.
async fn dispatch(register: &Register, line: &str) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let outcome = match command {
        "" => Ok(()),
        "help" => {
            print_help();
            Ok(())
        }
        "scan" => register.resolve_by_exact_id(rest).map(|_| ()),
        "search" => register.resolve_by_search(rest).map(|_| ()),
        "pick" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => register.select_candidate(n - 1).map(|_| ()),
            _ => {
                eprintln!("usage: pick <n> (1-based candidate number)");
                Ok(())
            }
        },
        "remove" => register.remove_item(rest).map(|_| ()),
        "cash" => match parse_cents(rest) {
            Some(tendered_cents) => register
                .settle_payment(Tender::Cash { tendered_cents })
                .await
                .map(|_| ()),
            None => {
                eprintln!("usage: cash <amount>, e.g. cash 40.00");
                Ok(())
            }
        },
        "card" => register.settle_payment(Tender::Card).await.map(|_| ()),
        "mobile" => register.settle_payment(Tender::Mobile).await.map(|_| ()),
        "cancel" => register.cancel(),
        "quit" | "exit" => return false,
        other => {
            eprintln!("unknown command: {other} (try `help`)");
            Ok(())
        }
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
    }
    true
}

fn print_help() {
    println!("commands:");
    println!("  scan <id>       add a product by catalog key");
    println!("  search <term>   find products by name");
    println!("  pick <n>        choose from an ambiguous search (1-based)");
    println!("  remove <id>     remove a whole line");
    println!("  cash <amount>   settle with cash (e.g. cash 40.00)");
    println!("  card | mobile   settle asynchronously");
    println!("  cancel          void the transaction");
    println!("  quit            exit");
}

/// Parses a dollar amount like `40`, `40.5`, or `40.00` into cents.
/// No floating point: the string is split at the decimal point.
fn parse_cents(input: &str) -> Option<i64> {
    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let dollars: i64 = whole.parse().ok()?;
    let cents: i64 = if frac.is_empty() {
        0
    } else {
        // "5" means 50 cents, "05" means 5
        format!("{frac:0<2}").parse().ok()?
    };

    Some(dollars * 100 + cents)
}

/// Demo catalog for development.
fn seed_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    for entry in [
        CatalogEntry::new("123456789", "Coffee Mug", 1299),
        CatalogEntry::new("987654321", "T-Shirt", 2499),
        CatalogEntry::new("456789123", "Notebook", 850),
        CatalogEntry::new("789123456", "Pen", 299),
    ] {
        // Seed data is static and valid
        catalog.insert(entry).expect("invalid seed entry");
    }
    catalog
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=lane_register=trace` - Trace the register only
/// - Default: INFO level, with debug for the lane crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lane_core=debug,lane_register=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
