use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use neft_dashboard::{create_month_table, insert_bank_row};

/// A utility for creating a test database for the NEFT dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The sample banks and their per-month figures.
///
/// Amounts are in rupees. Figures drift month to month so the trend charts
/// have some shape to them.
const SAMPLE_BANKS: [(&str, i64, f64, i64, f64); 5] = [
    ("Axis Bank", 52_000, 8_400_000_000.0, 48_000, 7_900_000_000.0),
    (
        "Bank of Baroda",
        31_000,
        4_100_000_000.0,
        29_500,
        3_800_000_000.0,
    ),
    ("Canara Bank", 27_800, 3_500_000_000.0, 26_100, 3_300_000_000.0),
    ("HDFC Bank", 88_400, 15_200_000_000.0, 91_200, 16_100_000_000.0),
    (
        "State Bank of India",
        132_000,
        21_700_000_000.0,
        140_500,
        23_400_000_000.0,
    ),
];

/// The months to create tables for.
const SAMPLE_MONTHS: [(i32, u8); 6] = [
    (2022, 10),
    (2022, 11),
    (2022, 12),
    (2023, 1),
    (2023, 2),
    (2023, 3),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    for (index, (year, month)) in SAMPLE_MONTHS.into_iter().enumerate() {
        println!("Creating table for {year}-{month:02}...");
        create_month_table(&conn, year, month)?;

        // Scale each month a little so the figures are not flat.
        let growth = 1.0 + index as f64 * 0.03;

        for (bank, outward_count, outward_amount, inward_count, inward_amount) in SAMPLE_BANKS {
            insert_bank_row(
                &conn,
                year,
                month,
                bank,
                (outward_count as f64 * growth) as i64,
                outward_amount * growth,
                (inward_count as f64 * growth) as i64,
                inward_amount * growth,
            )?;
        }
    }

    println!("Success!");

    Ok(())
}
