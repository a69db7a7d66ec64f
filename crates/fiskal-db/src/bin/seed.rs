//! # Seed Data Generator
//!
//! Populates the database with sample documents for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p fiskal-db --bin seed
//!
//! # Specify database path
//! cargo run -p fiskal-db --bin seed -- --db ./data/fiskal.db
//! ```
//!
//! Creates a handful of invoices and proformas across recent months, a
//! periodic calculation, and one shared document with a payment link, so
//! filtering, reports and public resolution all have data to work with.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fiskal_core::{Counterparty, DocumentStatus, LineItemInput, PaymentMethod};
use fiskal_db::{
    Database, DbConfig, DocumentRegistry, NewCalculation, NewPaymentLink, NewTradeDocument,
};

/// Sample counterparties with realistic registry data.
const COUNTERPARTIES: &[(&str, &str, &str)] = &[
    ("Alfa Sistem doo", "Bulevar oslobođenja 12, Beograd", "101234567"),
    ("Beta Plus doo", "Zmaj Jovina 4, Novi Sad", "102345678"),
    ("Gama Trade", "Kralja Petra 33, Niš", "103456789"),
    ("Delta Soft", "Cara Dušana 7, Kragujevac", "104567890"),
];

/// Sample billing lines: description, quantity (milli), unit price
/// (minor), VAT bps.
const LINES: &[(&str, i64, i64, u32)] = &[
    ("Izrada veb sajta", 1_000, 12_000_000, 2000),
    ("Održavanje, mesečno", 1_000, 1_500_000, 2000),
    ("Konsultacije, sat", 2_500, 600_000, 2000),
    ("Hosting, godišnje", 1_000, 2_400_000, 1000),
    ("Obuka tima", 3_000, 900_000, 1000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./fiskal_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fiskal Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fiskal_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Fiskal Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let registry = DocumentRegistry::new(db);

    let today = Utc::now().date_naive();

    // A few invoices across the last three months
    for (offset, (name, address, tax_id)) in COUNTERPARTIES.iter().enumerate() {
        let issued = shift_months(today, offset as i32 % 3);
        let doc = registry
            .create_invoice(NewTradeDocument {
                counterparty: Counterparty {
                    name: name.to_string(),
                    address: address.to_string(),
                    tax_id: Some(tax_id.to_string()),
                    registration_id: None,
                },
                issue_date: issued,
                due_date: issued + Duration::days(15),
                payment_method: PaymentMethod::BankTransfer,
                line_items: sample_lines(offset),
                note: Some("Hvala na poverenju.".to_string()),
            })
            .await?;
        println!("  {} → {} ({})", doc.id, name, doc.gross_total());

        // Walk the first two through the lifecycle so reports have
        // something in every status
        if offset == 0 {
            registry
                .transition(&doc.id, DocumentStatus::AwaitingPayment)
                .await?;
            registry.transition(&doc.id, DocumentStatus::Paid).await?;
        } else if offset == 1 {
            registry
                .transition(&doc.id, DocumentStatus::AwaitingPayment)
                .await?;
            registry.transition(&doc.id, DocumentStatus::Sent).await?;
        }
    }

    // One proforma
    let proforma = registry
        .create_proforma(NewTradeDocument {
            counterparty: Counterparty {
                name: "Gama Trade".to_string(),
                address: "Kralja Petra 33, Niš".to_string(),
                tax_id: None,
                registration_id: None,
            },
            issue_date: today,
            due_date: today + Duration::days(10),
            payment_method: PaymentMethod::BankTransfer,
            line_items: sample_lines(2),
            note: None,
        })
        .await?;
    println!("  {} → Gama Trade ({})", proforma.id, proforma.gross_total());

    // Last month's calculation
    let calc = registry
        .create_calculation(NewCalculation {
            counterparty: Counterparty {
                name: "Moja radnja".to_string(),
                address: "Svetogorska 2, Beograd".to_string(),
                tax_id: None,
                registration_id: None,
            },
            issue_date: today,
            period_month: shift_months(today, 1).month(),
            period_year: shift_months(today, 1).year(),
            gross_turnover_minor: 84_000_000,
            vat_rate_bps: 2000,
            note: None,
        })
        .await?;
    println!("  {} → obračun ({})", calc.id, calc.gross_total());

    // Share the proforma so public resolution has a live token
    let token = registry.generate_share_token(&proforma.id).await?;
    println!("  Share URL: /public/predracun/{}?token={}", proforma.id, token);

    // What a render consumer (PDF, email, public page) receives
    let view = registry
        .resolve_public("predracun", &proforma.id, Some(&token))
        .await?;
    println!("  Public payload:\n{}", serde_json::to_string_pretty(&view)?);

    // And one quick payment link
    let link = registry
        .create_payment_link(NewPaymentLink {
            name: "Avans za projekat".to_string(),
            price_minor: 2_500_000,
            description: Some("Brza uplata bez fakture".to_string()),
            expires_at: Some(Utc::now() + Duration::days(30)),
        })
        .await?;
    println!("  Payment URL: /pay/{}", link.id);

    info!("Seed complete");
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Picks a rotating slice of the sample lines.
fn sample_lines(offset: usize) -> Vec<LineItemInput> {
    LINES
        .iter()
        .cycle()
        .skip(offset)
        .take(2)
        .map(|(description, quantity_milli, unit_price_minor, vat_rate_bps)| LineItemInput {
            description: description.to_string(),
            quantity_milli: *quantity_milli,
            unit_price_minor: *unit_price_minor,
            vat_rate_bps: *vat_rate_bps,
        })
        .collect()
}

/// Moves a date back by whole months, clamping to the 1st.
fn shift_months(date: NaiveDate, months_back: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 - months_back;
    while month < 1 {
        month += 12;
        year -= 1;
    }
    NaiveDate::from_ymd_opt(year, month as u32, 1).unwrap_or(date)
}
