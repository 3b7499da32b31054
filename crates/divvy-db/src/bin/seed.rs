//! # Seed Data Generator
//!
//! Populates the database with a demo friend group, a handful of expenses,
//! and one settlement payment, then prints the resulting balances and a
//! settle-up plan.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p divvy-db --bin seed
//!
//! # Specify database path
//! cargo run -p divvy-db --bin seed -- --db ./data/divvy.db
//! ```

use std::env;

use divvy_core::{
    net_balances_in, settle_up, Currency, Group, LedgerEntry, LedgerState, Money, Participant,
    PaymentRecord, Percentage, SplitPolicy,
};
use divvy_db::{Database, DbConfig};

/// Demo expenses: (payer index, description, total in paise, policy).
fn demo_expenses() -> Vec<(usize, &'static str, i64, SplitPolicy)> {
    vec![
        (0, "Beach shack dinner", 90_000, SplitPolicy::Equal),
        (1, "Scooter rentals", 120_000, SplitPolicy::Shares { shares: vec![2, 1, 1] }),
        (
            2,
            "Groceries",
            45_000,
            SplitPolicy::Percentage {
                percentages: vec![
                    Percentage::from_percent(50),
                    Percentage::from_percent(25),
                    Percentage::from_percent(25),
                ],
            },
        ),
        (0, "Airport taxi", 60_000, SplitPolicy::Equal),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug surfaces per-row repository logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./divvy_dev.db");

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
                println!("Divvy Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./divvy_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Divvy Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::connect(&config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.ledger().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} ledger entries", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Participants and group
    let names = ["Aditi", "Ben", "Chitra"];
    let mut members = Vec::new();
    for name in names {
        let p = Participant::new(name);
        db.participants().insert(&p).await?;
        members.push(p);
    }
    let member_ids: Vec<String> = members.iter().map(|m| m.id.clone()).collect();

    let group = Group::new("Goa Trip", member_ids.clone());
    db.groups().insert(&group).await?;
    println!("✓ Created group '{}' with {} members", group.name, members.len());

    let flat = Group::new("Flat 4B", vec![members[0].id.clone(), members[1].id.clone()]);
    db.groups().insert(&flat).await?;
    println!("✓ Created group '{}' with {} members", flat.name, flat.member_ids.len());

    // Expenses
    let state = LedgerState::new();
    println!();
    println!("Recording expenses...");

    for (payer_idx, description, total_paise, policy) in demo_expenses() {
        let record = divvy_core::ExpenseRecord::new_in_group(
            &group,
            members[payer_idx].id.clone(),
            Money::from_minor(total_paise, Currency::Inr),
            &policy,
            &member_ids,
            Some(description.to_string()),
        )?;
        let entry = LedgerEntry::Expense(record);

        state.with_ledger_mut(|ledger| ledger.append(entry.clone()))?;
        db.ledger().save(&entry).await?;

        println!(
            "  {} paid ₹{}.{:02} for {}",
            members[payer_idx].display_name,
            total_paise / 100,
            total_paise % 100,
            description
        );
    }

    // One expense in the second group
    let rent_split = divvy_core::ExpenseRecord::new_in_group(
        &flat,
        members[0].id.clone(),
        Money::from_minor(1_500_000, Currency::Inr),
        &SplitPolicy::Equal,
        &flat.member_ids,
        Some("May rent".to_string()),
    )?;
    let entry = LedgerEntry::Expense(rent_split);
    state.with_ledger_mut(|ledger| ledger.append(entry.clone()))?;
    db.ledger().save(&entry).await?;
    println!("  {} paid ₹15000.00 for May rent", members[0].display_name);

    // One partial settlement
    let payment = PaymentRecord::new(
        Some(group.id.clone()),
        members[1].id.clone(),
        members[0].id.clone(),
        Money::from_minor(20_000, Currency::Inr),
    )?;
    let entry = LedgerEntry::Payment(payment);
    state.with_ledger_mut(|ledger| ledger.append(entry.clone()))?;
    db.ledger().save(&entry).await?;
    println!(
        "  {} paid ₹200.00 to {}",
        members[1].display_name, members[0].display_name
    );

    // Balances
    println!();
    println!("Net balances:");
    let plan = state.with_ledger(|ledger| {
        let net = net_balances_in(ledger, Some(&group.id), Currency::Inr)?;
        let mut rows: Vec<_> = net.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        for (id, balance) in rows {
            let name = members
                .iter()
                .find(|m| &m.id == id)
                .map(|m| m.display_name.as_str())
                .unwrap_or(id.as_str());
            println!("  {:<8} {:>10}", name, format_signed(balance));
        }
        settle_up(ledger, Some(&group.id), Currency::Inr)
    })?;

    println!();
    println!("Settle-up plan ({} transfers):", plan.len());
    for payment in &plan {
        let from = display_name(&members, &payment.from_id);
        let to = display_name(&members, &payment.to_id);
        println!(
            "  {} → {}  ₹{}.{:02}",
            from,
            to,
            payment.amount_minor / 100,
            payment.amount_minor % 100
        );
    }

    let persisted = db.ledger().count().await?;
    println!();
    println!("✓ Seed complete! {} ledger entries persisted", persisted);

    Ok(())
}

fn display_name<'a>(members: &'a [Participant], id: &'a str) -> &'a str {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.display_name.as_str())
        .unwrap_or(id)
}

fn format_signed(balance: &Money) -> String {
    let minor = balance.minor_units();
    let sign = if minor < 0 { "-" } else { "+" };
    let abs = minor.abs();
    format!("{}₹{}.{:02}", sign, abs / 100, abs % 100)
}
