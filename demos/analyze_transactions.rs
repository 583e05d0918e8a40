//! Transaction graph analysis example
//!
//! This example builds a small batch containing a laundering ring, a
//! smurfing burst, and a shell intermediary, then runs the detection
//! engine and prints the resulting report.

use chrono::{DateTime, TimeZone, Utc};
use fraud_graph_engine::{FraudGraphEngine, TransactionRecord};

fn tx(id: &str, from: &str, to: &str, timestamp: DateTime<Utc>) -> TransactionRecord {
    TransactionRecord {
        transaction_id: id.to_string(),
        sender_id: from.to_string(),
        receiver_id: to.to_string(),
        amount: 9_500.0,
        timestamp: Some(timestamp),
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    println!("=== Transaction Graph Fraud Detection ===\n");

    let base = Utc.with_ymd_and_hms(2024, 11, 6, 8, 0, 0).unwrap();
    let mut batch = Vec::new();

    // A three-account laundering ring, closed within the hour.
    batch.push(tx("TXN-RING-001", "ACC-ALPHA", "ACC-BRAVO", base));
    batch.push(tx(
        "TXN-RING-002",
        "ACC-BRAVO",
        "ACC-CHARLIE",
        base + chrono::Duration::minutes(20),
    ));
    batch.push(tx(
        "TXN-RING-003",
        "ACC-CHARLIE",
        "ACC-ALPHA",
        base + chrono::Duration::minutes(40),
    ));

    // A fan-out burst: one hub paying ten mules who all move the
    // money on the next day.
    for i in 0..10i64 {
        batch.push(tx(
            &format!("TXN-FAN-{:03}", i),
            "ACC-HUB",
            &format!("ACC-MULE-{:02}", i),
            base + chrono::Duration::minutes(5 * i),
        ));
        batch.push(tx(
            &format!("TXN-FWD-{:03}", i),
            &format!("ACC-MULE-{:02}", i),
            &format!("ACC-EXIT-{:02}", i),
            base + chrono::Duration::days(1) + chrono::Duration::minutes(i),
        ));
    }

    // A shell intermediary on a four-hop route.
    batch.push(tx(
        "TXN-CHAIN-001",
        "ACC-ORIGIN",
        "ACC-SHELL",
        base + chrono::Duration::hours(2),
    ));
    batch.push(tx(
        "TXN-CHAIN-002",
        "ACC-SHELL",
        "ACC-RELAY",
        base + chrono::Duration::hours(3),
    ));
    batch.push(tx(
        "TXN-CHAIN-003",
        "ACC-RELAY",
        "ACC-DEST",
        base + chrono::Duration::hours(4),
    ));

    let engine = FraudGraphEngine::new();
    let report = match engine.analyze(&batch) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("analysis failed: {}", e);
            return;
        }
    };

    println!("1. Summary");
    println!(
        "   Accounts analyzed: {}",
        report.summary.total_accounts_analyzed
    );
    println!(
        "   Suspicious accounts: {}",
        report.summary.suspicious_accounts_flagged
    );
    println!(
        "   Fraud rings: {}",
        report.summary.fraud_rings_detected
    );
    println!(
        "   Processing time: {}s\n",
        report.summary.processing_time_seconds
    );

    println!("2. Fraud Rings");
    for ring in &report.fraud_rings {
        println!(
            "   {} [{}] members: {:?} (risk {})",
            ring.ring_id, ring.pattern_type, ring.member_accounts, ring.risk_score
        );
    }
    println!();

    println!("3. Suspicious Accounts");
    for account in &report.suspicious_accounts {
        println!(
            "   {:<14} score {:>5.1}  patterns: {:?}  ring: {}",
            account.account_id,
            account.suspicion_score,
            account.detected_patterns,
            account.ring_id.as_deref().unwrap_or("-")
        );
    }
    println!();

    println!("4. JSON Report");
    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("serialization failed: {}", e),
    }
}
