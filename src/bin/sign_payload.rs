//! Dev utility that produces a `svix-signature` header value for a payload
//! file, using the same canonicalization as the webhook verifier.
//!
//! Prints exactly the header value to stdout so shell scripts can capture it;
//! all diagnostics go to stderr. Signs the exact file bytes - no trailing
//! newline is added, so deliver the file with `curl --data-binary @file`.

use std::env;
use std::fs;
use std::process::exit;
use std::time::{SystemTime, UNIX_EPOCH};

use domain::{Signer, SigningSecret};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: sign_payload <payload_file> [timestamp] [msg_id]");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  payload_file  Path to the JSON payload file");
        eprintln!("  timestamp     Unix timestamp (defaults to current time)");
        eprintln!("  msg_id        Message ID (defaults to \"msg_<timestamp>\")");
        exit(1);
    }

    dotenvy::dotenv().ok();

    let raw_secret = match env::var("CLERK_WEBHOOK_SIGNING_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            eprintln!(
                "[ERROR] CLERK_WEBHOOK_SIGNING_SECRET is not set; add it to .env or the environment"
            );
            exit(1);
        }
    };

    let secret = match SigningSecret::from_provider_string(&raw_secret) {
        Ok(secret) => secret,
        Err(e) => {
            eprintln!("[ERROR] CLERK_WEBHOOK_SIGNING_SECRET is invalid: {e}");
            exit(1);
        }
    };

    let payload_file = &args[1];
    let body = match fs::read(payload_file) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("[ERROR] Failed to read {payload_file}: {e}");
            exit(1);
        }
    };

    let timestamp = match args.get(2) {
        Some(raw) => match raw.parse::<i64>() {
            Ok(timestamp) => timestamp,
            Err(_) => {
                eprintln!("[ERROR] Timestamp must be an integer, got: {raw}");
                exit(1);
            }
        },
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0),
    };

    let msg_id = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| format!("msg_{timestamp}"));

    let header = match Signer::new(secret).sign(&msg_id, timestamp, &body) {
        Ok(header) => header,
        Err(e) => {
            eprintln!("[ERROR] Failed to sign payload: {e}");
            exit(1);
        }
    };

    // Only the header value goes to stdout.
    print!("{header}");

    eprintln!();
    eprintln!("[INFO] Message ID: {msg_id}, Timestamp: {timestamp}");
    eprintln!("[INFO] Deliver with:");
    eprintln!("  curl -X POST \"http://localhost:4000/webhooks/clerk\" \\");
    eprintln!("    -H \"svix-id: {msg_id}\" \\");
    eprintln!("    -H \"svix-timestamp: {timestamp}\" \\");
    eprintln!("    -H \"svix-signature: {header}\" \\");
    eprintln!("    -H \"Content-Type: application/json\" \\");
    eprintln!("    --data-binary @{payload_file}");
}
