//! `keytool` — operational sidecar binary entry point.
//!
//! Startup sequence:
//! 1. Parse the CLI and load [`Config`] from environment variables.
//! 2. Initialise structured JSON logging (stderr; stdout carries output).
//! 3. Build an [`Encryptor`] from `--keys` / `ENCRYPTION_KEYS` and dispatch
//!    the subcommand.
//!
//! Values flow through stdin/stdout one per invocation so the tool composes
//! with shell pipelines during migrations.

mod config;
mod telemetry;

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use fieldcrypt::Encryptor;

#[derive(Parser)]
#[command(name = "keytool", about = "Key material tooling for column encryption at rest")]
struct Cli {
    /// Key material override; falls back to the ENCRYPTION_KEYS environment
    /// variable.
    #[arg(long)]
    keys: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fresh 32-byte key material safe to place in an environment
    /// variable.
    Generate,
    /// Print the fingerprints of the configured keys.
    Fingerprint,
    /// Report whether the configured material can encrypt and rotate.
    Status,
    /// Encrypt one plaintext value from stdin to a tagged ciphertext.
    Encrypt,
    /// Decrypt one stored value from stdin.
    Decrypt,
    /// Re-encrypt one stored value from stdin under the primary key.
    Reencrypt,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        eprintln!("ERROR: keytool configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "keytool starting");

    // -----------------------------------------------------------------------
    // 3. Dispatch
    // -----------------------------------------------------------------------
    // Generate works without configured material; everything else builds an
    // encryptor from it.
    if let Commands::Generate = cli.command {
        println!("{}", fieldcrypt::generate_key_material());
        return Ok(());
    }

    let material = cli.keys.or(cfg.encryption_keys);
    let encryptor = build_encryptor(material.as_deref())?;

    match cli.command {
        Commands::Generate => unreachable!(),
        Commands::Fingerprint => {
            println!("primary   {}", display_hash(encryptor.primary_key_hash()));
            println!("secondary {}", display_hash(encryptor.secondary_key_hash()));
        }
        Commands::Status => {
            println!("configured_to_encrypt {}", encryptor.configured_to_encrypt());
            println!("configured_to_rotate  {}", encryptor.configured_to_rotate());
        }
        Commands::Encrypt => {
            let value = read_stdin()?;
            println!("{}", encryptor.encrypt(&value)?);
        }
        Commands::Decrypt => {
            let value = read_stdin()?;
            println!("{}", encryptor.decrypt(&value)?);
        }
        Commands::Reencrypt => {
            let value = read_stdin()?;
            let plaintext = encryptor
                .decrypt(&value)
                .context("stored value does not decrypt under the configured keys")?;
            println!("{}", encryptor.encrypt(&plaintext)?);
        }
    }

    Ok(())
}

fn build_encryptor(material: Option<&str>) -> Result<Encryptor> {
    match material {
        None => Ok(Encryptor::noop()),
        Some(material) => {
            Encryptor::from_key_material(material).context("invalid key material")
        }
    }
}

fn display_hash(hash: &str) -> &str {
    if hash.is_empty() {
        "(none)"
    } else {
        hash
    }
}

/// Read one value from stdin, dropping a single trailing newline so piped
/// `echo` output round-trips exactly.
fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read value from stdin")?;
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_encryptor_without_material_is_noop() {
        let enc = build_encryptor(None).unwrap();
        assert!(!enc.configured_to_encrypt());
    }

    #[test]
    fn build_encryptor_rejects_bad_material() {
        assert!(build_encryptor(Some("short")).is_err());
    }

    #[test]
    fn build_encryptor_accepts_dual_keys() {
        let material = format!("{},{}", "a".repeat(32), "b".repeat(32));
        let enc = build_encryptor(Some(&material)).unwrap();
        assert!(enc.configured_to_rotate());
    }

    #[test]
    fn display_hash_substitutes_placeholder() {
        assert_eq!(display_hash(""), "(none)");
        assert_eq!(display_hash("abc123"), "abc123");
    }
}
