//! `fieldcipher` CLI tool for envelopes, digests and tokens.

#![warn(clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fieldcipher::prelude::*;
use fieldcipher::token::DEFAULT_TOKEN_BYTES;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fieldcipher")]
#[command(about = "Encrypt, decrypt, hash and mask sensitive field values", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a value into an envelope (key from ENCRYPTION_KEY)
    Encrypt {
        /// Plain text to encrypt
        text: String,
    },
    /// Decrypt an envelope (key from ENCRYPTION_KEY)
    Decrypt {
        /// Envelope in nonce:tag:ciphertext form
        envelope: String,
    },
    /// Print the SHA-256 digest of a value
    Hash {
        /// Text to hash
        text: String,
    },
    /// Check a value against a digest
    Verify {
        /// Plain text
        text: String,
        /// Hex digest to compare against
        digest: String,
    },
    /// Generate a random hex token
    Token {
        /// Number of random bytes
        #[arg(short, long, default_value_t = DEFAULT_TOKEN_BYTES)]
        bytes: usize,
    },
    /// Mask a value for logging
    Mask {
        /// Text to mask
        text: String,
    },
    /// Run the encryption self-check (key from ENCRYPTION_KEY)
    Check,
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = if json { builder.json().try_init() } else { builder.try_init() };
    result.map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}

fn load_cipher() -> Result<FieldCipher> {
    FieldCipher::from_env().context("failed to load encryption key")
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Encrypt { text } => {
            let envelope = load_cipher()?.encrypt(&text).context("encryption failed")?;
            println!("{envelope}");
        }
        Commands::Decrypt { envelope } => {
            let plaintext = load_cipher()?.decrypt(&envelope).context("decryption failed")?;
            println!("{plaintext}");
        }
        Commands::Hash { text } => {
            println!("{}", hash(&text));
        }
        Commands::Verify { text, digest } => {
            if compare_hash(&text, &digest) {
                println!("match");
            } else {
                println!("mismatch");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Token { bytes } => {
            println!("{}", generate_token(bytes));
        }
        Commands::Mask { text } => {
            println!("{}", mask_sensitive(&text));
        }
        Commands::Check => {
            load_cipher()?.self_check().context("self-check failed")?;
            println!("ok");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.json)?;
    run(cli.command)
}
