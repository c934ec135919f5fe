use clap::{ArgAction, Parser, Subcommand};
use sshbox::cli::{decrypt_file, encrypt_file, show_info, DecryptOptions, EncryptOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Version info from build.rs
const VERSION: &str = env!("SSHBOX_VERSION");
const BUILD: &str = env!("SSHBOX_BUILD");
const PROFILE: &str = env!("SSHBOX_PROFILE");
const GIT_HASH: &str = env!("SSHBOX_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "sshbox")]
#[command(author, about = "Encrypt files to an SSH RSA public key", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file to an ssh-rsa public key
    #[command(alias = "e")]
    Encrypt {
        /// Public key file or http(s) URL
        #[arg(short, long, env = "SSHBOX_KEY")]
        key: String,

        /// ASCII armor the box
        #[arg(short, long)]
        armor: bool,

        /// File to encrypt
        source: PathBuf,

        /// Where to write the box
        target: PathBuf,
    },

    /// Decrypt a box with an RSA private key
    #[command(alias = "d")]
    Decrypt {
        /// Private key file (PEM, RSA PRIVATE KEY)
        #[arg(short, long, env = "SSHBOX_KEY")]
        key: String,

        /// Box to decrypt, binary or armored
        source: PathBuf,

        /// Where to write the recovered file
        target: PathBuf,
    },

    /// Show information about a box
    #[command(alias = "i")]
    Info {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Box to inspect
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Unable to set global default subscriber");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("sshbox {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.verbose);

    let result = match command {
        Commands::Encrypt {
            key,
            armor,
            source,
            target,
        } => {
            let options = EncryptOptions { key, armor };
            encrypt_file(&source, &target, &options).map(|written| {
                println!("Encrypted {} to {} ({} bytes)", source.display(), target.display(), written);
            })
        }

        Commands::Decrypt { key, source, target } => {
            let options = DecryptOptions { key };
            decrypt_file(&source, &target, &options).map(|len| {
                println!("Decrypted {} bytes to {}", len, target.display());
            })
        }

        Commands::Info { json, file } => show_info(&file, json).map(|info| print!("{}", info)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
