//! op-binding CLI
//!
//! Small front end over the library:
//! - `op-binding version`
//! - `op-binding list <users|groups|vaults>`
//! - `op-binding get <user|group|vault> <name-or-id>`
//!
//! Results are printed as JSON. The session is created on first use and
//! signed out when the command finishes.

use std::env;
use std::process;

use serde::Serialize;

use op_binding::{Config, Credentials, OnePassword, OpExecutor};

/// Credentials and settings read from the environment
struct Settings {
    /// Library configuration from `OP_BINDING_*` variables
    config: Config,
    /// Sign-in address, e.g. https://my-team.1password.com
    sign_in_address: Option<String>,
    /// Account email address
    email_address: Option<String>,
    /// Account secret key
    secret_key: Option<String>,
}

impl Settings {
    fn from_env() -> op_binding::Result<Self> {
        Ok(Self {
            config: Config::from_env()?,
            sign_in_address: env::var("OP_SIGNIN_ADDRESS").ok(),
            email_address: env::var("OP_EMAIL_ADDRESS").ok(),
            secret_key: env::var("OP_SECRET_KEY").ok(),
        })
    }

    fn credentials(&self) -> Result<Credentials, String> {
        let sign_in_address = required(&self.sign_in_address, "OP_SIGNIN_ADDRESS")?;
        let email_address = required(&self.email_address, "OP_EMAIL_ADDRESS")?;
        let secret_key = required(&self.secret_key, "OP_SECRET_KEY")?;
        if env::var("OP_PASSWORD").is_err() {
            return Err("OP_PASSWORD is not set".to_string());
        }

        Ok(Credentials::new(
            sign_in_address,
            email_address,
            secret_key,
            // Read on every sign-in so the password is not kept around.
            || env::var("OP_PASSWORD").unwrap_or_default(),
        ))
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String, String> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{} is not set", name))
}

fn env_bool(name: &str) -> bool {
    env::var(name).is_ok_and(|v| v == "1" || v == "true")
}

fn main() {
    if env_bool("OP_BINDING_DEBUG") {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();
    }

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        process::exit(0);
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&settings, &args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(settings: &Settings, args: &[String]) -> Result<(), String> {
    let command = args[0].as_str();

    if command == "version" || command == "--version" {
        let op = op_binding::Op::new(settings.config.clone());
        let version = op.version().map_err(|e| e.to_string())?;
        println!("op-binding version: {}", env!("CARGO_PKG_VERSION"));
        println!("op version: {}", version);
        return Ok(());
    }

    let client = OnePassword::new(settings.config.clone(), settings.credentials()?);
    let kind = args.get(1).map(String::as_str);

    match (command, kind) {
        ("list", Some("users")) => print_json(&client.users().list()),
        ("list", Some("groups")) => print_json(&client.groups().list()),
        ("list", Some("vaults")) => print_json(&client.vaults().list()),
        ("get", Some(kind)) => {
            let name_or_id = args
                .get(2)
                .ok_or_else(|| format!("get {} requires a name or id", kind))?;
            match kind {
                "user" => print_json(&client.users().get(name_or_id)),
                "group" => print_json(&client.groups().get(name_or_id)),
                "vault" => print_json(&client.vaults().get(name_or_id)),
                other => Err(format!("Unknown entity type: {}", other)),
            }
        }
        _ => {
            print_usage();
            Err(format!("Unknown command: {}", args.join(" ")))
        }
    }
}

fn print_json<T: Serialize>(result: &op_binding::Result<T>) -> Result<(), String> {
    let value = result.as_ref().map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn print_usage() {
    println!(
        r#"Usage: op-binding version
       op-binding list <users|groups|vaults>
       op-binding get <user|group|vault> <name-or-id>

Environment:
  OP_SIGNIN_ADDRESS        Sign-in address, e.g. https://my-team.1password.com
  OP_EMAIL_ADDRESS         Account email address
  OP_SECRET_KEY            Account secret key
  OP_PASSWORD              Account password
  OP_BINDING_EXECUTABLE    Path to the op executable (default: op on PATH)
  OP_BINDING_CONFIG_DIR    Configuration directory passed as --config
  OP_BINDING_TIMEOUT_SECS  Timeout per invocation in seconds, 0 disables (default: 10)
  OP_BINDING_CACHE         Pass --cache to op (1/true)
  OP_BINDING_SHORTHAND     Account shorthand (default: derived from the sign-in address)
  OP_BINDING_DEVICE        Device id, 26 characters of [a-z2-7] (default: random)
  OP_BINDING_DEBUG         Enable debug logging (1/true)"#
    );
}
