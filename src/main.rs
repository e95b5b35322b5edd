//! Point d'entrée d'OrderShell — outil de vérification hors appareil.
//!
//! Usage :
//!   ordershell [--config PATH] check URL...   → verdict pour chaque URL
//!   ordershell [--config PATH] script         → script injecté dans les pages
//!   ordershell [--config PATH] config         → configuration effective
//!   ordershell [--config PATH] init           → écrit la configuration
//!                                               effective dans le dossier
//!                                               de configuration utilisateur
//!
//! Exemples :
//!   cargo run -- check https://checkout.stripe.com/pay/123
//!   cargo run -- --config demo.toml check https://play.google.com/store
//!   RUST_LOG=debug cargo run -- check "not a url"

use std::env;
use std::error::Error;
use std::path::PathBuf;

use ordershell::config::Config;
use ordershell::host::host_of;
use ordershell::script::injected_script;

const USAGE: &str = "usage: ordershell [--config PATH] <check URL...|script|config|init>";

fn main() -> Result<(), Box<dyn Error>> {
    // ── 1. Logging / Tracing ───────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // ── 2. Arguments ───────────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut rest: Vec<String> = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().ok_or("--config requires a path")?;
            config_path = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }

    // ── 3. Configuration ───────────────────────────────────────────────
    // Un chemin explicite doit être valide ; la recherche implicite retombe
    // sur les valeurs par défaut.
    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load(),
    };

    // ── 4. Commande ────────────────────────────────────────────────────
    let Some((command, urls)) = rest.split_first() else {
        return Err(USAGE.into());
    };

    match command.as_str() {
        "check" => {
            if urls.is_empty() {
                return Err(USAGE.into());
            }
            let classifier = config.classifier();
            for url in urls {
                let host = host_of(url);
                let host = if host.is_empty() { "-" } else { host.as_str() };
                println!("{:<24} {:<32} {}", classifier.classify(url), host, url);
            }
        }
        "script" => println!("{}", injected_script(config.display.disable_zoom)),
        "config" => {
            print!("{}", config.to_toml()?);
            println!();
            println!("# display name: {}", config.display_name());
            let allow_list = config.allow_list();
            let hosts: Vec<&str> = allow_list.iter().collect();
            println!("# effective allow-list: {}", hosts.join(", "));
        }
        "init" => {
            let path = config.save()?;
            println!("{}", path.display());
        }
        other => return Err(format!("unknown command '{other}'\n{USAGE}").into()),
    }

    Ok(())
}
