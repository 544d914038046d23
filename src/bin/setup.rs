//! relaybot setup wizard.
//!
//! Prompts for the bot token, the public webhook URL and the listen address,
//! then writes a starter `config.toml` (with the default keyword table spelled
//! out so it can be edited) into `RELAYBOT_ROOT` (default: current directory).

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use relaybot::rules::default_rules;

struct ConfigParams<'a> {
    tg_token: &'a str,
    webhook_url: &'a str,
    host: &'a str,
    port: u16,
    register_on_start: bool,
}

/// TOML string literal with escaping
fn quoted(value: &str) -> String {
    toml::Value::String(value.to_owned()).to_string()
}

/// Produces a valid config.toml string. Extracted so it can be unit-tested.
fn format_config(p: &ConfigParams<'_>) -> String {
    let webhook_line = if p.webhook_url.is_empty() {
        "# webhook_url = \"https://your-domain.example/webhook\"".to_owned()
    } else {
        format!("webhook_url = {}", quoted(p.webhook_url))
    };

    let mut out = format!(
        r#"[telegram]
bot_token = {token}
{webhook_line}
request_timeout_secs = 30
register_webhook_on_start = {register}

[server]
host = {host}
port = {port}
"#,
        token = quoted(p.tg_token),
        register = p.register_on_start,
        host = quoted(p.host),
        port = p.port,
    );

    for rule in default_rules() {
        out.push_str(&format!(
            "\n[[rules]]\nkeyword = {}\nreply = {}\n",
            quoted(&rule.keyword),
            quoted(&rule.reply)
        ));
    }

    out
}

fn run_cli(project_root: &Path) -> Result<()> {
    println!("=== relaybot setup ===\n");

    let read_line = |prompt: &str| -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        Ok(buf.trim().to_owned())
    };

    let or_default = |s: String, default: &str| {
        if s.is_empty() {
            default.to_owned()
        } else {
            s
        }
    };

    let tg_token = read_line("Telegram bot token: ")?;
    if tg_token.is_empty() {
        anyhow::bail!("A bot token is required");
    }
    let webhook_url = read_line("Public webhook URL (optional, e.g. https://host/webhook): ")?;
    let host = or_default(read_line("Listen host [0.0.0.0]: ")?, "0.0.0.0");
    let port: u16 = or_default(read_line("Listen port [8000]: ")?, "8000")
        .parse()
        .context("Port must be a number between 0 and 65535")?;
    let register_on_start = !webhook_url.is_empty()
        && read_line("Register the webhook on every start? [y/N]: ")?
            .eq_ignore_ascii_case("y");

    let config = format_config(&ConfigParams {
        tg_token: &tg_token,
        webhook_url: &webhook_url,
        host: &host,
        port,
        register_on_start,
    });

    let config_path = project_root.join("config.toml");
    std::fs::write(&config_path, &config)
        .with_context(|| format!("Could not write {}", config_path.display()))?;

    println!("\n✓  config.toml saved to {}", config_path.display());
    println!("   Run the bot with:  cargo run");
    Ok(())
}

fn main() -> Result<()> {
    // Resolve project root: prefer RELAYBOT_ROOT env, fall back to cwd.
    let project_root =
        PathBuf::from(std::env::var("RELAYBOT_ROOT").unwrap_or_else(|_| ".".to_string()));

    run_cli(&project_root)
}
