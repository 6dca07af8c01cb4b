use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use hackqr_sdk::{HackQrClient, Purpose};

mod qr_commands;
mod user_commands;

#[derive(Parser)]
#[command(name = "hackqr-cli")]
#[command(about = "HackQR operator CLI")]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Server health check
    Health,
    /// User registration and verification
    User {
        #[command(subcommand)]
        action: user_commands::UserAction,
    },
    /// Issue a QR token to a verified user
    Issue {
        #[arg(long)]
        user: i32,
        #[arg(long)]
        hackathon: i32,
        /// ENTRY, BREAKFAST, LUNCH or DINNER
        #[arg(long)]
        purpose: Purpose,
        /// RFC 3339 start of the validity window (default: now)
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// RFC 3339 end of the validity window
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        /// Window length when --to is omitted
        #[arg(long, default_value = "120")]
        minutes: i64,
    },
    /// Scan a QR token
    Scan {
        token: String,
        #[arg(long)]
        scanner: i32,
    },
    /// Show a QR token and its current state
    Token { token: String },
    /// Show the scan log of a QR token
    History { token: String },
    /// Scan counts for a hackathon
    Analytics { hackathon: i32 },
}

async fn run(cli: Cli) -> Result<()> {
    let client = HackQrClient::new(&cli.server)?;

    match cli.command {
        Commands::Health => {
            if client.health().await? {
                println!("✅ Server is healthy and responsive");
            } else {
                anyhow::bail!("server reported an unhealthy status");
            }
        }
        Commands::User { action } => {
            user_commands::handle_user_command(&client, action).await?;
        }
        Commands::Issue {
            user,
            hackathon,
            purpose,
            from,
            to,
            minutes,
        } => {
            let window = qr_commands::issue_window(from, to, minutes, Utc::now())?;
            qr_commands::issue(&client, user, hackathon, purpose, window).await?;
        }
        Commands::Scan { token, scanner } => {
            // 被拒绝的扫码以退出码 2 结束
            if !qr_commands::scan(&client, &token, scanner).await? {
                std::process::exit(2);
            }
        }
        Commands::Token { token } => qr_commands::show(&client, &token).await?,
        Commands::History { token } => qr_commands::history(&client, &token).await?,
        Commands::Analytics { hackathon } => qr_commands::analytics(&client, hackathon).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hackqr_sdk::Role;

    #[test]
    fn test_cli_default_server() {
        let cli = Cli::try_parse_from(["hackqr-cli", "health"]).unwrap();

        assert_eq!(cli.server, "http://127.0.0.1:3000");
        assert!(matches!(cli.command, Commands::Health));
    }

    #[test]
    fn test_issue_command_parsing() {
        let cli = Cli::try_parse_from([
            "hackqr-cli",
            "--server",
            "http://localhost:8080",
            "issue",
            "--user",
            "7",
            "--hackathon",
            "3",
            "--purpose",
            "lunch",
            "--from",
            "2026-03-14T12:00:00Z",
            "--to",
            "2026-03-14T14:00:00Z",
        ])
        .unwrap();

        assert_eq!(cli.server, "http://localhost:8080");
        match cli.command {
            Commands::Issue {
                user,
                hackathon,
                purpose,
                from,
                to,
                minutes,
            } => {
                assert_eq!(user, 7);
                assert_eq!(hackathon, 3);
                assert_eq!(purpose, Purpose::Lunch);
                assert_eq!(from.unwrap().to_rfc3339(), "2026-03-14T12:00:00+00:00");
                assert!(to.is_some());
                assert_eq!(minutes, 120);
            }
            _ => panic!("Expected Issue command"),
        }
    }

    #[test]
    fn test_issue_rejects_unknown_purpose() {
        let result = Cli::try_parse_from([
            "hackqr-cli",
            "issue",
            "--user",
            "1",
            "--hackathon",
            "1",
            "--purpose",
            "snack",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_command_parsing() {
        let cli = Cli::try_parse_from(["hackqr-cli", "scan", "LUNCH-abc", "--scanner", "9"]).unwrap();
        match cli.command {
            Commands::Scan { token, scanner } => {
                assert_eq!(token, "LUNCH-abc");
                assert_eq!(scanner, 9);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_user_register_parsing() {
        let cli = Cli::try_parse_from([
            "hackqr-cli",
            "user",
            "register",
            "Alice",
            "--email",
            "alice@example.com",
            "--phone",
            "9000000001",
            "--role",
            "scanner",
        ])
        .unwrap();

        match cli.command {
            Commands::User {
                action: user_commands::UserAction::Register { name, role, .. },
            } => {
                assert_eq!(name, "Alice");
                assert_eq!(role, Role::Scanner);
            }
            _ => panic!("Expected user register command"),
        }
    }

    #[test]
    fn test_all_commands_exist() {
        let commands = vec![
            vec!["hackqr-cli", "health"],
            vec!["hackqr-cli", "user", "approve", "1"],
            vec!["hackqr-cli", "user", "reject", "1"],
            vec!["hackqr-cli", "user", "show", "1"],
            vec!["hackqr-cli", "token", "ENTRY-x"],
            vec!["hackqr-cli", "history", "ENTRY-x"],
            vec!["hackqr-cli", "analytics", "1"],
        ];

        for args in commands {
            let result = Cli::try_parse_from(args.clone());
            assert!(result.is_ok(), "Failed to parse: {:?}", args);
        }
    }
}
