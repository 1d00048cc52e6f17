pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "course-api")]
#[command(about = "Greeting, trivia, coffee-shop and donor REST backends")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Apply database migrations and exit")]
    Migrate,

    #[command(about = "Mint an HS256 bearer token signed with SECURITY_JWT_SECRET")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
        Some(Commands::Migrate) => commands::migrate::handle(output_format).await,
        Some(Commands::Token(args)) => commands::token::handle(args, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_permissions() {
        let cli = Cli::try_parse_from([
            "course-api",
            "token",
            "--subject",
            "barista",
            "--permission",
            "get:drinks-detail",
            "--permission",
            "post:drinks",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Token(args)) => {
                assert_eq!(args.subject, "barista");
                assert_eq!(args.permissions, vec!["get:drinks-detail", "post:drinks"]);
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["course-api"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["course-api", "serve", "--in-memory", "--port", "9000"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert!(args.in_memory);
                assert_eq!(args.port, Some(9000));
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn token_hours_are_bounded() {
        let base = ["course-api", "token", "--subject", "barista", "--hours"];
        assert!(Cli::try_parse_from(base.iter().copied().chain(["0"])).is_err());
        assert!(Cli::try_parse_from(base.iter().copied().chain(["3000000000"])).is_err());

        let cli = Cli::try_parse_from(base.iter().copied().chain(["12"])).unwrap();
        match cli.command {
            Some(Commands::Token(args)) => assert_eq!(args.hours, Some(12)),
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["course-api", "migrate", "--json"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
    }
}
