use crate::demo::{run_demo, run_roster_check, DemoArgs, RosterCheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use internship_pipeline::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Internship Pipeline",
    about = "Run the internship candidate pipeline service and its operator tooling",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect staff roster exports before they are used to seed the service
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Walk a sample candidate from intake to acceptance against an in-memory store
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Validate a roster CSV and print a per-department summary
    Check(RosterCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Staff roster CSV to seed before accepting requests
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Roster {
            command: RosterCommand::Check(args),
        } => run_roster_check(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["internship-pipeline-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_roster_check_path() {
        let cli = Cli::try_parse_from(["internship-pipeline-api", "roster", "check", "staff.csv"])
            .expect("parses");

        match cli.command {
            Some(Command::Roster {
                command: RosterCommand::Check(args),
            }) => assert_eq!(args.path, PathBuf::from("staff.csv")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from([
            "internship-pipeline-api",
            "serve",
            "--port",
            "9090",
            "--roster",
            "staff.csv",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(9090));
                assert!(args.host.is_none());
                assert_eq!(args.roster, Some(PathBuf::from("staff.csv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
