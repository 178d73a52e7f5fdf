use crate::estimate::{run_estimate, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use climate_sense::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ClimateSense",
    about = "Estimate lifestyle carbon footprints and serve climate guidance",
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
    /// Score a questionnaire offline and print the breakdown
    Estimate(EstimateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["climate-sense-api"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["climate-sense-api", "serve", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8080)),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn estimate_rejects_unknown_answers() {
        let result = Cli::try_parse_from([
            "climate-sense-api",
            "estimate",
            "--transport-mode",
            "Rocket",
            "--vehicle-distance",
            "Low",
            "--electricity",
            "Low",
            "--diet",
            "Veg",
            "--air-travel",
            "Never",
            "--waste",
            "Low",
            "--recycling",
            "Yes",
            "--device-usage",
            "Low",
        ]);
        assert!(result.is_err());
    }
}
