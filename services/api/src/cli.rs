use crate::demo::{run_demo, run_evaluate, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use finance_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Finance AI Loan Desk",
    about = "Serve or demonstrate the Finance AI loan desk simulator",
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
    /// Run one assistant session end to end and print the transcript
    Demo(DemoArgs),
    /// Print generated evaluation results as JSON
    Evaluate(EvaluateArgs),
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
        Command::Demo(args) => run_demo(args).await,
        Command::Evaluate(args) => run_evaluate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finance_ai::workflows::assistant::LoanType;

    #[test]
    fn defaults_to_serve_when_no_subcommand() {
        let cli = Cli::try_parse_from(["finance-ai-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_loan_type_labels() {
        let cli = Cli::try_parse_from([
            "finance-ai-api",
            "demo",
            "--loan-type",
            "Business Loan",
            "--file",
            "itr.pdf",
            "--instant",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.loan_type, LoanType::Business);
                assert_eq!(args.file, "itr.pdf");
                assert!(args.instant);
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_loan_type() {
        assert!(Cli::try_parse_from(["finance-ai-api", "demo", "--loan-type", "boat"]).is_err());
    }
}
