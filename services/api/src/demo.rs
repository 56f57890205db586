use clap::Args;
use finance_ai::config::{AppConfig, SimulationConfig};
use finance_ai::error::AppError;
use finance_ai::workflows::assistant::{
    AssistantChatService, AssistantSession, AutomationStart, ChatBackend, ChatMessage, ChatRole,
    InMemoryChatStore, LoanType, UiMarker,
};
use finance_ai::workflows::automation::AutomationOutcome;
use finance_ai::workflows::evaluation::{generate_evaluation, generate_evaluation_with};
use finance_ai::workflows::export::{MisReport, TextExporter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

const SETTLE_POLL: Duration = Duration::from_millis(50);

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Loan type picked from the greeting's options
    #[arg(long, default_value = "Home Loan")]
    pub(crate) loan_type: LoanType,
    /// File name attached before running the automation
    #[arg(long, default_value = "salary_slip_nov2025.pdf")]
    pub(crate) file: String,
    /// Optional question sent to the assistant after the greeting
    #[arg(long)]
    pub(crate) message: Option<String>,
    /// Skip the simulated delays
    #[arg(long)]
    pub(crate) instant: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Number of evaluations to generate
    #[arg(long, default_value_t = 1)]
    pub(crate) count: usize,
    /// Seed for reproducible draws
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

fn instant_delays() -> SimulationConfig {
    SimulationConfig {
        step_interval: Duration::ZERO,
        step_typing_delay: Duration::ZERO,
        summary_typing_delay: Duration::ZERO,
        reply_typing_delay: Duration::ZERO,
        upload_ocr_delay: Duration::ZERO,
        recalculate_delay: Duration::ZERO,
    }
}

async fn settle(session: &AssistantSession) {
    while session.is_typing() {
        tokio::time::sleep(SETTLE_POLL).await;
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let delays = if args.instant {
        instant_delays()
    } else {
        AppConfig::load()?.simulation
    };

    let store = Arc::new(InMemoryChatStore::default());
    let backend: Arc<dyn ChatBackend> = Arc::new(AssistantChatService::new(store));
    let session = AssistantSession::new(backend, delays);

    session.submit("Hi").await;
    settle(&session).await;

    if let Some(message) = args.message {
        session.submit(message).await;
        settle(&session).await;
    }

    session.attach_file(args.file);
    session.select_loan_type(args.loan_type);
    let outcome = match session.run_automation() {
        AutomationStart::Started(handle) => handle.await.ok(),
        AutomationStart::Skipped(reason) => {
            println!("automation skipped: {reason:?}");
            None
        }
    };
    settle(&session).await;

    println!("Finance AI assistant demo ({})", session.chat_id().unwrap_or_else(|| "offline".to_string()));
    println!("================================");
    for message in session.transcript() {
        println!("{}", render_message(&message));
    }

    if let Some(AutomationOutcome::Completed(result)) = outcome {
        let report = MisReport::approval(&result, chrono::Local::now().naive_local());
        println!();
        print!("{}", TextExporter.render_string(&report));
    }

    session.close();
    Ok(())
}

pub(crate) fn render_message(message: &ChatMessage) -> String {
    let role = match message.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
        ChatRole::System => "system",
    };
    let body = match message.marker() {
        Some(UiMarker::LoanOptions) => {
            let options: Vec<&str> = LoanType::ALL.iter().map(|loan| loan.label()).collect();
            format!("[choose a loan type: {}]", options.join(" | "))
        }
        Some(UiMarker::ExportReport(result)) => {
            format!("[download approval report: {result}]")
        }
        None => message.content.clone(),
    };
    format!("{role:>9} | {}", body.replace('\n', "\n          | "))
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let mut seeded = args.seed.map(StdRng::seed_from_u64);
    let results: Vec<_> = (0..args.count)
        .map(|_| match seeded.as_mut() {
            Some(rng) => generate_evaluation_with(rng),
            None => generate_evaluation(),
        })
        .collect();

    let json = serde_json::to_string_pretty(&results).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finance_ai::workflows::evaluation::{EvaluationResult, PortfolioRisk};

    #[test]
    fn loan_option_marker_renders_choices() {
        let rendered = render_message(&ChatMessage::loan_options());
        assert!(rendered.contains("Personal Loan | Home Loan | Business Loan | Car Loan"));
    }

    #[test]
    fn export_marker_renders_result_summary() {
        let result = EvaluationResult::new(52, 300_000, PortfolioRisk::Stable, 2.2);
        let marker = ChatMessage::export_prompt(&result).expect("marker encodes");
        let rendered = render_message(&marker);
        assert!(rendered.contains("download approval report: score 52 (Medium Risk) -> REVIEW"));
    }

    #[test]
    fn multi_line_messages_stay_aligned() {
        let rendered = render_message(&ChatMessage::assistant("line one\nline two"));
        assert_eq!(rendered, "assistant | line one\n          | line two");
    }

    #[tokio::test(start_paused = true)]
    async fn instant_demo_runs_to_completion() {
        let args = DemoArgs {
            loan_type: LoanType::Car,
            file: "rc_book.pdf".to_string(),
            message: Some("what documents are needed?".to_string()),
            instant: true,
        };
        run_demo(args).await.expect("demo completes");
    }
}
