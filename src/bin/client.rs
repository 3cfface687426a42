// Saju Intake - command-line submission and polling client

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use saju_intake::client::{
    ClientError, HttpTransport, PollOutcome, PollPolicy, PollingClient, SubmissionClient,
};
use saju_intake::storage::ConfigService;
use saju_intake_core::{IntakeForm, LookupKey, ParsedSections, SectionLabel};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "saju-intake-client", version, about = "Submit a saju intake and wait for the result")]
struct Cli {
    /// Server URL; defaults to service_url from config.json
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a new intake, then poll for its result
    Submit(SubmitArgs),
    /// Poll for an existing submission with a fresh budget
    Lookup(LookupArgs),
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    /// yyyy-MM-dd, yyyy/M/d or yyyyMMdd
    #[arg(long)]
    birthdate: String,
    #[arg(long, default_value = "")]
    birthtime: String,
    /// solar or lunar
    #[arg(long = "calendar", default_value = "solar")]
    calendar_type: String,
    /// male or female
    #[arg(long)]
    gender: String,
    #[arg(long, default_value = "")]
    memo: String,
    #[arg(long, default_value = "")]
    source: String,
}

#[derive(Args)]
struct LookupArgs {
    #[arg(long)]
    phone: String,
    #[arg(long)]
    birthdate: String,
}

impl From<SubmitArgs> for IntakeForm {
    fn from(args: SubmitArgs) -> Self {
        IntakeForm {
            name: args.name,
            phone: args.phone,
            birthdate: args.birthdate,
            birthtime: args.birthtime,
            calendar_type: args.calendar_type,
            gender: args.gender,
            memo: args.memo,
            source: args.source,
            user_agent: format!("saju-intake-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigService::new()
        .context("failed to load configuration")?
        .get_config_clone();
    let url = cli.url.unwrap_or_else(|| config.service_url.clone());

    let transport = Arc::new(HttpTransport::new(url, REQUEST_TIMEOUT)?);
    let polling = PollingClient::new(transport.clone(), PollPolicy::from_settings(&config.polling));

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let result = match cli.command {
        Command::Submit(args) => {
            let submission = SubmissionClient::new(
                transport,
                Duration::from_millis(config.polling.initial_delay_ms),
            );
            let form = IntakeForm::from(args);
            eprintln!("접수 중...");
            match submission.submit(&form, &cancel).await {
                Ok(key) => poll(&polling, &key, &cancel, false).await,
                Err(e) => Err(e),
            }
        }
        Command::Lookup(args) => {
            let key = LookupKey::new(&args.phone, &args.birthdate);
            if !key.is_complete() {
                eprintln!("전화번호와 생년월일을 모두 입력해 주세요.");
                return Ok(ExitCode::from(2));
            }
            poll(&polling, &key, &cancel, true).await
        }
    };

    Ok(report(result))
}

async fn poll(
    polling: &PollingClient,
    key: &LookupKey,
    cancel: &CancellationToken,
    resume: bool,
) -> Result<(LookupKey, PollOutcome), ClientError> {
    eprintln!("결과를 기다리는 중...");
    let outcome = if resume {
        polling.resume(key, cancel).await?
    } else {
        polling.poll_until_terminal(key, cancel).await?
    };
    Ok((key.clone(), outcome))
}

fn report(result: Result<(LookupKey, PollOutcome), ClientError>) -> ExitCode {
    match result {
        Ok((_, PollOutcome::Done(sections))) => {
            print_sections(&sections);
            ExitCode::SUCCESS
        }
        Ok((_, PollOutcome::Failed(message))) => {
            eprintln!("결과 생성에 실패했습니다.");
            if !message.is_empty() {
                eprintln!("{}", message);
            }
            ExitCode::FAILURE
        }
        Ok((key, PollOutcome::TimedOut)) => {
            eprintln!("아직 처리 중입니다. 잠시 후 다시 조회해 주세요:");
            eprintln!(
                "  saju-intake-client lookup --phone {} --birthdate {}",
                key.phone, key.birthdate
            );
            ExitCode::from(3)
        }
        Err(ClientError::Cancelled) => {
            eprintln!("취소되었습니다.");
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn print_sections(sections: &ParsedSections) {
    for label in SectionLabel::ALL {
        let value = sections.get(label);
        if value.is_empty() {
            continue;
        }
        println!("{}\n{}\n", label.header(), value);
    }
}
