use clap::Parser;
use cpf_phone_extractor::core::report::ExportSummary;
use cpf_phone_extractor::utils::{console, logger};
use cpf_phone_extractor::{
    BatchFetcher, CliArgs, ExtractorError, HttpLookupClient, LocalStorage, ReportLayout,
    ReportWriter, Result, Session,
};
use std::future::Future;
use tokio::io::BufReader;

async fn run(args: &CliArgs) -> Result<ExportSummary> {
    let config = args.resolve()?;
    tracing::debug!("Resolved config: {:?}", config);

    let lookup = HttpLookupClient::new(&config)?;
    let fetcher = BatchFetcher::from_config(lookup, &config);
    let report = ReportWriter::new(
        fetcher,
        LocalStorage::current_dir(),
        ReportLayout::from_config(&config),
    );

    let progress = console::lookup_progress_bar(0);
    let mut session = Session::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
        .with_presets(args.input.clone(), args.output.clone());

    session.run(&report, &progress).await
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    console::apply_color_preference();
    tracing::info!("Starting cpf-phone-extractor");

    if !args.no_banner {
        console::print_banner();
    }

    let outcome = run_until_interrupted(run(&args), tokio::signal::ctrl_c()).await;

    // A pending stdin read would otherwise hold the runtime open.
    std::process::exit(finish(outcome));
}

/// Races the session against `interrupt`. A failed interrupt listener is
/// ignored and the session runs to completion.
async fn run_until_interrupted<S, I>(session: S, interrupt: I) -> Result<ExportSummary>
where
    S: Future<Output = Result<ExportSummary>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = session => result,
        Ok(()) = interrupt => Err(ExtractorError::Interrupted),
    }
}

/// Prints the final message and returns the process exit code.
fn finish(outcome: Result<ExportSummary>) -> i32 {
    match outcome {
        Ok(summary) => {
            tracing::info!(
                "Export finished: {} rows, {} found, saved to {}",
                summary.rows,
                summary.found,
                summary.output_path
            );
            console::print_done(&summary.output_path, summary.rows, summary.found);
            0
        }
        Err(ExtractorError::Interrupted) => {
            tracing::info!("Interrupted by user");
            console::print_goodbye();
            0
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            console::print_error(&e.user_friendly_message(), e.recovery_suggestion());
            e.exit_code()
        }
    }
}
