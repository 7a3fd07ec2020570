use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use bve_replayer::config::{self, Confirmation, ReplayArgs};
use bve_replayer::{ConsumerProcess, ReplayDriver, ReplayError, ReplaySummary};

const EXIT_FAILURE: u8 = 1;
const EXIT_INTERRUPTED: u8 = 130;
const EXIT_DECLINED: u8 = 255;

fn main() -> ExitCode {
    env_logger::init();
    let args = ReplayArgs::parse();

    if !args.yes && !args.has_expected_extension() {
        let question = format!(
            "Script path {} may be incorrect. Would you like to continue?",
            args.script.display()
        );
        match config::confirm(&question, &mut io::stdin().lock(), &mut io::stderr()) {
            Ok(Confirmation::Accepted) => {}
            Ok(Confirmation::Declined) => return ExitCode::from(EXIT_DECLINED),
            Ok(Confirmation::Invalid(answer)) => {
                log::warn!("invalid input: {:?}", answer);
                return ExitCode::from(EXIT_DECLINED);
            }
            Err(err) => {
                log::error!("could not read confirmation: {}", err);
                return ExitCode::from(EXIT_FAILURE);
            }
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("could not start runtime: {}", err);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let code = runtime.block_on(run(&args));
    // Don't wait on a stdin read that may still be pending.
    runtime.shutdown_background();
    code
}

async fn run(args: &ReplayArgs) -> ExitCode {
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("received interrupt, stopping replay");
            ctrl_c_token.cancel();
        }
    });

    match replay(args, &token).await {
        Ok(summary) => {
            log::info!(
                records = summary.records,
                timing_records = summary.timing_records,
                bytes = summary.total_bytes(),
                passthrough_bytes = summary.passthrough_bytes,
                paused_ms = summary.paused.as_millis() as u64;
                "replay finished"
            );
            if !args.no_wait {
                wait_for_enter(&token).await;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("replay failed: {:?}", err);
            match err.downcast_ref::<ReplayError>() {
                Some(ReplayError::Cancelled) => ExitCode::from(EXIT_INTERRUPTED),
                _ => ExitCode::from(EXIT_FAILURE),
            }
        }
    }
}

async fn replay(args: &ReplayArgs, token: &CancellationToken) -> anyhow::Result<ReplaySummary> {
    // Open the recording first so a bad path never starts a receiver.
    let recording = tokio::fs::File::open(&args.recording)
        .await
        .with_context(|| format!("could not open recording {}", args.recording.display()))?;
    let mut source = BufReader::new(recording);

    let consumer = ConsumerProcess::launch(&args.consumer_command())
        .with_context(|| format!("could not start receiver {}", args.script.display()))?;

    log::info!(recording = &*args.recording.to_string_lossy(); "replaying");
    let mut driver = ReplayDriver::new(consumer);
    let summary = driver.run(&mut source, token).await?;
    Ok(summary)
}

async fn wait_for_enter(token: &CancellationToken) {
    eprint!("Press Enter to exit...");
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        _ = stdin.read_line(&mut line) => {}
        _ = token.cancelled() => {}
    }
}
