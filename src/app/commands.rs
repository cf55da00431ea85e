use {
    super::AnalysisSession,
    crate::{
        AnalyzeArgs, Cli, Command, SizeArgs,
        analysis::SizeEstimator,
        config::{
            BackendConfig, OrchestrationConfig, constants::sizing::CONVENTIONAL_CONFIDENCE_LEVELS,
        },
        data::{AnalysisClient, SessionRepository, SqliteSessionRepository},
        domain::{SizingPayload, SizingRequest, SizingResponse, SubmissionDraft, UploadedFile},
        engine::RunOutcome,
        ui::{UI_TEXT, render_history, render_outcome, render_sizing, spawn_progress_bar},
    },
    anyhow::{Context, Result},
    std::{
        io,
        path::Path,
        sync::{Arc, mpsc},
    },
};

/// Conventional status for a process stopped by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Entry point for the binary: one subcommand per invocation.
pub async fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Size(args) => run_size(args),
        Command::Analyze(args) => run_analyze(&cli.db, args).await,
        Command::History { delete } => run_history(&cli.db, delete).await,
    }
}

fn run_size(args: SizeArgs) -> Result<()> {
    let payload = SizingPayload {
        visits: args.visits,
        conversions: args.conversions,
        traffic: args.traffic,
        variations: args.variations,
        improvement: args.improvement,
        confidence: args.confidence,
        method: args.method,
    };
    if !CONVENTIONAL_CONFIDENCE_LEVELS.contains(&args.confidence) {
        log::warn!(
            "Confidence {} is not one of {:?}; the frequentist estimate uses 95% regardless",
            args.confidence,
            CONVENTIONAL_CONFIDENCE_LEVELS
        );
    }
    let request = SizingRequest::try_from(payload)?;
    let result = SizeEstimator::estimate(&request)?;

    if args.json {
        let response = SizingResponse::from(result);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", render_sizing(&request, &result));
    }
    Ok(())
}

async fn run_analyze(db_path: &str, args: AnalyzeArgs) -> Result<()> {
    // 1. Build the draft from the command line
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file_name = file_name_of(&args.file);
    let draft = SubmissionDraft::new(args.kpi.to_string())
        .with_file(UploadedFile::new(file_name.clone(), bytes))
        .with_users("control", args.control)
        .with_users("variation", args.variation)
        .excluding_outliers(args.exclude_outliers);

    // Fail fast, before a record is created or a bar drawn.
    AnalysisClient::validate(&draft)?;

    // 2. Wire up the session
    let backend = BackendConfig {
        base_url: args.backend_url,
        timeout_ms: args.timeout_ms,
    };
    let repository: Arc<dyn SessionRepository> =
        Arc::new(SqliteSessionRepository::new(db_path).await?);
    let client = Arc::new(AnalysisClient::http(&backend)?);
    let session = Arc::new(AnalysisSession::new(
        repository,
        client,
        OrchestrationConfig::default(),
    ));

    let record = session
        .create_analysis(args.name.as_deref().unwrap_or(&file_name))
        .await?;
    log::info!("Created analysis {} ({})", record.id, record.name);

    // 3. First Ctrl-C dismisses the run, a second one quits
    let dismisser = {
        let session = session.clone();
        tokio::spawn(async move {
            if dismiss_on_interrupt(&session, tokio::signal::ctrl_c).await {
                log::warn!("Interrupted again, exiting");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
    };

    let (progress_tx, progress_rx) = mpsc::channel();
    let bar = spawn_progress_bar(progress_rx);
    let outcome = session
        .run_analysis(&record.id, &draft, Some(progress_tx))
        .await;
    dismisser.abort();
    if bar.join().is_err() {
        log::warn!("Progress bar thread panicked");
    }

    // 4. Report
    match outcome? {
        RunOutcome::Completed(result) => {
            println!("{}", render_outcome(&result, args.kpi));
            Ok(())
        }
        RunOutcome::Failed(err) => Err(err.into()),
        RunOutcome::Abandoned => {
            println!("{}", UI_TEXT.run_dismissed);
            Ok(())
        }
    }
}

async fn run_history(db_path: &str, delete: Option<String>) -> Result<()> {
    let repository = SqliteSessionRepository::new(db_path).await?;

    if let Some(id) = delete {
        if repository.delete(&id).await? {
            println!("{} {}", UI_TEXT.deleted, id);
        } else {
            println!("{} {}", UI_TEXT.not_found, id);
        }
        return Ok(());
    }

    println!("{}", render_history(&repository.list().await?));
    Ok(())
}

/// Dismisses the run in flight on the first interrupt. Returns true once an interrupt
/// arrives that has nothing left to dismiss, false if the signal source fails.
async fn dismiss_on_interrupt<F, Fut>(session: &AnalysisSession, mut interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let mut dismissed = false;
    while interrupt().await.is_ok() {
        if dismissed || !session.dismiss() {
            return true;
        }
        println!("{}", UI_TEXT.interrupt_again_to_quit);
        dismissed = true;
    }
    false
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
