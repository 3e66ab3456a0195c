use clap::Parser;
use page_archiver::{ArchiveError, Archiver, ArchiverConfig, WebDriverRenderer, server, utils};
use std::process::ExitCode;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config_file {
        Some(path) => match ArchiverConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ArchiverConfig::default(),
    };
    let config = args.apply_overrides(config.with_env_overrides());

    ::log::info!("Using WebDriver at {}", config.webdriver_url);

    let renderer = WebDriverRenderer::new(config.clone());
    let archiver = match Archiver::new(renderer, config) {
        Ok(archiver) => archiver,
        Err(e) => {
            ::log::error!("Failed to set up archiver: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Archive { url, output } => archive_page(&archiver, &url, output).await,
        Command::Serve { port } => match server::serve(archiver, port).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                ::log::error!("Server failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn archive_page(
    archiver: &Archiver<WebDriverRenderer>,
    url: &str,
    output: Option<String>,
) -> ExitCode {
    let start_time = std::time::Instant::now();

    // Render before touching the output so a failed page leaves no file behind
    let page = match archiver.prepare(url).await {
        Ok(page) => page,
        Err(e) => return report_failure(&e),
    };

    let result = match output.as_deref() {
        Some("-") => archiver.stream(page, tokio::io::stdout()).await,
        other => {
            let path = other
                .map(str::to_string)
                .unwrap_or_else(|| utils::archive_file_name(url));
            let file = match tokio::fs::File::create(&path).await {
                Ok(file) => file,
                Err(e) => {
                    ::log::error!("Failed to create {}: {}", path, e);
                    return ExitCode::FAILURE;
                }
            };
            ::log::info!("Writing archive to {}", path);
            archiver.stream(page, file).await
        }
    };

    match result {
        Ok(summary) => {
            ::log::info!(
                "Archive complete - {} images ({} failed), {} bytes in {:.2} seconds",
                summary.images_archived.len(),
                summary.images_failed,
                summary.bytes_written,
                start_time.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}

fn report_failure(error: &ArchiveError) -> ExitCode {
    if error.is_before_output() {
        ::log::error!("{}", error);
    } else {
        ::log::error!("Archive is incomplete: {}", error);
    }
    ExitCode::FAILURE
}
