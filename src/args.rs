use clap::{Parser, Subcommand};
use page_archiver::ArchiverConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-archiver")]
#[command(about = "Render a web page and package its text and images as a zip archive")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// WebDriver endpoint (overrides config and WEBDRIVER_URL)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    /// Maximum number of distinct images to archive
    #[arg(long, global = true)]
    pub max_images: Option<usize>,

    /// Number of concurrent image downloads
    #[arg(short, long, global = true)]
    pub concurrency: Option<usize>,

    /// Render timeout in seconds
    #[arg(long, global = true)]
    pub render_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Archive a single page to a file or stdout
    Archive {
        /// Page URL to archive
        url: String,

        /// Output file, `-` for stdout (defaults to a name derived from the URL)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Serve `POST /api/scrape` over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,
    },
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, mut config: ArchiverConfig) -> ArchiverConfig {
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(max_images) = self.max_images {
            config.max_images = max_images;
        }
        if let Some(concurrency) = self.concurrency {
            config.fetch_concurrency = concurrency;
        }
        if let Some(timeout) = self.render_timeout {
            config.render_timeout_secs = timeout;
        }
        config
    }
}
