use std::process;
use std::time::Instant;

use clap::Parser;
use env_logger::Env;
use review_crawler::{
    CrawlPipeline, CrawlStrategy, Credentials, GlassdoorClient, GlassdoorCrawlConfig,
};

/// Scrape employer reviews from a listing page into a CSV dataset.
#[derive(Parser)]
#[command(name = "review_crawler")]
struct Cli {
    /// URL of the first page of a company's reviews
    #[arg(short, long)]
    url: String,
    /// Output CSV file
    #[arg(short, long)]
    file: String,
    /// Account e-mail for an authenticated crawl
    #[arg(short, long)]
    email: Option<String>,
    /// Account password
    #[arg(short, long)]
    password: Option<String>,
    /// Reviews to fetch
    #[arg(short, long, default_value_t = 1000)]
    limit: usize,
    /// Run Chrome headless
    #[arg(long)]
    headless: bool,
    /// Split the crawl across popular, lowest-rated and highest-rated
    /// orderings, a third of the limit each
    #[arg(long)]
    spread: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let credentials = match (cli.email, cli.password) {
        (Some(email), Some(password)) => Some(Credentials { email, password }),
        (None, None) => None,
        _ => {
            eprintln!("❌ --email and --password must be given together");
            process::exit(2);
        }
    };

    let config = GlassdoorCrawlConfig {
        url: cli.url,
        limit: cli.limit,
        headless: cli.headless,
        credentials,
        strategy: if cli.spread {
            CrawlStrategy::RatingSpread
        } else {
            CrawlStrategy::SinglePass
        },
    };

    let start = Instant::now();
    let result = CrawlPipeline::new()
        .crawl(GlassdoorClient::new(config))
        .and_then(|pipeline| pipeline.save(&cli.file));

    match result {
        Ok(summary) => {
            for pass in &summary.passes {
                println!(
                    "pass finished after {} pages: {} ({} reviews, {} featured and {} blocked skipped)",
                    pass.pages,
                    pass.stop,
                    pass.accepted,
                    pass.skipped.featured,
                    pass.skipped.blocked
                );
            }
            println!(
                "✅ {} reviews in {:.1}s",
                summary.reviews.len(),
                start.elapsed().as_secs_f64()
            );
        }
        Err(err) => {
            eprintln!("❌ crawl failed: {err}");
            process::exit(1);
        }
    }
}
