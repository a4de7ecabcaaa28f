use clap::Parser;
use examfetch::Batch;
use examfetch::config::ArchiveConfig;
use examfetch::filter::LanguageFilter;
use std::time::Duration;

mod args;
use args::{Args, convert_cert, convert_material, convert_paper_level, years_from_args};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ArchiveConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ArchiveConfig::default(),
    };

    let years = match years_from_args(args.year, args.year_range.as_deref()) {
        Ok(years) => years,
        Err(e) => {
            ::log::error!("{}", e);
            std::process::exit(1);
        }
    };

    println!("Note: requires a running WebDriver server (e.g. ChromeDriver or geckodriver).");
    println!(
        "Set WEBDRIVER_URL if not using the default {}",
        args.webdriver_url
    );

    let mut batch = Batch::from_config(&config, convert_cert(args.cert), convert_material(args.material))
        .with_years(years)
        .with_output(args.output)
        .with_download_delay(Duration::from_secs_f64(args.delay))
        .with_webdriver_url(args.webdriver_url)
        .with_language(LanguageFilter::parse(&args.language));

    if let Some(subject) = args.subject {
        batch = batch.with_subject(subject);
    }
    if let Some(level) = convert_paper_level(args.paper_level) {
        batch = batch.with_paper_level(level);
    }

    if args.list_subjects {
        match batch.list_subjects().await {
            Ok(subjects) => {
                println!("Available subjects:");
                for (value, text) in subjects {
                    println!("  {:30} - {}", value, text);
                }
            }
            Err(e) => {
                ::log::error!("failed to list subjects: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if args.check_years {
        match batch.check_years().await {
            Ok(years) => {
                println!("{} year(s) available:", years.len());
                for year in years {
                    println!("  {}", year);
                }
            }
            Err(e) => {
                ::log::error!("failed to check years: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let start_time = std::time::Instant::now();
    match batch.run().await {
        Ok(summary) => {
            let duration = start_time.elapsed();
            ::log::info!(
                "run complete in {:.1}s: {} downloaded, {} already present, {} failed, {} filtered out",
                duration.as_secs_f64(),
                summary.downloaded,
                summary.already_present,
                summary.failed,
                summary.filtered_out
            );
            println!(
                "Done: {} downloaded, {} already present, {} failed, {} filtered out",
                summary.downloaded, summary.already_present, summary.failed, summary.filtered_out
            );
        }
        Err(e) => {
            // Could not reach the archive at all
            ::log::error!("run failed: {}", e);
            std::process::exit(1);
        }
    }
}
