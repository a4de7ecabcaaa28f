use crate::archive::navigate::{
    EXAMINATION_SELECT, Navigator, SUBJECT_SELECT, VIEW_TYPE_SELECT, YEAR_SELECT,
};
use crate::archive::session;
use crate::config::ArchiveConfig;
use crate::fetch::{self, FetchOutcome};
use crate::filter::LanguageFilter;
use crate::naming::{self, CertLevel, MaterialType, PaperLevel};
use crate::retry::RetryPolicy;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// Counts for one completed run
#[derive(Debug, Default, Clone, Copy)]
pub struct Summary {
    /// Documents fetched over the network
    pub downloaded: usize,
    /// Documents skipped because the destination already existed
    pub already_present: usize,
    /// Documents that failed after exhausting retries
    pub failed: usize,
    /// Documents dropped by the language or paper-level filter
    pub filtered_out: usize,
}

/// Builder for a download run over years and subjects.
///
/// Execution is deliberately sequential: one browser session, one download
/// at a time, with configurable pacing between requests. The serialization
/// is politeness to the archive, not an engineering constraint.
pub struct Batch {
    cert: CertLevel,
    material: MaterialType,
    subject_query: Option<String>,
    years: Vec<u16>,
    paper_level: Option<PaperLevel>,
    language: Option<LanguageFilter>,
    output: PathBuf,
    download_delay: Duration,
    settle: Duration,
    webdriver_url: String,
    archive_url: String,
    policy: RetryPolicy,
    http_timeout: Duration,
}

impl Batch {
    /// Create a batch with default settings for the given level and material
    pub fn new(cert: CertLevel, material: MaterialType) -> Self {
        Self::from_config(&ArchiveConfig::default(), cert, material)
    }

    /// Create a batch taking delays, URLs and retry settings from a config
    pub fn from_config(config: &ArchiveConfig, cert: CertLevel, material: MaterialType) -> Self {
        Self {
            cert,
            material,
            subject_query: None,
            years: (1995..=2025).collect(),
            paper_level: None,
            language: LanguageFilter::parse("EV,BV"),
            output: PathBuf::from("downloads"),
            download_delay: config.download_delay(),
            settle: config.settle(),
            webdriver_url: config.webdriver_url.clone(),
            archive_url: config.archive_url.clone(),
            policy: config.retry_policy(),
            http_timeout: config.http_timeout(),
        }
    }

    /// Restrict the run to subjects matching this query (case-insensitive
    /// substring over option value and display text)
    pub fn with_subject(mut self, query: impl Into<String>) -> Self {
        self.subject_query = Some(query.into());
        self
    }

    /// Set the years to walk
    pub fn with_years(mut self, years: Vec<u16>) -> Self {
        self.years = years;
        self
    }

    /// Keep only documents classified at this paper level
    pub fn with_paper_level(mut self, level: PaperLevel) -> Self {
        self.paper_level = Some(level);
        self
    }

    /// Set the language filter (`None` downloads every language version)
    pub fn with_language(mut self, filter: Option<LanguageFilter>) -> Self {
        self.language = filter;
        self
    }

    /// Set the output base directory
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }

    /// Set the delay between successful downloads
    pub fn with_download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = delay;
        self
    }

    /// Set the settle delay after each dropdown selection
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Set the WebDriver URL
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    /// Set the archive page URL
    pub fn with_archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into();
        self
    }

    /// Set the retry policy for downloads
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Walk the configured years and download every matching document.
    ///
    /// Inability to reach the archive at all is an error; any later failure
    /// (a year without the level, a flaky download) is logged and skipped.
    pub async fn run(self) -> Result<Summary, Box<dyn Error>> {
        let nav = self.connect().await?;
        let http = reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()?;

        // Reaching the archive form at all is the one fatal failure.
        // Everything after this is scoped to a single year or document.
        if let Err(e) = nav.open_archive(&self.archive_url).await {
            let _ = nav.close().await;
            return Err(e.into());
        }

        let mut summary = Summary::default();

        for &year in &self.years {
            let subjects = match self.open_subject_list(&nav, year).await {
                Ok(subjects) => subjects,
                Err(e) => {
                    ::log::warn!("skipping year {}: {}", year, e);
                    continue;
                }
            };

            let matching = self.matching_subjects(subjects);
            if matching.is_empty() {
                ::log::warn!(
                    "no matching subjects for {} {} in {}",
                    self.cert.archive_value(),
                    self.subject_query.as_deref().unwrap_or("*"),
                    year
                );
                continue;
            }

            for (value, text) in matching {
                ::log::info!("processing {} ({})", text, year);
                if let Err(e) = self
                    .download_subject(&nav, &http, year, &value, &text, &mut summary)
                    .await
                {
                    ::log::error!("failed processing {} for {}: {}", text, year, e);
                }
            }
        }

        if let Err(e) = nav.close().await {
            ::log::warn!("failed to close WebDriver session: {}", e);
        }
        Ok(summary)
    }

    /// Print-friendly listing of available subjects for the first
    /// configured year
    pub async fn list_subjects(&self) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        let nav = self.connect().await?;
        let year = *self.years.first().ok_or("no year selected")?;

        let result = self.open_subject_list(&nav, year).await;
        if let Err(e) = nav.close().await {
            ::log::warn!("failed to close WebDriver session: {}", e);
        }

        Ok(self.matching_subjects(result?))
    }

    /// Check which years offer the configured level and subject
    pub async fn check_years(&self) -> Result<Vec<u16>, Box<dyn Error>> {
        let nav = self.connect().await?;
        let result = self.check_years_inner(&nav).await;
        if let Err(e) = nav.close().await {
            ::log::warn!("failed to close WebDriver session: {}", e);
        }
        result
    }

    async fn check_years_inner(&self, nav: &Navigator) -> Result<Vec<u16>, Box<dyn Error>> {
        nav.open_archive(&self.archive_url).await?;
        nav.select_value(VIEW_TYPE_SELECT, self.material.archive_value())
            .await?;

        // Walk the site's own year list rather than our configured range
        let years = nav.dropdown_options(YEAR_SELECT).await?;
        ::log::info!("archive offers {} year(s)", years.len());

        let mut available = Vec::new();
        for (value, _) in years {
            if let Err(e) = nav.select_value(YEAR_SELECT, &value).await {
                ::log::warn!("{}: could not select year: {}", value, e);
                continue;
            }

            let levels = nav.dropdown_options(EXAMINATION_SELECT).await?;
            if !levels.iter().any(|(v, _)| v == self.cert.archive_value()) {
                ::log::info!("{}: {} not offered", value, self.cert.archive_value());
                continue;
            }

            nav.select_value(EXAMINATION_SELECT, self.cert.archive_value())
                .await?;
            let subjects = self.matching_subjects(nav.dropdown_options(SUBJECT_SELECT).await?);
            if subjects.is_empty() {
                ::log::info!("{}: no matching subject", value);
                continue;
            }

            ::log::info!("{}: available ({} matching subject(s))", value, subjects.len());
            if let Ok(year) = value.parse::<u16>() {
                available.push(year);
            }
        }
        Ok(available)
    }

    async fn connect(&self) -> Result<Navigator, Box<dyn Error>> {
        // Environment override, as with the crawling tools this grew out of
        let mut webdriver_url = self.webdriver_url.clone();
        if let Ok(url) = std::env::var("WEBDRIVER_URL") {
            if !url.is_empty() {
                webdriver_url = url;
            }
        }

        let client = session::connect(&webdriver_url)
            .await
            .ok_or("could not reach any WebDriver server")?;
        Ok(Navigator::new(client, self.settle))
    }

    /// Walk the cascade up to the subject dropdown for one year and return
    /// its options
    async fn open_subject_list(
        &self,
        nav: &Navigator,
        year: u16,
    ) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        nav.open_archive(&self.archive_url).await?;
        nav.select_value(VIEW_TYPE_SELECT, self.material.archive_value())
            .await?;

        // Not every material type goes back the full range; deferred papers
        // only exist for recent years
        let offered = nav.dropdown_options(YEAR_SELECT).await?;
        if !year_offered(&offered, year) {
            return Err(format!(
                "year {} not offered for {}",
                year,
                self.material.archive_value()
            )
            .into());
        }

        nav.select_value(YEAR_SELECT, &year.to_string()).await?;
        nav.select_value(EXAMINATION_SELECT, self.cert.archive_value())
            .await?;
        Ok(nav.dropdown_options(SUBJECT_SELECT).await?)
    }

    fn matching_subjects(&self, subjects: Vec<(String, String)>) -> Vec<(String, String)> {
        match &self.subject_query {
            None => subjects,
            Some(query) => {
                let query = query.to_lowercase();
                subjects
                    .into_iter()
                    .filter(|(value, text)| {
                        value.to_lowercase().contains(&query)
                            || text.to_lowercase().contains(&query)
                    })
                    .collect()
            }
        }
    }

    /// Select one subject in the already-walked cascade and download its
    /// documents
    async fn download_subject(
        &self,
        nav: &Navigator,
        http: &reqwest::Client,
        year: u16,
        subject_value: &str,
        subject_text: &str,
        summary: &mut Summary,
    ) -> Result<(), Box<dyn Error>> {
        nav.select_value(SUBJECT_SELECT, subject_value).await?;

        let docs = nav.document_links().await?;
        if docs.is_empty() {
            ::log::warn!("no document links for {} ({})", subject_text, year);
            return Ok(());
        }
        ::log::info!("found {} document link(s)", docs.len());

        let docs = match &self.language {
            Some(filter) => {
                let outcome = filter.partition(docs);
                for doc in &outcome.unmatched {
                    ::log::warn!(
                        "no language tag in {:?} matches {:?}, skipping",
                        doc.text,
                        filter.codes()
                    );
                }
                summary.filtered_out += outcome.unmatched.len();
                outcome.matched
            }
            None => docs,
        };

        for doc in docs {
            if let Some(wanted) = self.paper_level {
                if PaperLevel::classify(&doc.text) != wanted {
                    summary.filtered_out += 1;
                    continue;
                }
            }

            let dest = naming::target_path(&self.output, self.cert, subject_text, year, &doc);
            match fetch::fetch_to_path(http, &doc.url, &dest, &self.policy).await {
                Ok(FetchOutcome::AlreadyPresent) => {
                    ::log::info!("already exists: {}", dest.display());
                    summary.already_present += 1;
                }
                Ok(FetchOutcome::Downloaded(bytes)) => {
                    ::log::info!("downloaded {} ({} bytes)", dest.display(), bytes);
                    summary.downloaded += 1;
                    tokio::time::sleep(self.download_delay).await;
                }
                Err(e) => {
                    // One bad document never aborts the batch
                    ::log::error!("failed to download {}: {}", doc.url, e);
                    summary.failed += 1;
                }
            }
        }
        Ok(())
    }
}

/// Whether the year dropdown currently lists this year
fn year_offered(options: &[(String, String)], year: u16) -> bool {
    let year = year.to_string();
    options.iter().any(|(value, _)| *value == year)
}
