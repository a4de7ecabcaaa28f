use clap::{Parser, ValueEnum};
use examfetch::{CertLevel, MaterialType, PaperLevel};

#[derive(Parser, Debug)]
#[command(name = "examfetch")]
#[command(about = "Downloads exam papers and marking schemes from the State Examination Commission archive")]
#[command(version)]
pub struct Args {
    /// Certification level
    #[arg(long, value_enum)]
    pub cert: CertArg,

    /// Subject to download (case-insensitive substring; omitted = all subjects)
    #[arg(long)]
    pub subject: Option<String>,

    /// Paper level to keep (filters results, not the scraping)
    #[arg(long, value_enum, default_value_t = PaperLevelArg::All)]
    pub paper_level: PaperLevelArg,

    /// Specific year (e.g. 2024)
    #[arg(long)]
    pub year: Option<u16>,

    /// Year range (e.g. 2020-2024)
    #[arg(long)]
    pub year_range: Option<String>,

    /// Material type
    #[arg(long = "type", value_enum, default_value_t = MaterialArg::ExamPapers)]
    pub material: MaterialArg,

    /// Output base directory
    #[arg(long, default_value = "downloads")]
    pub output: std::path::PathBuf,

    /// Delay in seconds between downloads (increase if downloads get flaky)
    #[arg(long, default_value_t = 2.0)]
    pub delay: f64,

    /// Language versions: EV (English), IV (Irish), BV (Bilingual), or "all".
    /// Comma-separated.
    #[arg(long, default_value = "EV,BV")]
    pub language: String,

    /// URL of the WebDriver server
    #[arg(long, default_value = "http://localhost:4444")]
    pub webdriver_url: String,

    /// List available subjects for the selection and exit
    #[arg(long)]
    pub list_subjects: bool,

    /// Check which years offer the level and subject, then exit
    #[arg(long)]
    pub check_years: bool,

    /// Optional JSON configuration file
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CertArg {
    /// Leaving Certificate
    Lc,
    /// Junior Certificate
    Jc,
    /// Leaving Certificate Applied
    Lca,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MaterialArg {
    ExamPapers,
    MarkingSchemes,
    DeferredExams,
    DeferredMarkingSchemes,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaperLevelArg {
    Higher,
    Ordinary,
    Foundation,
    All,
}

/// Convert from CLI certification level to the library type
pub fn convert_cert(arg: CertArg) -> CertLevel {
    match arg {
        CertArg::Lc => CertLevel::LeavingCert,
        CertArg::Jc => CertLevel::JuniorCert,
        CertArg::Lca => CertLevel::LeavingCertApplied,
    }
}

/// Convert from CLI material type to the library type
pub fn convert_material(arg: MaterialArg) -> MaterialType {
    match arg {
        MaterialArg::ExamPapers => MaterialType::ExamPapers,
        MaterialArg::MarkingSchemes => MaterialType::MarkingSchemes,
        MaterialArg::DeferredExams => MaterialType::DeferredExams,
        MaterialArg::DeferredMarkingSchemes => MaterialType::DeferredMarkingSchemes,
    }
}

/// Convert from CLI paper level to the library type (`All` means no filter)
pub fn convert_paper_level(arg: PaperLevelArg) -> Option<PaperLevel> {
    match arg {
        PaperLevelArg::Higher => Some(PaperLevel::Higher),
        PaperLevelArg::Ordinary => Some(PaperLevel::Ordinary),
        PaperLevelArg::Foundation => Some(PaperLevel::Foundation),
        PaperLevelArg::All => None,
    }
}

/// Resolve the year flags into the list of years to walk.
///
/// `--year` wins over `--year-range`; with neither, the full archive range
/// is used.
pub fn years_from_args(year: Option<u16>, range: Option<&str>) -> Result<Vec<u16>, String> {
    if let Some(year) = year {
        return Ok(vec![year]);
    }

    if let Some(range) = range {
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| format!("invalid year range '{}', expected START-END", range))?;
        let start: u16 = start
            .trim()
            .parse()
            .map_err(|_| format!("invalid start year '{}'", start))?;
        let end: u16 = end
            .trim()
            .parse()
            .map_err(|_| format!("invalid end year '{}'", end))?;
        if start > end {
            return Err(format!("year range '{}' is backwards", range));
        }
        return Ok((start..=end).collect());
    }

    // All years the archive has ever offered
    Ok((1995..=2025).collect())
}
