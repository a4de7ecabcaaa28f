use crate::docs::DocRef;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Maximum length of a generated filename, in characters
pub const MAX_FILENAME_LEN: usize = 200;

/// National certification levels offered by the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertLevel {
    LeavingCert,
    JuniorCert,
    LeavingCertApplied,
}

impl CertLevel {
    /// The option value used by the archive's examination dropdown
    pub fn archive_value(self) -> &'static str {
        match self {
            CertLevel::LeavingCert => "lc",
            CertLevel::JuniorCert => "jc",
            CertLevel::LeavingCertApplied => "lca",
        }
    }

    /// Top-level directory name for downloads of this level
    pub fn dir_name(self) -> &'static str {
        match self {
            CertLevel::LeavingCert => "Leaving_Certificate",
            CertLevel::JuniorCert => "Junior_Certificate",
            CertLevel::LeavingCertApplied => "Leaving_Certificate_Applied",
        }
    }
}

/// Kinds of material the archive serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialType {
    ExamPapers,
    MarkingSchemes,
    DeferredExams,
    DeferredMarkingSchemes,
}

impl MaterialType {
    /// The option value used by the archive's material type dropdown
    pub fn archive_value(self) -> &'static str {
        match self {
            MaterialType::ExamPapers => "exampapers",
            MaterialType::MarkingSchemes => "markingschemes",
            MaterialType::DeferredExams => "deferredexams",
            MaterialType::DeferredMarkingSchemes => "deferredmarkingschemes",
        }
    }
}

/// Paper level, inferred from the document description text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperLevel {
    Higher,
    Ordinary,
    Foundation,
    /// Description carried no recognizable level (common for sound files,
    /// source material, LCA papers)
    Other,
}

impl PaperLevel {
    /// Classify a document description into a paper level.
    ///
    /// This is a best-effort string heuristic; anything without a
    /// recognizable level keyword lands in `Other` rather than being dropped.
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("higher") {
            PaperLevel::Higher
        } else if text.contains("ordinary") {
            PaperLevel::Ordinary
        } else if text.contains("foundation") {
            PaperLevel::Foundation
        } else {
            PaperLevel::Other
        }
    }

    /// Subdirectory name for documents of this level
    pub fn dir_name(self) -> &'static str {
        match self {
            PaperLevel::Higher => "Higher",
            PaperLevel::Ordinary => "Ordinary",
            PaperLevel::Foundation => "Foundation",
            PaperLevel::Other => "Other",
        }
    }
}

/// Convert link text into a safe filename.
///
/// Strips characters that are invalid in path components, collapses
/// whitespace runs to underscores, trims stray dots/underscores, and caps
/// the result at [`MAX_FILENAME_LEN`] characters.
pub fn sanitize_filename(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();

    let whitespace = Regex::new(r"\s+").expect("static regex");
    let joined = whitespace.replace_all(stripped.trim(), "_");
    let trimmed = joined.trim_matches(|c| c == '.' || c == '_');

    trimmed.chars().take(MAX_FILENAME_LEN).collect()
}

/// Filename for a document, preferring the server-side hint.
///
/// Without a hint, the sanitized description is used with a `.pdf`
/// extension. A year prefix is prepended unless already present.
pub fn document_filename(year: u16, doc: &DocRef) -> String {
    let mut filename = match &doc.filename_hint {
        Some(hint) => hint.clone(),
        None => {
            let mut name = sanitize_filename(&doc.text);
            if name.is_empty() {
                name = "document".to_string();
            }
            if !name.to_lowercase().ends_with(".pdf") {
                name.push_str(".pdf");
            }
            name
        }
    };

    let prefix = year.to_string();
    if !filename.starts_with(&prefix) {
        filename = format!("{}_{}", prefix, filename);
    }
    filename
}

/// On-disk location for a document: `output/CertDir/Subject/Level/filename`.
///
/// Pure function of the selection context and the document reference, so
/// repeated calls with the same inputs always agree.
pub fn target_path(
    output: &Path,
    cert: CertLevel,
    subject: &str,
    year: u16,
    doc: &DocRef,
) -> PathBuf {
    let subject_dir = subject.replace(['/', '\\'], "_");
    let level = PaperLevel::classify(&doc.text);

    output
        .join(cert.dir_name())
        .join(subject_dir)
        .join(level.dir_name())
        .join(document_filename(year, doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> DocRef {
        DocRef::new("https://example.com/a?fp=1".to_string(), text.to_string(), None)
    }

    #[test]
    fn test_sanitize_strips_invalid_characters() {
        let result = sanitize_filename("Maths <Paper 1>: \"Higher\"/\\|?*Level");
        for c in ['<', '>', ':', '"', '/', '\\', '|', '?', '*'] {
            assert!(!result.contains(c), "found {:?} in {:?}", c, result);
        }
        assert_eq!(result, "Maths_Paper_1_HigherLevel");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_filename(&long).chars().count(), MAX_FILENAME_LEN);
    }

    #[test]
    fn test_sanitize_trims_dots_and_underscores() {
        assert_eq!(sanitize_filename("._Paper One_."), "Paper_One");
    }

    #[test]
    fn test_sanitize_empty_input() {
        assert_eq!(sanitize_filename("  "), "");
    }

    #[test]
    fn test_classify_levels() {
        assert_eq!(PaperLevel::classify("Higher Level Paper 1 (EV)"), PaperLevel::Higher);
        assert_eq!(PaperLevel::classify("Ordinary Level (BV)"), PaperLevel::Ordinary);
        assert_eq!(PaperLevel::classify("Foundation Level"), PaperLevel::Foundation);
        assert_eq!(PaperLevel::classify("Sound File Track 1"), PaperLevel::Other);
    }

    #[test]
    fn test_document_filename_uses_hint_verbatim() {
        let doc = DocRef::new(
            "https://example.com/a?fp=1".to_string(),
            "Higher Level (EV)".to_string(),
            Some("2023_LC003ALP100EV.pdf".to_string()),
        );
        assert_eq!(document_filename(2023, &doc), "2023_LC003ALP100EV.pdf");
    }

    #[test]
    fn test_document_filename_adds_year_prefix_and_extension() {
        assert_eq!(
            document_filename(2023, &doc("Higher Level Paper 1 (EV)")),
            "2023_Higher_Level_Paper_1_(EV).pdf"
        );
    }

    #[test]
    fn test_target_path_is_deterministic() {
        let d = doc("Higher Level Paper 1 (EV)");
        let first = target_path(Path::new("downloads"), CertLevel::LeavingCert, "Mathematics", 2023, &d);
        let second = target_path(Path::new("downloads"), CertLevel::LeavingCert, "Mathematics", 2023, &d);
        assert_eq!(first, second);
        assert_eq!(
            first,
            Path::new("downloads")
                .join("Leaving_Certificate")
                .join("Mathematics")
                .join("Higher")
                .join("2023_Higher_Level_Paper_1_(EV).pdf")
        );
    }

    #[test]
    fn test_target_path_sanitizes_subject_separator() {
        let d = doc("Ordinary Level (EV)");
        let path = target_path(
            Path::new("out"),
            CertLevel::JuniorCert,
            "Civic/Social/Political Education",
            2020,
            &d,
        );
        assert!(path.starts_with(
            Path::new("out")
                .join("Junior_Certificate")
                .join("Civic_Social_Political Education")
        ));
    }
}
