//! Export: turns the current resume into a print document.
//!
//! Flow: precondition check → normalize section order → render markup →
//! primary print target → (on failure) fallback target with the same markup.
//! Only when both targets fail does the caller see an `Export` error.

pub mod handlers;
pub mod html;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::notify::{Notification, Notifier};
use crate::sections::SectionManager;

/// A rendered, print-ready document.
#[derive(Debug, Clone)]
pub struct PrintDocument {
    pub title: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintReceipt {
    pub target: String,
    /// Where the document landed, when the target stores it somewhere.
    pub location: Option<String>,
}

/// Somewhere a print document can be sent.
#[async_trait]
pub trait PrintTarget: Send + Sync {
    async fn print(&self, document: &PrintDocument) -> Result<PrintReceipt, AppError>;
}

/// Writes each document as an HTML file into a directory.
pub struct FilePrintTarget {
    dir: PathBuf,
}

impl FilePrintTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FilePrintTarget { dir: dir.into() }
    }
}

#[async_trait]
impl PrintTarget for FilePrintTarget {
    async fn print(&self, document: &PrintDocument) -> Result<PrintReceipt, AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Export(format!("Cannot create {}: {e}", self.dir.display())))?;
        let file_name = format!(
            "{}-{}.html",
            slug(&document.title),
            Utc::now().format("%Y%m%d%H%M%S")
        );
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &document.html)
            .await
            .map_err(|e| AppError::Export(format!("Cannot write {}: {e}", path.display())))?;
        Ok(PrintReceipt {
            target: "file".to_string(),
            location: Some(path.display().to_string()),
        })
    }
}

/// Hands the serialized document straight back to the caller, which opens
/// it in a fresh print window.
pub struct InlinePrintTarget;

#[async_trait]
impl PrintTarget for InlinePrintTarget {
    async fn print(&self, _document: &PrintDocument) -> Result<PrintReceipt, AppError> {
        Ok(PrintReceipt {
            target: "inline".to_string(),
            location: None,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub receipt: PrintReceipt,
    pub used_fallback: bool,
    /// Sections that produced output; empty ones are left out of the document.
    pub section_count: usize,
    pub html: String,
}

pub struct Exporter {
    primary: Arc<dyn PrintTarget>,
    fallback: Arc<dyn PrintTarget>,
    notifier: Arc<dyn Notifier>,
}

impl Exporter {
    pub fn new(
        primary: Arc<dyn PrintTarget>,
        fallback: Arc<dyn PrintTarget>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Exporter {
            primary,
            fallback,
            notifier,
        }
    }

    pub async fn export(&self, data: &ResumeData) -> Result<ExportOutcome, AppError> {
        if data.personal_info.name.trim().is_empty() {
            let message = "Please add your name before exporting your resume";
            self.notifier.notify(Notification::error(message));
            return Err(AppError::Validation(message.to_string()));
        }

        let mut data = data.clone();
        let manager = SectionManager::new(&mut data);
        let sections: Vec<_> = manager.ordered_visible().into_iter().cloned().collect();
        let section_refs: Vec<_> = sections.iter().collect();
        let markup = html::render_document(&section_refs, &data);
        let section_count = markup.section_count;
        let document = PrintDocument {
            title: data.personal_info.name.trim().to_string(),
            html: markup.html,
        };

        let (receipt, used_fallback) = match self.primary.print(&document).await {
            Ok(receipt) => (receipt, false),
            Err(primary_err) => {
                warn!("Primary print target failed, using fallback: {primary_err}");
                match self.fallback.print(&document).await {
                    Ok(receipt) => {
                        self.notifier.notify(Notification::warning(
                            "Printing directly failed; opened the resume in a new print window instead",
                        ));
                        (receipt, true)
                    }
                    Err(fallback_err) => {
                        self.notifier
                            .notify(Notification::error("Export failed. Please try again."));
                        return Err(AppError::Export(format!(
                            "primary: {primary_err}; fallback: {fallback_err}"
                        )));
                    }
                }
            }
        };

        info!(
            "Exported resume for {} via {} ({} sections)",
            document.title,
            receipt.target,
            section_count
        );
        self.notifier.notify(Notification::success("Resume exported"));

        Ok(ExportOutcome {
            receipt,
            used_fallback,
            section_count,
            html: document.html,
        })
    }
}

fn slug(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "resume".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::NotificationLevel;

    /// Counts print calls and accepts every document.
    #[derive(Default)]
    struct CountingTarget {
        calls: AtomicUsize,
    }

    impl CountingTarget {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PrintTarget for CountingTarget {
        async fn print(&self, _document: &PrintDocument) -> Result<PrintReceipt, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PrintReceipt {
                target: "counting".to_string(),
                location: None,
            })
        }
    }

    struct BrokenTarget;

    #[async_trait]
    impl PrintTarget for BrokenTarget {
        async fn print(&self, _document: &PrintDocument) -> Result<PrintReceipt, AppError> {
            Err(AppError::Export("print dialog unavailable".to_string()))
        }
    }

    fn named(name: &str) -> ResumeData {
        let mut data = ResumeData::default();
        data.personal_info.name = name.to_string();
        data
    }

    #[tokio::test]
    async fn test_refuses_without_name() {
        let notifier = Arc::new(RecordingNotifier::default());
        let primary = Arc::new(CountingTarget::default());
        let fallback = Arc::new(CountingTarget::default());
        let exporter = Exporter::new(primary.clone(), fallback.clone(), notifier.clone());

        let err = exporter.export(&named("  ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(primary.calls(), 0);
        assert_eq!(fallback.calls(), 0);
        let seen = notifier.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].level, NotificationLevel::Error);

        exporter.export(&named("Jane")).await.unwrap();
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_primary_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(
            Arc::new(FilePrintTarget::new(dir.path())),
            Arc::new(InlinePrintTarget),
            Arc::new(RecordingNotifier::default()),
        );
        let outcome = exporter.export(&named("Jane Doe")).await.unwrap();
        assert!(!outcome.used_fallback);
        let location = outcome.receipt.location.unwrap();
        assert!(location.contains("jane-doe-"));
        let written = std::fs::read_to_string(location).unwrap();
        assert_eq!(written, outcome.html);
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_fails() {
        let notifier = Arc::new(RecordingNotifier::default());
        let exporter = Exporter::new(Arc::new(BrokenTarget), Arc::new(InlinePrintTarget), notifier.clone());
        let outcome = exporter.export(&named("Jane")).await.unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(outcome.receipt.target, "inline");
        assert!(outcome.html.contains("<h1>Jane</h1>"));
        assert!(notifier
            .seen()
            .iter()
            .any(|n| n.level == NotificationLevel::Warning));
    }

    #[tokio::test]
    async fn test_both_targets_failing_surfaces_error() {
        let exporter = Exporter::new(
            Arc::new(BrokenTarget),
            Arc::new(BrokenTarget),
            Arc::new(RecordingNotifier::default()),
        );
        assert!(matches!(
            exporter.export(&named("Jane")).await,
            Err(AppError::Export(_))
        ));
    }

    #[tokio::test]
    async fn test_hidden_sections_not_exported() {
        let mut data = named("Jane");
        data.summary = "Hidden summary text".into();
        data.interests = "Chess".into();
        SectionManager::new(&mut data)
            .set_visibility("summary", false)
            .unwrap();
        let exporter = Exporter::new(
            Arc::new(InlinePrintTarget),
            Arc::new(InlinePrintTarget),
            Arc::new(RecordingNotifier::default()),
        );
        let outcome = exporter.export(&data).await.unwrap();
        assert!(!outcome.html.contains("Hidden summary text"));
        assert!(outcome.html.contains("Chess"));
        // Header and interests; the other visible sections are empty.
        assert_eq!(outcome.section_count, 2);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Jane  O'Neil"), "jane-o-neil");
        assert_eq!(slug("***"), "resume");
    }
}
