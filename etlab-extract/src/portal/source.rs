//! Page-source contract: where portal documents come from.
//!
//! Fetching is not this crate's job. A [`PageSource`] hands back raw HTML for
//! a page given a caller-owned [`SessionToken`]; [`load_document`] parses it
//! and turns the portal's login page into [`SourceError::SessionExpired`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::{fold, Document};
use crate::errors::SourceError;
use crate::semester::Semester;

/// Semester requested from the attendance page when the caller names none.
pub const DEFAULT_ATTENDANCE_SEMESTER: u8 = 5;

/// A student page of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalPage {
    /// Continuous-evaluation results.
    Results,
    /// End-semester examination results. Served from the results path.
    EndSemester,
    /// Semester-wise SGPA, CGPA and credits.
    AcademicAnalysis,
    /// Personal details.
    Profile,
    /// Subject-wise attendance.
    Attendance,
}

impl PortalPage {
    /// Every page, in a stable order.
    pub const ALL: [Self; 5] = [
        Self::Results,
        Self::EndSemester,
        Self::AcademicAnalysis,
        Self::Profile,
        Self::Attendance,
    ];

    /// Short name used on the command line and in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Results => "results",
            Self::EndSemester => "end-semester",
            Self::AcademicAnalysis => "academic-analysis",
            Self::Profile => "profile",
            Self::Attendance => "attendance",
        }
    }

    /// Path of the page relative to the portal base URL.
    #[must_use]
    pub fn path(self, semester: Option<Semester>) -> String {
        match self {
            Self::Results | Self::EndSemester => "/ktuacademics/student/results".to_string(),
            Self::AcademicAnalysis => "/ktuacademics/student/studentacademicsautonomous".to_string(),
            Self::Profile => "/student/profile".to_string(),
            Self::Attendance => format!(
                "/ktuacademics/student/viewattendancesubject/{}",
                semester.map_or(DEFAULT_ATTENDANCE_SEMESTER, Semester::get)
            ),
        }
    }
}

impl fmt::Display for PortalPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortalPage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("unknown page '{s}', expected one of: {}", known.join(", "))
            })
    }
}

/// The portal session cookie value, owned by the caller and passed to every
/// fetch. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw cookie value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Reads an `Authorization` header value, with or without a `Bearer `
    /// prefix.
    #[must_use]
    pub fn from_authorization(header: &str) -> Self {
        let header = header.trim();
        Self::new(header.strip_prefix("Bearer ").unwrap_or(header).trim())
    }

    /// The raw value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Supplies raw portal HTML.
pub trait PageSource: Send + Sync {
    /// Returns the HTML of `page` as seen by the holder of `token`.
    fn fetch(
        &self,
        page: PortalPage,
        semester: Option<Semester>,
        token: &SessionToken,
    ) -> Result<String, SourceError>;
}

/// Whether the document is the portal's login page, which the portal serves
/// in place of any page once a session has expired.
#[must_use]
pub fn is_login_page(doc: &Document) -> bool {
    doc.title().is_some_and(|t| fold(&t).contains("login"))
}

/// Fetches and parses a page, rejecting the login page.
pub fn load_document<S>(
    source: &S,
    page: PortalPage,
    semester: Option<Semester>,
    token: &SessionToken,
) -> Result<Document, SourceError>
where
    S: PageSource + ?Sized,
{
    let html = source.fetch(page, semester, token)?;
    let doc = Document::parse(&html);
    if is_login_page(&doc) {
        warn!(page = %page, "Portal returned its login page");
        return Err(SourceError::SessionExpired);
    }
    debug!(page = %page, bytes = html.len(), "Loaded portal page");
    Ok(doc)
}

/// In-memory page source, for saved pages and tests.
///
/// When an accepted token is set, any other token is answered with a login
/// page, as the portal does.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: HashMap<PortalPage, String>,
    accepted: Option<SessionToken>,
}

const LOGIN_PAGE: &str = "<html><head><title>Login | ETLab</title></head><body></body></html>";

impl StaticPageSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` for `page`.
    #[must_use]
    pub fn with_page(mut self, page: PortalPage, html: impl Into<String>) -> Self {
        self.pages.insert(page, html.into());
        self
    }

    /// Accepts only `token`.
    #[must_use]
    pub fn with_accepted_token(mut self, token: SessionToken) -> Self {
        self.accepted = Some(token);
        self
    }

    /// Number of stored pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageSource for StaticPageSource {
    fn fetch(
        &self,
        page: PortalPage,
        _semester: Option<Semester>,
        token: &SessionToken,
    ) -> Result<String, SourceError> {
        if self.accepted.as_ref().is_some_and(|t| t != token) {
            return Ok(LOGIN_PAGE.to_string());
        }
        self.pages
            .get(&page)
            .cloned()
            .ok_or_else(|| SourceError::PageUnavailable(page.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_paths() {
        assert_eq!(PortalPage::Results.path(None), "/ktuacademics/student/results");
        assert_eq!(
            PortalPage::Attendance.path(Semester::new(3).ok()),
            "/ktuacademics/student/viewattendancesubject/3"
        );
        assert_eq!(
            PortalPage::Attendance.path(None),
            "/ktuacademics/student/viewattendancesubject/5"
        );
    }

    #[test]
    fn test_page_from_str() {
        assert_eq!("end_semester".parse::<PortalPage>(), Ok(PortalPage::EndSemester));
        assert_eq!("Academic-Analysis".parse::<PortalPage>(), Ok(PortalPage::AcademicAnalysis));
        assert!("timetable".parse::<PortalPage>().is_err());
    }

    #[test]
    fn test_token_from_authorization() {
        assert_eq!(SessionToken::from_authorization("Bearer abc").as_str(), "abc");
        assert_eq!(SessionToken::from_authorization("abc").as_str(), "abc");
        assert_eq!(format!("{:?}", SessionToken::new("secret")), "SessionToken(***)");
    }

    #[test]
    fn test_login_page_detection() {
        assert!(is_login_page(&Document::parse(LOGIN_PAGE)));
        assert!(!is_login_page(&Document::parse(
            "<html><head><title>Results</title></head></html>"
        )));
        assert!(!is_login_page(&Document::parse("<p>no title</p>")));
    }

    #[test]
    fn test_load_document_rejects_login_page() {
        let source = StaticPageSource::new()
            .with_page(PortalPage::Profile, "<title>Profile</title><p>ok</p>")
            .with_accepted_token(SessionToken::new("good"));

        assert!(load_document(&source, PortalPage::Profile, None, &SessionToken::new("good")).is_ok());
        assert_eq!(
            load_document(&source, PortalPage::Profile, None, &SessionToken::new("stale")).unwrap_err(),
            SourceError::SessionExpired
        );
        assert!(matches!(
            load_document(&source, PortalPage::Results, None, &SessionToken::new("good")).unwrap_err(),
            SourceError::PageUnavailable(_)
        ));
    }
}
