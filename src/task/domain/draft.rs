//! Unvalidated child input collected from task forms.
//!
//! Forms submit processes and links as parallel lists (one list per column).
//! Rows are zipped, truncated to the shortest list, and blank padding rows
//! are dropped before validation.

use super::{Process, RelatedLink, TaskDomainError};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Process input awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDraft {
    /// Process name.
    pub name: String,
    /// Optional start date.
    pub start_date: Option<NaiveDate>,
    /// End date; required once the draft becomes a process.
    pub end_date: Option<NaiveDate>,
}

impl ProcessDraft {
    /// Creates a process draft.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
        }
    }

    /// Builds drafts from the parallel name/start/end form columns.
    ///
    /// Rows with a blank name are padding and are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDate`] when a non-blank date does
    /// not parse as `YYYY-MM-DD`.
    pub fn from_form_rows<S: AsRef<str>>(
        names: &[S],
        start_dates: &[S],
        end_dates: &[S],
    ) -> Result<Vec<Self>, TaskDomainError> {
        let mut drafts = Vec::new();
        for ((name, start), end) in names.iter().zip(start_dates).zip(end_dates) {
            let name_text: &str = name.as_ref();
            if name_text.trim().is_empty() {
                continue;
            }
            drafts.push(Self::new(
                name_text,
                parse_optional_date(start.as_ref())?,
                parse_optional_date(end.as_ref())?,
            ));
        }
        Ok(drafts)
    }

    /// Validates the draft into a detached [`Process`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProcessName`] for a blank name and
    /// [`TaskDomainError::MissingProcessEndDate`] when no end date was given.
    pub fn into_process(self) -> Result<Process, TaskDomainError> {
        let end_date = self
            .end_date
            .ok_or_else(|| TaskDomainError::MissingProcessEndDate(self.name.trim().to_owned()))?;
        Process::new(self.name, self.start_date, end_date)
    }
}

/// Related link input awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLinkDraft {
    /// Display name.
    pub name: String,
    /// Target URL.
    pub url: String,
}

impl RelatedLinkDraft {
    /// Creates a related link draft.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Builds drafts from the parallel name/URL form columns.
    ///
    /// Rows where both columns are blank are skipped. A row with only one
    /// column filled is not dropped silently: it fails the whole form, so a
    /// link missing its URL (or name) is reported instead of lost.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IncompleteRelatedLink`] when a row fills
    /// only one of the two columns.
    pub fn from_form_rows<S: AsRef<str>>(
        names: &[S],
        urls: &[S],
    ) -> Result<Vec<Self>, TaskDomainError> {
        let mut drafts = Vec::new();
        for (name, url) in names.iter().zip(urls) {
            let name_text: &str = name.as_ref();
            let url_text: &str = url.as_ref();
            match (name_text.trim().is_empty(), url_text.trim().is_empty()) {
                (true, true) => {}
                (false, false) => drafts.push(Self::new(name_text, url_text)),
                _ => return Err(TaskDomainError::IncompleteRelatedLink),
            }
        }
        Ok(drafts)
    }

    /// Validates the draft into a detached [`RelatedLink`].
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`RelatedLink::new`].
    pub fn into_related_link(self) -> Result<RelatedLink, TaskDomainError> {
        RelatedLink::new(self.name, self.url)
    }
}

/// Parses a form date field, treating a blank value as absent.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDate`] when the value is not blank and
/// does not parse as `YYYY-MM-DD`.
pub fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| TaskDomainError::InvalidDate(trimmed.to_owned()))
}
