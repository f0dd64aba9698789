//! Data structures describing the content of a daily site report.
//!
//! [`ReportRecord`] is a serialization-friendly model that mirrors the fields
//! collected by the entry form. It intentionally avoids referencing the
//! rendering module so values can be produced by frontends, read from files,
//! or exchanged over the network without pulling in the PDF stack.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's construction-site report.
///
/// Every field except `date` is free text. Empty strings are valid everywhere;
/// the multi-line fields (`safety`, `work`, `issues`, `tomorrow`) may contain
/// embedded newlines, which the layout planner turns into separate output
/// lines. A record is built fresh per submission, consumed once by the
/// renderer, and never persisted by this crate.
///
/// Deserialization rejects records with missing fields outright — an absent
/// field is a caller contract violation, while an empty string is ordinary
/// input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Report date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Site or location name.
    pub site: String,
    /// Weather description.
    pub weather: String,
    /// Name of the person preparing the report.
    pub manager: String,
    /// Worker headcount description.
    pub workers: String,
    /// Safety-check notes, possibly multi-line.
    pub safety: String,
    /// Work performed, possibly multi-line.
    pub work: String,
    /// Defects and corrective actions, possibly multi-line.
    pub issues: String,
    /// Next-day plan, possibly multi-line.
    pub tomorrow: String,
}

impl ReportRecord {
    /// Returns the report date formatted as `YYYY-MM-DD`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Builds the suggested output filename, `<label>_<YYYY-MM-DD>.pdf`.
    pub fn suggested_filename(&self, label: &str) -> String {
        format!("{}_{}.pdf", label, self.formatted_date())
    }
}
