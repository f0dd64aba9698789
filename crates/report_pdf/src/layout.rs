//! Line placement and pagination for the report renderer.
//!
//! The planner turns a [`ReportRecord`] into pages of positioned lines without
//! touching the PDF layer, so pagination behaviour can be tested directly.
//! All distances are PDF points measured from the bottom-left page corner.

use crate::model::ReportRecord;

/// ISO A4 width in points.
pub const A4_WIDTH_PT: f64 = 595.28;
/// ISO A4 height in points.
pub const A4_HEIGHT_PT: f64 = 841.89;

/// Geometry and typography knobs for the planner.
///
/// The defaults reproduce the established report layout: text starts 50 points
/// below the top edge, pages break once the cursor drops under 60 points from
/// the bottom, and every line advances the cursor by a fixed 14-point pitch.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Page width in points.
    pub page_width: f64,
    /// Page height in points.
    pub page_height: f64,
    /// Distance from the top edge to the first baseline of a page.
    pub top_margin: f64,
    /// Cursor position below which the current page is finalized.
    pub bottom_threshold: f64,
    /// Distance from the left edge at which every line is drawn.
    pub left_margin: f64,
    /// Vertical advance applied after each drawn line.
    pub line_pitch: f64,
    /// Extra vertical advance applied after each field or section.
    pub section_gap: f64,
    /// Font size for labels, headers and body text.
    pub font_size: f64,
    /// Font size for the optional title line.
    pub title_size: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            top_margin: 50.0,
            bottom_threshold: 60.0,
            left_margin: 40.0,
            line_pitch: 14.0,
            section_gap: 6.0,
            font_size: 10.0,
            title_size: 14.0,
        }
    }
}

/// Strategy for fitting one logical line into the bounded page width.
///
/// The drawing primitive has no built-in word wrap, so the planner delegates
/// width limiting to this trait. The stock implementation is a hard character
/// cut; a glyph-measuring wrap can be swapped in without touching pagination.
pub trait LineWrap {
    /// Splits one logical line into the lines actually drawn, in order.
    fn wrap(&self, text: &str) -> Vec<String>;
}

/// Hard cut after a fixed number of characters, no ellipsis, no word-boundary
/// awareness. Always yields exactly one drawn line.
#[derive(Clone, Copy, Debug)]
pub struct HardTruncate {
    /// Maximum characters kept per drawn line.
    pub max_chars: usize,
}

impl Default for HardTruncate {
    fn default() -> Self {
        Self { max_chars: 110 }
    }
}

impl LineWrap for HardTruncate {
    fn wrap(&self, text: &str) -> Vec<String> {
        vec![text.chars().take(self.max_chars).collect()]
    }
}

/// Field labels drawn in front of the record values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldLabels {
    pub date: &'static str,
    pub site: &'static str,
    pub weather: &'static str,
    pub manager: &'static str,
    pub workers: &'static str,
    pub safety: &'static str,
    pub work: &'static str,
    pub issues: &'static str,
    pub tomorrow: &'static str,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            date: "Date",
            site: "Site",
            weather: "Weather",
            manager: "Prepared by",
            workers: "Workers",
            safety: "Safety checks",
            work: "Work performed",
            issues: "Issues / corrective actions",
            tomorrow: "Plan for tomorrow",
        }
    }
}

/// One rendering variant of the report.
///
/// The two historical variants of this document differ only in whether a bold
/// title line opens the first page, so both are expressed as profiles of a
/// single planner instead of separate code paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderProfile {
    /// Bold title drawn at the top of the first page, if any.
    pub title: Option<String>,
    /// Labels used for the record fields.
    pub labels: FieldLabels,
}

impl RenderProfile {
    /// Profile without a title line.
    pub fn plain() -> Self {
        Self {
            title: None,
            labels: FieldLabels::default(),
        }
    }

    /// Profile that opens the first page with a bold title line.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            labels: FieldLabels::default(),
        }
    }
}

/// One line positioned on a page, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedLine {
    /// Horizontal position of the line start, in points from the left edge.
    pub x: f64,
    /// Baseline position, in points from the bottom edge.
    pub y: f64,
    /// Text to draw, already width-limited.
    pub text: String,
    /// Whether the line is drawn with the bold face.
    pub bold: bool,
    /// Font size in points.
    pub size: f64,
}

/// All lines placed on one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlannedPage {
    pub lines: Vec<PlannedLine>,
}

/// Lays out `record` into pages according to `profile` and `options`.
///
/// The field order is fixed: the optional title, then the five labeled lines
/// (date, site, weather, manager, workers), then the four header-plus-body
/// sections (safety, work, issues, tomorrow). Embedded newlines in any value
/// become separate drawn lines. At least one page is always produced.
pub fn plan(
    record: &ReportRecord,
    profile: &RenderProfile,
    options: &LayoutOptions,
    wrap: &dyn LineWrap,
) -> Vec<PlannedPage> {
    let mut planner = Planner::new(options, wrap);
    let labels = &profile.labels;

    if let Some(title) = &profile.title {
        planner.unit(&[(title.as_str(), true, options.title_size)]);
    }

    let labeled = [
        (labels.date, record.formatted_date()),
        (labels.site, record.site.clone()),
        (labels.weather, record.weather.clone()),
        (labels.manager, record.manager.clone()),
        (labels.workers, record.workers.clone()),
    ];
    for (label, value) in &labeled {
        let line = format!("{}: {}", label, value);
        planner.unit(&[(line.as_str(), false, options.font_size)]);
    }

    let sections = [
        (labels.safety, record.safety.as_str()),
        (labels.work, record.work.as_str()),
        (labels.issues, record.issues.as_str()),
        (labels.tomorrow, record.tomorrow.as_str()),
    ];
    for (header, body) in sections {
        planner.unit(&[
            (header, true, options.font_size),
            (body, false, options.font_size),
        ]);
    }

    planner.finish()
}

struct Planner<'a> {
    options: &'a LayoutOptions,
    wrap: &'a dyn LineWrap,
    pages: Vec<PlannedPage>,
    current: Vec<PlannedLine>,
    y: f64,
}

impl<'a> Planner<'a> {
    fn new(options: &'a LayoutOptions, wrap: &'a dyn LineWrap) -> Self {
        Self {
            options,
            wrap,
            pages: Vec::new(),
            current: Vec::new(),
            y: options.page_height - options.top_margin,
        }
    }

    /// Places one field or section, then applies the inter-section gap once.
    fn unit(&mut self, parts: &[(&str, bool, f64)]) {
        for (text, bold, size) in parts {
            for sub in text.split('\n') {
                for drawn in self.wrap.wrap(sub) {
                    self.place(drawn, *bold, *size);
                }
            }
        }
        self.y -= self.options.section_gap;
    }

    fn place(&mut self, text: String, bold: bool, size: f64) {
        if self.y < self.options.bottom_threshold {
            self.break_page();
        }
        self.current.push(PlannedLine {
            x: self.options.left_margin,
            y: self.y,
            text,
            bold,
            size,
        });
        self.y -= self.options.line_pitch;
    }

    fn break_page(&mut self) {
        let lines = std::mem::take(&mut self.current);
        self.pages.push(PlannedPage { lines });
        self.y = self.options.page_height - self.options.top_margin;
    }

    fn finish(mut self) -> Vec<PlannedPage> {
        let lines = std::mem::take(&mut self.current);
        self.pages.push(PlannedPage { lines });
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> ReportRecord {
        ReportRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            site: "A".into(),
            weather: "Sunny".into(),
            manager: "B".into(),
            workers: "3".into(),
            safety: String::new(),
            work: String::new(),
            issues: String::new(),
            tomorrow: String::new(),
        }
    }

    fn plan_default(record: &ReportRecord) -> Vec<PlannedPage> {
        plan(
            record,
            &RenderProfile::plain(),
            &LayoutOptions::default(),
            &HardTruncate::default(),
        )
    }

    fn all_lines(pages: &[PlannedPage]) -> Vec<&PlannedLine> {
        pages.iter().flat_map(|page| page.lines.iter()).collect()
    }

    #[test]
    fn minimal_record_fits_one_page() {
        let pages = plan_default(&record());
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].lines.is_empty());
    }

    #[test]
    fn all_empty_fields_still_produce_lines() {
        let mut empty = record();
        empty.site = String::new();
        empty.weather = String::new();
        empty.manager = String::new();
        empty.workers = String::new();
        let pages = plan_default(&empty);
        assert_eq!(pages.len(), 1);
        // Five labeled lines, four headers, four empty body lines.
        assert_eq!(pages[0].lines.len(), 13);
    }

    #[test]
    fn first_line_of_every_page_starts_at_top_margin() {
        let mut long = record();
        long.work = vec!["line"; 300].join("\n");
        let pages = plan_default(&long);
        assert!(pages.len() >= 3, "expected at least 3 pages, got {}", pages.len());

        let options = LayoutOptions::default();
        let top = options.page_height - options.top_margin;
        for page in &pages {
            let first = page.lines.first().expect("page must not be empty");
            assert!((first.y - top).abs() < 1.0, "first line at y={}", first.y);
        }
    }

    #[test]
    fn pages_break_only_at_bottom_threshold() {
        let mut long = record();
        long.work = vec!["line"; 300].join("\n");
        let pages = plan_default(&long);
        let options = LayoutOptions::default();

        for page in &pages[..pages.len() - 1] {
            let last = page.lines.last().unwrap();
            assert!(last.y >= options.bottom_threshold, "drew below threshold");
            // The break happened because the next advance crossed the
            // threshold, possibly including one section gap.
            assert!(
                last.y - options.line_pitch - options.section_gap
                    < options.bottom_threshold,
                "page broke early at y={}",
                last.y
            );
        }
    }

    #[test]
    fn overlong_line_is_cut_to_110_chars() {
        let mut wide = record();
        wide.work = "x".repeat(200);
        let pages = plan_default(&wide);
        let lines = all_lines(&pages);
        let drawn = lines
            .iter()
            .find(|line| line.text.starts_with("xxx"))
            .expect("work body line present");
        assert_eq!(drawn.text.chars().count(), 110);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut wide = record();
        wide.safety = "あ".repeat(200);
        let pages = plan_default(&wide);
        let lines = all_lines(&pages);
        let drawn = lines
            .iter()
            .find(|line| line.text.starts_with('あ'))
            .expect("safety body line present");
        assert_eq!(drawn.text.chars().count(), 110);
    }

    #[test]
    fn field_order_is_stable() {
        let mut marked = record();
        marked.site = "M_SITE".into();
        marked.weather = "M_WEATHER".into();
        marked.manager = "M_MANAGER".into();
        marked.workers = "M_WORKERS".into();
        marked.safety = "M_SAFETY".into();
        marked.work = "M_WORKDONE".into();
        marked.issues = "M_ISSUES".into();
        marked.tomorrow = "M_TOMORROW".into();

        let pages = plan_default(&marked);
        let text: Vec<String> = all_lines(&pages)
            .iter()
            .map(|line| line.text.clone())
            .collect();
        let position = |marker: &str| {
            text.iter()
                .position(|line| line.contains(marker))
                .unwrap_or_else(|| panic!("marker {marker} missing"))
        };

        let order = [
            position("2024-01-01"),
            position("M_SITE"),
            position("M_WEATHER"),
            position("M_MANAGER"),
            position("M_WORKERS"),
            position("M_SAFETY"),
            position("M_WORKDONE"),
            position("M_ISSUES"),
            position("M_TOMORROW"),
        ];
        let mut sorted = order;
        sorted.sort_unstable();
        assert_eq!(order, sorted, "fields drawn out of order");
    }

    #[test]
    fn multi_line_fields_split_on_newlines() {
        let mut multi = record();
        multi.issues = "first\nsecond\nthird".into();
        let pages = plan_default(&multi);
        let lines = all_lines(&pages);
        let texts: Vec<&str> = lines.iter().map(|line| line.text.as_str()).collect();
        let first = texts.iter().position(|t| *t == "first").unwrap();
        assert_eq!(texts[first + 1], "second");
        assert_eq!(texts[first + 2], "third");
    }

    #[test]
    fn section_gap_applies_once_per_unit() {
        let pages = plan_default(&record());
        let lines = &pages[0].lines;
        let options = LayoutOptions::default();
        // Consecutive labeled lines are separated by pitch plus gap.
        let delta = lines[0].y - lines[1].y;
        assert!((delta - (options.line_pitch + options.section_gap)).abs() < 1e-9);
    }

    #[test]
    fn titled_profile_adds_bold_first_line() {
        let pages = plan(
            &record(),
            &RenderProfile::titled("Daily Site Report"),
            &LayoutOptions::default(),
            &HardTruncate::default(),
        );
        let first = &pages[0].lines[0];
        assert_eq!(first.text, "Daily Site Report");
        assert!(first.bold);
        assert_eq!(first.size, LayoutOptions::default().title_size);

        let plain = plan_default(&record());
        assert_eq!(pages[0].lines.len(), plain[0].lines.len() + 1);
    }

    #[test]
    fn section_headers_are_bold_and_bodies_plain() {
        let mut marked = record();
        marked.work = "body text".into();
        let pages = plan_default(&marked);
        let lines = all_lines(&pages);
        let header = lines
            .iter()
            .find(|line| line.text == "Work performed")
            .unwrap();
        let body = lines.iter().find(|line| line.text == "body text").unwrap();
        assert!(header.bold);
        assert!(!body.bold);
    }

    #[test]
    fn planning_is_deterministic() {
        let mut long = record();
        long.work = vec!["repeat"; 120].join("\n");
        assert_eq!(plan_default(&long), plan_default(&long));
    }
}
