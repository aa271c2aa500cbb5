//! Finds report placeholders by their sentinel framing.
//!
//! Wire contract with the host page: a report placeholder's text starts with `##`,
//! followed by the selector, followed by a second `##`. Anything after the closing
//! marker is ignored. Once populated the text is the rendered table, so the marker is
//! gone and the placeholder drops out of later scans.

use crate::page::HostPage;

pub const SENTINEL: &str = "##";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlaceholder {
    pub id: String,
    /// Passed verbatim to the tracker as the query filter.
    pub selector: String,
}

/// Selector framed by the sentinel at the start of `text`.
pub fn parse_selector(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(SENTINEL)?;
    let end = rest.find(SENTINEL)?;
    Some(&rest[..end])
}

/// Ready placeholders that still carry the sentinel, in page order.
pub fn find_report_placeholders(page: &dyn HostPage) -> Vec<ReportPlaceholder> {
    page.placeholders()
        .into_iter()
        .filter(|p| p.ready)
        .filter_map(|p| {
            parse_selector(&p.text).map(|selector| ReportPlaceholder {
                selector: selector.to_string(),
                id: p.id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    #[test]
    fn selector_between_markers() {
        assert_eq!(parse_selector("##Backend##"), Some("Backend"));
        assert_eq!(parse_selector("##Core UI## trailing text"), Some("Core UI"));
        assert_eq!(parse_selector("####"), Some(""));
    }

    #[test]
    fn no_marker_or_no_close() {
        assert_eq!(parse_selector("Backend"), None);
        assert_eq!(parse_selector(" ##Backend##"), None);
        assert_eq!(parse_selector("##Backend"), None);
        assert_eq!(parse_selector("#"), None);
    }

    #[test]
    fn skips_unready_and_plain_placeholders() {
        let mut page = MemoryPage::dashboard();
        page.add_placeholder("p1", "g1", true, "##A##");
        page.add_placeholder("p2", "g2", false, "##B##");
        page.add_placeholder("p3", "g3", true, "some host gadget");
        page.add_placeholder("p4", "g4", true, "##C##");

        let found = find_report_placeholders(&page);
        assert_eq!(
            found,
            vec![
                ReportPlaceholder { id: "p1".into(), selector: "A".into() },
                ReportPlaceholder { id: "p4".into(), selector: "C".into() },
            ]
        );
    }
}
