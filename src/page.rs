//! Host page surface: the only side-effecting boundary of the pipeline.
//!
//! `HostPage` is what the orchestrator, locator and reconciler see. `MemoryPage` is a
//! serde-loadable model of a dashboard used by the binary and the tests.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::render::REPORT_TABLE_ID;

/// Read-only view of one embedded placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderView {
    pub id: String,
    /// Host finished loading it.
    pub ready: bool,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeom {
    pub top: f64,
    pub height: f64,
}

pub trait HostPage {
    /// Structural probe: is this the dashboard page that hosts gadgets at all?
    fn has_page_container(&self) -> bool;

    fn placeholders(&self) -> Vec<PlaceholderView>;

    fn write_content(&mut self, placeholder: &str, markup: &str) -> Result<()>;

    /// Height of the rendered report, if the placeholder holds exactly one report table.
    fn report_table_height(&self, placeholder: &str) -> Option<f64>;

    fn set_placeholder_height(&mut self, placeholder: &str, height: f64) -> Result<()>;

    /// Size the logical container the placeholder sits in.
    fn set_placeholder_container_height(&mut self, placeholder: &str, height: f64) -> Result<()>;

    /// Gadget-level containers in document order.
    fn gadget_containers(&self) -> Vec<String>;

    fn container_box(&self, container: &str) -> Option<BoxGeom>;

    /// Immediately preceding sibling, if it is itself a gadget container.
    fn previous_gadget_sibling(&self, container: &str) -> Option<String>;

    fn set_container_top(&mut self, container: &str, top: f64) -> Result<()>;
}

fn default_row_height() -> f64 {
    24.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPlaceholder {
    pub id: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub content: String,
    pub container: String,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryContainer {
    pub id: String,
    #[serde(default = "default_gadget")]
    pub gadget: bool,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub height: f64,
}

fn default_gadget() -> bool {
    true
}

/// In-memory dashboard. Containers are stored in document order; a container's
/// previous sibling is the entry before it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryPage {
    #[serde(default)]
    pub has_page_container: bool,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    #[serde(default)]
    pub placeholders: Vec<MemoryPlaceholder>,
    #[serde(default)]
    pub containers: Vec<MemoryContainer>,
}

impl MemoryPage {
    pub fn dashboard() -> Self {
        Self {
            has_page_container: true,
            row_height: default_row_height(),
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn add_container(&mut self, id: &str, gadget: bool, top: f64, height: f64) {
        self.containers.push(MemoryContainer {
            id: id.to_string(),
            gadget,
            top,
            height,
        });
    }

    pub fn add_placeholder(&mut self, id: &str, container: &str, ready: bool, content: &str) {
        self.placeholders.push(MemoryPlaceholder {
            id: id.to_string(),
            ready,
            content: content.to_string(),
            container: container.to_string(),
            height: 0.0,
        });
    }

    pub fn set_ready(&mut self, id: &str, ready: bool) {
        if let Some(p) = self.placeholders.iter_mut().find(|p| p.id == id) {
            p.ready = ready;
        }
    }

    pub fn placeholder(&self, id: &str) -> Option<&MemoryPlaceholder> {
        self.placeholders.iter().find(|p| p.id == id)
    }

    pub fn container(&self, id: &str) -> Option<&MemoryContainer> {
        self.containers.iter().find(|c| c.id == id)
    }

    fn placeholder_mut(&mut self, id: &str) -> Result<&mut MemoryPlaceholder> {
        self.placeholders
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ReportError::Page(format!("no placeholder {}", id)))
    }

    fn container_mut(&mut self, id: &str) -> Result<&mut MemoryContainer> {
        self.containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ReportError::Page(format!("no container {}", id)))
    }
}

impl HostPage for MemoryPage {
    fn has_page_container(&self) -> bool {
        self.has_page_container
    }

    fn placeholders(&self) -> Vec<PlaceholderView> {
        self.placeholders
            .iter()
            .map(|p| PlaceholderView {
                id: p.id.clone(),
                ready: p.ready,
                text: p.content.clone(),
            })
            .collect()
    }

    fn write_content(&mut self, placeholder: &str, markup: &str) -> Result<()> {
        self.placeholder_mut(placeholder)?.content = markup.to_string();
        Ok(())
    }

    fn report_table_height(&self, placeholder: &str) -> Option<f64> {
        let p = self.placeholder(placeholder)?;
        let marker = format!("id=\"{}\"", REPORT_TABLE_ID);
        if p.content.matches(marker.as_str()).count() != 1 {
            return None;
        }
        let rows = p.content.matches("<tr").count();
        Some(rows as f64 * self.row_height)
    }

    fn set_placeholder_height(&mut self, placeholder: &str, height: f64) -> Result<()> {
        self.placeholder_mut(placeholder)?.height = height;
        Ok(())
    }

    fn set_placeholder_container_height(&mut self, placeholder: &str, height: f64) -> Result<()> {
        let container = self.placeholder_mut(placeholder)?.container.clone();
        self.container_mut(&container)?.height = height;
        Ok(())
    }

    fn gadget_containers(&self) -> Vec<String> {
        self.containers
            .iter()
            .filter(|c| c.gadget)
            .map(|c| c.id.clone())
            .collect()
    }

    fn container_box(&self, container: &str) -> Option<BoxGeom> {
        self.container(container).map(|c| BoxGeom {
            top: c.top,
            height: c.height,
        })
    }

    fn previous_gadget_sibling(&self, container: &str) -> Option<String> {
        let idx = self.containers.iter().position(|c| c.id == container)?;
        let prev = self.containers.get(idx.checked_sub(1)?)?;
        prev.gadget.then(|| prev.id.clone())
    }

    fn set_container_top(&mut self, container: &str, top: f64) -> Result<()> {
        self.container_mut(container)?.top = top;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_only_single_report_table() {
        let mut page = MemoryPage::dashboard();
        page.add_container("g1", true, 0.0, 100.0);
        page.add_placeholder("p1", "g1", true, "##X##");
        assert_eq!(page.report_table_height("p1"), None);

        page.write_content("p1", "<table id=\"sprintOverview\"><tr></tr><tr></tr></table>")
            .unwrap();
        assert_eq!(page.report_table_height("p1"), Some(48.0));

        page.write_content(
            "p1",
            "<table id=\"sprintOverview\"></table><table id=\"sprintOverview\"></table>",
        )
        .unwrap();
        assert_eq!(page.report_table_height("p1"), None);
    }

    #[test]
    fn previous_sibling_must_be_gadget() {
        let mut page = MemoryPage::dashboard();
        page.add_container("g1", true, 0.0, 10.0);
        page.add_container("spacer", false, 10.0, 5.0);
        page.add_container("g2", true, 15.0, 10.0);
        page.add_container("g3", true, 25.0, 10.0);
        assert_eq!(page.previous_gadget_sibling("g1"), None);
        assert_eq!(page.previous_gadget_sibling("g2"), None);
        assert_eq!(page.previous_gadget_sibling("g3").as_deref(), Some("g2"));
        assert_eq!(page.gadget_containers(), vec!["g1", "g2", "g3"]);
    }

    #[test]
    fn unknown_ids_are_page_errors() {
        let mut page = MemoryPage::dashboard();
        assert!(matches!(page.write_content("nope", "x"), Err(ReportError::Page(_))));
        assert!(page.set_container_top("nope", 1.0).is_err());
    }

    #[test]
    fn snapshot_json_defaults() {
        let page = MemoryPage::from_json(
            r###"{
                "has_page_container": true,
                "placeholders": [{ "id": "p1", "container": "g1", "ready": true, "content": "##A##" }],
                "containers": [{ "id": "g1", "top": 0, "height": 120 }]
            }"###,
        )
        .unwrap();
        assert_eq!(page.row_height, 24.0);
        assert!(page.containers[0].gadget);
        let again = MemoryPage::from_json(&page.to_json().unwrap()).unwrap();
        assert_eq!(again, page);
    }
}
