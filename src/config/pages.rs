//! Page selection for document stamping.
//!
//! Decides which pages of a document receive marks and how much of each
//! page edge stays free.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE_MARGIN;

fn default_margin() -> f64 {
    DEFAULT_PAGE_MARGIN
}

/// Which pages are stamped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageScope {
    #[default]
    All,
    FirstOnly,
    OddOnly,
}

/// Page selection (YAML format)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSelection {
    #[serde(default)]
    pub scope: PageScope,
    /// Margin in page units; marks are placed on the page shrunk by this
    /// amount on every side
    #[serde(default = "default_margin")]
    pub margin: f64,
}

impl Default for PageSelection {
    fn default() -> Self {
        Self {
            scope: PageScope::default(),
            margin: default_margin(),
        }
    }
}

impl PageSelection {
    /// Whether the 1-based `page_number` is stamped.
    pub fn includes(&self, page_number: u32) -> bool {
        match self.scope {
            PageScope::All => true,
            PageScope::FirstOnly => page_number == 1,
            PageScope::OddOnly => page_number % 2 == 1,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(format!(
                "Page margin must be a finite non-negative value, got {}",
                self.margin
            ));
        }
        Ok(())
    }
}
