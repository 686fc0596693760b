// src/inspect/links.rs
// =============================================================================
// Turns raw href values into absolute, fetchable links and tags each one as
// internal or external.
//
// Skipped before resolving:
// - empty hrefs
// - javascript: and mailto: links
// - fragment-only links (#section), which point back at the same page
//
// Skipped after resolving:
// - anything that doesn't parse
// - anything that isn't http/https (tel:, ftp:, data:, ...)
//
// "Internal" means same host as the page, ignoring one leading "www.".
// =============================================================================

use crate::page::NormalizedUrl;

/// A fetchable link found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub target: NormalizedUrl,
    /// Decided once, when the link is classified
    pub is_internal: bool,
}

/// Internal/external totals over the classified links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

impl LinkCounts {
    pub fn of(links: &[Link]) -> Self {
        let internal = links.iter().filter(|l| l.is_internal).count();
        Self {
            internal,
            external: links.len() - internal,
        }
    }
}

/// Resolves and tags every href that points somewhere fetchable.
pub fn classify_links<S: AsRef<str>>(base: &NormalizedUrl, hrefs: &[S]) -> Vec<Link> {
    hrefs
        .iter()
        .filter_map(|href| resolve(base, href.as_ref()))
        .map(|target| Link {
            is_internal: base.same_host(&target),
            target,
        })
        .collect()
}

fn resolve(base: &NormalizedUrl, href: &str) -> Option<NormalizedUrl> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with('#')
    {
        return None;
    }
    base.join(href)
}
