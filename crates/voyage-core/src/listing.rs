//! Listing helpers used by public pages and admin tables

use std::str::FromStr;

use crate::{Error, Package, PackageStatus};

/// Published packages in their current order, optionally capped
pub fn published(packages: &[Package], limit: Option<usize>) -> Vec<Package> {
    packages
        .iter()
        .filter(|p| p.is_published())
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTab {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusTab {
    fn admits(self, status: PackageStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Published => status == PackageStatus::Published,
            StatusTab::Draft => status == PackageStatus::Draft,
        }
    }
}

impl FromStr for StatusTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusTab::All),
            "published" => Ok(StatusTab::Published),
            "draft" => Ok(StatusTab::Draft),
            other => Err(Error::InvalidPackage(format!("unknown status tab: {other}"))),
        }
    }
}

/// Admin table filter: search on title or slug, plus a status tab
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    pub search: String,
    pub tab: StatusTab,
}

impl PackageFilter {
    pub fn matches(&self, package: &Package) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || package.title.to_lowercase().contains(&needle)
            || package.slug.to_lowercase().contains(&needle);
        matches_search && self.tab.admits(package.status)
    }

    pub fn apply<'a>(&self, packages: &'a [Package]) -> Vec<&'a Package> {
        packages.iter().filter(|p| self.matches(p)).collect()
    }
}

/// "12.3 MB"
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
