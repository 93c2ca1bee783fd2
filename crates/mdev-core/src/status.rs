//! Status reporting and reference promotion

use mdev_fs::NormalizedPath;
use mdev_git::VersionControl;
use serde::Serialize;
use tracing::{debug, info};

use crate::reference::ComponentReference;
use crate::scanner::ReferenceScanner;
use crate::Result;

/// Length of the abbreviated revision shown as a label.
const LABEL_LEN: usize = 6;

/// A reference file rewritten by [`StatusReporter::sync`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncChange {
    pub reference_file: NormalizedPath,
    /// Revision declared before the rewrite (empty if none).
    pub from: String,
    /// Commit id now declared.
    pub to: String,
}

/// A component and the label of its declared revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    pub name: String,
    /// Checkout directory relative to the scan root.
    pub path: String,
    pub url: String,
    /// Short form of the declared revision, or the remote's default branch
    /// when none is declared.
    pub label: String,
}

/// Drift between a checkout and its reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentStatus {
    #[serde(flatten)]
    pub summary: ComponentSummary,
    /// Commit id the checkout is at.
    pub current: String,
    /// The checkout is not at the declared revision.
    pub unsync: bool,
    /// Tracked files have uncommitted changes.
    pub dirty: bool,
}

impl ComponentStatus {
    pub fn is_clean(&self) -> bool {
        !self.unsync && !self.dirty
    }

    /// Human-readable drift markers, e.g. `(unsync,dirty)`; empty when clean.
    pub fn markers(&self) -> String {
        let markers: Vec<&str> = [(self.unsync, "unsync"), (self.dirty, "dirty")]
            .into_iter()
            .filter_map(|(set, marker)| set.then_some(marker))
            .collect();
        if markers.is_empty() {
            String::new()
        } else {
            format!("({})", markers.join(","))
        }
    }
}

/// Reads checkout state and writes it back into reference files.
pub struct StatusReporter<'a, V: VersionControl> {
    scanner: &'a ReferenceScanner,
    vcs: &'a V,
}

impl<'a, V: VersionControl> StatusReporter<'a, V> {
    pub fn new(scanner: &'a ReferenceScanner, vcs: &'a V) -> Self {
        Self { scanner, vcs }
    }

    /// Pin every resolved reference file to the commit its checkout is at.
    ///
    /// Files already declaring that exact commit id are left untouched.
    /// Rewrites are atomic, so an interrupted run never leaves a truncated
    /// reference file.
    pub fn sync(&self) -> Result<Vec<SyncChange>> {
        let mut changes = Vec::new();
        for component in self.scanner.resolved() {
            let component = component?;
            let handle = self.vcs.open(component.source_path())?;
            let reference = component.git_reference()?;
            let current = self.vcs.current_revision(&handle)?;

            if reference.reference() == Some(current.as_str()) {
                debug!(reference = %component.reference_file(), "Already pinned");
                continue;
            }

            let from = reference.reference().unwrap_or_default().to_string();
            component.write_git_reference(&reference.pinned_to(&current))?;
            info!(
                reference = %component.reference_file(),
                from = %from,
                to = %current,
                "Pinned reference to checkout"
            );
            changes.push(SyncChange {
                reference_file: component.reference_file().clone(),
                from,
                to: current,
            });
        }
        Ok(changes)
    }

    /// Summaries of all resolved components, sorted by reference file.
    pub fn summaries(&self) -> Result<Vec<ComponentSummary>> {
        self.sorted_resolved()?
            .iter()
            .map(|component| {
                let handle = self.vcs.open(component.source_path())?;
                self.summary(component, &handle)
            })
            .collect()
    }

    /// Status of all resolved components, sorted by reference file.
    ///
    /// A component without a declared revision always reports `unsync`:
    /// there is no commit id to match.
    pub fn status(&self) -> Result<Vec<ComponentStatus>> {
        self.sorted_resolved()?
            .iter()
            .map(|component| {
                let handle = self.vcs.open(component.source_path())?;
                let summary = self.summary(component, &handle)?;
                let declared = component.git_reference()?;
                let current = self.vcs.current_revision(&handle)?;
                Ok(ComponentStatus {
                    summary,
                    unsync: declared.reference() != Some(current.as_str()),
                    dirty: self.vcs.is_dirty(&handle)?,
                    current,
                })
            })
            .collect()
    }

    fn sorted_resolved(&self) -> Result<Vec<ComponentReference>> {
        let mut components: Vec<ComponentReference> =
            self.scanner.resolved().collect::<Result<_>>()?;
        components.sort();
        Ok(components)
    }

    fn summary(&self, component: &ComponentReference, handle: &V::Handle) -> Result<ComponentSummary> {
        let reference = component.git_reference()?;
        let label = match reference.reference() {
            Some(revision) => revision.chars().take(LABEL_LEN).collect(),
            None => self.vcs.default_branch(handle)?,
        };
        let path = component
            .source_path()
            .relative_to(self.scanner.root())
            .map(|p| p.to_string())
            .unwrap_or_else(|| component.source_path().to_string());

        Ok(ComponentSummary {
            name: component.name().to_string(),
            path,
            url: reference.repo_url().to_string(),
            label,
        })
    }
}
