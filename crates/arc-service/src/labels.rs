//! Labels: a global vocabulary (§4.2) plus per-issue association, scoped
//! through the owning issue's workspace.

use arc_core::comment::{Label, LabelUpdates};
use arc_core::error::{ArcError, Result};

use crate::Service;

impl Service {
    pub fn create_label(&self, label: Label) -> Result<Label> {
        if label.name.trim().is_empty() {
            return Err(ArcError::bad_request("label name must not be empty"));
        }
        self.store.create_label(&label)?;
        Ok(label)
    }

    pub fn get_label(&self, name: &str) -> Result<Label> {
        Ok(self.store.get_label(name)?)
    }

    pub fn list_labels(&self) -> Result<Vec<Label>> {
        Ok(self.store.list_labels()?)
    }

    pub fn update_label(&self, name: &str, updates: LabelUpdates) -> Result<Label> {
        if updates.is_empty() {
            return Err(ArcError::bad_request("no fields present in update"));
        }
        self.store.update_label(name, &updates)?;
        self.get_label(name)
    }

    pub fn delete_label(&self, name: &str) -> Result<()> {
        Ok(self.store.delete_label(name)?)
    }

    pub fn add_label_to_issue(&self, workspace_id: &str, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        self.get_issue(workspace_id, issue_id)?;
        // The label must exist in the global vocabulary before it can be
        // attached; the FK in storage would reject it anyway, but checking
        // here gives a clean NotFound instead of an opaque storage error.
        self.get_label(label)?;
        Ok(self.store.add_label(issue_id, label, actor)?)
    }

    pub fn remove_label_from_issue(&self, workspace_id: &str, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.remove_label(issue_id, label, actor)?)
    }

    pub fn get_issue_labels(&self, workspace_id: &str, issue_id: &str) -> Result<Vec<String>> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.get_labels(issue_id)?)
    }
}
