//! Saved code projects: plain CRUD, no versioning, no undo.

use chrono::Utc;
use santri_types::{CodeProject, ProjectId};

use crate::events::StateEvent;
use crate::kv::KeyValueStore;

use super::AppState;

impl<S: KeyValueStore> AppState<S> {
    #[must_use]
    pub fn code_projects(&self) -> &[CodeProject] {
        &self.projects
    }

    /// The project currently open for editing, if any.
    #[must_use]
    pub fn active_editing_project(&self) -> Option<&ProjectId> {
        self.active_editing_project.as_ref()
    }

    pub fn add_code_project(
        &mut self,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> ProjectId {
        let project = CodeProject::new(name, code, Utc::now());
        let id = project.id.clone();
        self.projects.push(project);
        self.persist_projects();
        self.emit(StateEvent::ProjectsChanged);
        id
    }

    /// Merge name/code updates and refresh `updatedAt`. No-op when the id is
    /// absent.
    pub fn update_code_project(
        &mut self,
        id: &ProjectId,
        name: Option<String>,
        code: Option<String>,
    ) {
        let Some(project) = self.projects.iter_mut().find(|project| &project.id == id) else {
            return;
        };
        if let Some(name) = name {
            project.name = name;
        }
        if let Some(code) = code {
            project.code = code;
        }
        project.updated_at = Utc::now();

        self.persist_projects();
        self.emit(StateEvent::ProjectsChanged);
    }

    /// Remove a project; clears the active-editing reference when it pointed
    /// at the removed project. No-op when the id is absent.
    pub fn delete_code_project(&mut self, id: &ProjectId) {
        let Some(position) = self.projects.iter().position(|project| &project.id == id) else {
            return;
        };
        self.projects.remove(position);
        if self.active_editing_project.as_ref() == Some(id) {
            self.active_editing_project = None;
        }

        self.persist_projects();
        self.emit(StateEvent::ProjectsChanged);
    }

    /// Mark a project as open for editing (or none).
    pub fn open_project_for_editing(&mut self, id: Option<ProjectId>) {
        self.active_editing_project = id;
    }
}
