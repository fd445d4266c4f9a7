//! Resource operation tables
//!
//! Each function returns the declarative table for one resource kind. Tables
//! hold no logic; [`Endpoint`] executes them through the shared
//! [`RequestBuilder`].

use crate::endpoint::{Endpoint, EndpointDefinition};
use crate::mime::{self, ResourceKind};
use crate::request::{Operation, RequestBuilder};
use std::sync::Arc;

/// Query parameter used to scope list calls to a group
pub const GROUP_SCOPE_PARAM: &str = "group_id";

/// Documents: create, createFromFile, retrieve, update, list, trash, delete
pub fn documents() -> EndpointDefinition {
    EndpointDefinition::new(ResourceKind::Document)
        .with(
            Operation::post("create", "/documents")
                .with_data(mime::DOCUMENT)
                .accept(mime::DOCUMENT)
                .follow_location(),
        )
        .with(
            Operation::post("createFromFile", "/documents")
                .accept(mime::DOCUMENT)
                .with_file(None),
        )
        .with(
            Operation::get("retrieve", "/documents/{id}")
                .args(&["id"])
                .accept(mime::DOCUMENT),
        )
        .with(
            Operation::patch("update", "/documents/{id}")
                .args(&["id"])
                .with_data(mime::DOCUMENT)
                .accept(mime::DOCUMENT)
                .follow_location(),
        )
        .with(
            Operation::get("list", "/documents")
                .accept(mime::DOCUMENT)
                .paginated(),
        )
        .with(Operation::post("trash", "/documents/{id}/trash").args(&["id"]))
        .with(Operation::delete("delete", "/documents/{id}").args(&["id"]))
        .scoped_by(GROUP_SCOPE_PARAM)
}

/// Files: create (linked to a document), list for a document, remove
pub fn files() -> EndpointDefinition {
    EndpointDefinition::new(ResourceKind::File)
        .with(
            Operation::post("create", "/files")
                .accept(mime::FILE)
                .with_file(Some("document")),
        )
        .with(
            Operation::get("list", "/files?document_id={id}")
                .args(&["id"])
                .accept(mime::FILE)
                .paginated(),
        )
        .with(Operation::delete("remove", "/files/{id}").args(&["id"]))
}

/// Folders, including document membership
pub fn folders() -> EndpointDefinition {
    EndpointDefinition::new(ResourceKind::Folder)
        .with(
            Operation::post("create", "/folders")
                .with_data(mime::FOLDER)
                .accept(mime::FOLDER)
                .follow_location(),
        )
        .with(
            Operation::get("retrieve", "/folders/{id}")
                .args(&["id"])
                .accept(mime::FOLDER),
        )
        .with(
            Operation::patch("update", "/folders/{id}")
                .args(&["id"])
                .with_data(mime::FOLDER)
                .accept(mime::FOLDER)
                .follow_location(),
        )
        .with(Operation::delete("delete", "/folders/{id}").args(&["id"]))
        .with(
            Operation::delete("removeDocument", "/folders/{id}/documents/{docId}")
                .args(&["id", "docId"]),
        )
        .with(
            Operation::post("addDocument", "/folders/{id}/documents")
                .args(&["id"])
                .with_data(mime::DOCUMENT),
        )
        .with(
            Operation::get("list", "/folders")
                .accept(mime::FOLDER)
                .paginated(),
        )
        .scoped_by(GROUP_SCOPE_PARAM)
}

/// Groups: retrieve, list
pub fn groups() -> EndpointDefinition {
    EndpointDefinition::new(ResourceKind::Group)
        .with(
            Operation::get("retrieve", "/groups/{id}")
                .args(&["id"])
                .accept(mime::GROUP),
        )
        .with(
            Operation::get("list", "/groups")
                .accept(mime::GROUP)
                .paginated(),
        )
}

/// Annotations
pub fn annotations() -> EndpointDefinition {
    EndpointDefinition::new(ResourceKind::Annotation)
        .with(
            Operation::get("retrieve", "/annotations/{id}")
                .args(&["id"])
                .accept(mime::ANNOTATION),
        )
        .with(
            Operation::patch("patch", "/annotations/{id}")
                .args(&["id"])
                .with_data(mime::ANNOTATION)
                .accept(mime::ANNOTATION)
                .follow_location(),
        )
        .with(
            Operation::post("create", "/annotations")
                .with_data(mime::ANNOTATION)
                .accept(mime::ANNOTATION)
                .follow_location(),
        )
        .with(Operation::delete("delete", "/annotations/{id}").args(&["id"]))
        .with(
            Operation::get("list", "/annotations")
                .accept(mime::ANNOTATION)
                .paginated(),
        )
        .scoped_by(GROUP_SCOPE_PARAM)
}

/// Trashed documents: retrieve, list, restore, destroy
pub fn trash() -> EndpointDefinition {
    EndpointDefinition::new(ResourceKind::Trash)
        .with(
            Operation::get("retrieve", "/trash/{id}")
                .args(&["id"])
                .accept(mime::DOCUMENT),
        )
        .with(
            Operation::get("list", "/trash")
                .accept(mime::DOCUMENT)
                .paginated(),
        )
        .with(Operation::post("restore", "/trash/{id}/restore").args(&["id"]))
        .with(Operation::delete("destroy", "/trash/{id}").args(&["id"]))
        .scoped_by(GROUP_SCOPE_PARAM)
}

/// Definition for a resource kind
pub fn definition(kind: ResourceKind) -> EndpointDefinition {
    match kind {
        ResourceKind::Document => documents(),
        ResourceKind::File => files(),
        ResourceKind::Folder => folders(),
        ResourceKind::Group => groups(),
        ResourceKind::Annotation => annotations(),
        ResourceKind::Trash => trash(),
    }
}

/// One base endpoint per resource kind, all sharing one request engine
#[derive(Debug, Clone)]
pub struct Api {
    documents: Arc<Endpoint>,
    files: Arc<Endpoint>,
    folders: Arc<Endpoint>,
    groups: Arc<Endpoint>,
    annotations: Arc<Endpoint>,
    trash: Arc<Endpoint>,
}

impl Api {
    /// Build every endpoint against `requests`
    pub fn new(requests: Arc<RequestBuilder>) -> Self {
        let build = |definition: EndpointDefinition| {
            Arc::new(Endpoint::new(Arc::new(definition), requests.clone()))
        };
        Self {
            documents: build(documents()),
            files: build(files()),
            folders: build(folders()),
            groups: build(groups()),
            annotations: build(annotations()),
            trash: build(trash()),
        }
    }

    /// Documents in the user library
    pub fn documents(&self) -> &Arc<Endpoint> {
        &self.documents
    }

    /// Files attached to documents
    pub fn files(&self) -> &Arc<Endpoint> {
        &self.files
    }

    /// Folders and their document membership
    pub fn folders(&self) -> &Arc<Endpoint> {
        &self.folders
    }

    /// Groups the user belongs to
    pub fn groups(&self) -> &Arc<Endpoint> {
        &self.groups
    }

    /// Annotations on documents
    pub fn annotations(&self) -> &Arc<Endpoint> {
        &self.annotations
    }

    /// Trashed documents
    pub fn trash(&self) -> &Arc<Endpoint> {
        &self.trash
    }

    /// Endpoint for a resource kind
    pub fn endpoint(&self, kind: ResourceKind) -> &Arc<Endpoint> {
        match kind {
            ResourceKind::Document => &self.documents,
            ResourceKind::File => &self.files,
            ResourceKind::Folder => &self.folders,
            ResourceKind::Group => &self.groups,
            ResourceKind::Annotation => &self.annotations,
            ResourceKind::Trash => &self.trash,
        }
    }
}
