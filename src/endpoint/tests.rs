//! Tests for the endpoint module

use super::*;
use crate::auth::StaticToken;
use crate::error::Error;
use crate::mime::{self, ResourceKind};
use crate::pagination::{PaginationLinks, Rel};
use crate::request::tests::{builder_with, MockTransport};
use crate::request::Operation;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn folders_definition() -> EndpointDefinition {
    EndpointDefinition::new(ResourceKind::Folder)
        .with(
            Operation::get("retrieve", "/folders/{id}")
                .args(&["id"])
                .accept(mime::FOLDER),
        )
        .with(
            Operation::post("create", "/folders")
                .with_data(mime::FOLDER)
                .accept(mime::FOLDER),
        )
        .with(
            Operation::get("list", "/folders")
                .accept(mime::FOLDER)
                .paginated(),
        )
        .scoped_by("group_id")
}

fn endpoint(transport: Arc<MockTransport>) -> Endpoint {
    let requests = builder_with(Arc::new(StaticToken::new("tok")), transport);
    Endpoint::new(Arc::new(folders_definition()), Arc::new(requests))
}

const PAGE_ONE_LINKS: &str = "<https://api.example.com/folders?page=2>; rel=\"next\", \
                              <https://api.example.com/folders?page=5>; rel=\"last\"";

// ============================================================================
// Definitions
// ============================================================================

#[test]
fn test_definition_lookup() {
    let definition = folders_definition();

    assert_eq!(definition.operation_names(), vec!["retrieve", "create", "list"]);
    assert!(definition.has_operation("list"));
    assert_eq!(definition.operation("retrieve").unwrap().args, vec!["id"]);
    assert_eq!(definition.page_accept(), mime::FOLDER);

    let err = definition.operation("explode").unwrap_err();
    match err {
        Error::UnknownOperation { resource, operation } => {
            assert_eq!(resource, "folders");
            assert_eq!(operation, "explode");
        }
        other => panic!("Expected UnknownOperation, got {other:?}"),
    }
}

// ============================================================================
// Clone Registry
// ============================================================================

#[test]
fn test_for_scope_is_memoized() {
    let base = endpoint(MockTransport::new());

    let first = base.for_scope("group-a");
    let second = base.for_scope("group-a");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(base.clone_count(), 1);
    assert_eq!(first.scope(), Some("group-a"));
    assert_eq!(base.scope(), None);
}

#[test]
fn test_distinct_keys_yield_distinct_clones() {
    let base = endpoint(MockTransport::new());

    let a = base.for_scope("a");
    let b = base.for_scope("b");

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(base.clone_count(), 2);
}

#[test]
fn test_clone_shares_definition_and_interface() {
    let base = endpoint(MockTransport::new());
    let clone = base.for_scope("a");

    assert!(Arc::ptr_eq(base.definition(), clone.definition()));
    assert_eq!(base.operations(), clone.operations());
    assert_eq!(base.kind(), clone.kind());
}

#[test]
fn test_cloning_a_clone_resolves_against_base() {
    let base = endpoint(MockTransport::new());
    let a = base.for_scope("a");

    let b_from_clone = a.for_scope("b");
    let b_from_base = base.for_scope("b");
    assert!(Arc::ptr_eq(&b_from_clone, &b_from_base));
    assert_eq!(b_from_clone.scope(), Some("b"));

    let a_again = a.for_scope("a");
    assert!(Arc::ptr_eq(&a, &a_again));
    assert_eq!(base.clone_count(), 2);
}

#[test]
fn test_clone_outliving_base_is_detached() {
    let base = endpoint(MockTransport::new());
    let a = base.for_scope("a");
    drop(base);

    let b = a.for_scope("b");
    assert_eq!(b.scope(), Some("b"));
    assert_eq!(a.clone_count(), 0);
}

#[test]
fn test_concurrent_for_scope_registers_once() {
    let base = Arc::new(endpoint(MockTransport::new()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let base = base.clone();
            std::thread::spawn(move || base.for_scope("shared"))
        })
        .collect();
    let clones: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(base.clone_count(), 1);
    assert!(clones.iter().all(|c| Arc::ptr_eq(c, &clones[0])));
}

// ============================================================================
// Pagination State
// ============================================================================

#[tokio::test]
async fn test_list_refreshes_state() {
    let transport = MockTransport::new();
    transport.respond(
        200,
        &[("link", PAGE_ONE_LINKS), ("mendeley-count", "42")],
        "[]",
    );
    let folders = endpoint(transport.clone());

    folders.list(&[]).await.unwrap();

    assert_eq!(folders.count(), 42);
    assert_eq!(
        folders.pagination_links(),
        PaginationLinks {
            next: Some("https://api.example.com/folders?page=2".to_string()),
            previous: None,
            last: Some("https://api.example.com/folders?page=5".to_string()),
        }
    );
}

#[tokio::test]
async fn test_non_paginated_call_leaves_state() {
    let transport = MockTransport::new();
    transport.respond(200, &[("link", PAGE_ONE_LINKS), ("mendeley-count", "7")], "{}");
    let folders = endpoint(transport.clone());

    folders.call("retrieve", &["f1"]).await.unwrap();

    assert_eq!(folders.count(), 0);
    assert!(folders.pagination_links().is_empty());
}

#[tokio::test]
async fn test_next_page_follows_and_refreshes() {
    let transport = MockTransport::new();
    transport.respond(200, &[("link", PAGE_ONE_LINKS), ("mendeley-count", "42")], "[]");
    transport.respond(
        200,
        &[(
            "link",
            "<https://api.example.com/folders?page=1>; rel=\"previous\", \
             <https://api.example.com/folders?page=5>; rel=\"last\"",
        )],
        "[]",
    );
    let folders = endpoint(transport.clone());

    folders.list(&[]).await.unwrap();
    folders.next_page().await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].url, "https://api.example.com/folders?page=2");
    assert_eq!(sent[1].header("Accept"), Some(mime::FOLDER));

    let links = folders.pagination_links();
    assert_eq!(links.next, None);
    assert_eq!(
        links.previous.as_deref(),
        Some("https://api.example.com/folders?page=1")
    );
    assert_eq!(folders.count(), 42);
}

#[tokio::test]
async fn test_missing_relation_fails_without_io() {
    let transport = MockTransport::new();
    let folders = endpoint(transport.clone());

    for rel in Rel::ALL {
        let err = folders.page(rel).await.unwrap_err();
        assert!(err.is_no_such_page());
    }
    let err = folders.next_page().await.unwrap_err();
    assert!(matches!(err, Error::NoSuchPage { ref rel } if rel == "next"));

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_failed_page_keeps_state() {
    let transport = MockTransport::new();
    transport.respond(200, &[("link", PAGE_ONE_LINKS), ("mendeley-count", "42")], "[]");
    transport.respond(500, &[], "boom");
    let folders = endpoint(transport.clone());

    folders.list(&[]).await.unwrap();
    let before = folders.pagination_state();

    let err = folders.next_page().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(folders.pagination_state(), before);
}

#[tokio::test]
async fn test_reset_pagination_keeps_count() {
    let transport = MockTransport::new();
    transport.respond(200, &[("link", PAGE_ONE_LINKS), ("mendeley-count", "42")], "[]");
    let folders = endpoint(transport.clone());

    folders.list(&[]).await.unwrap();
    folders.reset_pagination();

    assert_eq!(folders.pagination_links(), PaginationLinks::default());
    assert_eq!(folders.count(), 42);

    folders.reset_pagination();
    assert!(folders.pagination_links().is_empty());
}

#[tokio::test]
async fn test_clones_keep_independent_state() {
    let transport = MockTransport::new();
    transport.respond(200, &[("link", PAGE_ONE_LINKS), ("mendeley-count", "3")], "[]");
    let base = endpoint(transport.clone());
    let scoped = base.for_scope("group-1");
    let other = base.for_scope("group-2");

    scoped.list(&[]).await.unwrap();

    assert_eq!(scoped.count(), 3);
    assert!(scoped.pagination_links().next.is_some());
    assert_eq!(base.count(), 0);
    assert!(base.pagination_links().is_empty());
    assert_eq!(other.count(), 0);
    assert!(other.pagination_links().is_empty());
}

// ============================================================================
// Scoped Requests
// ============================================================================

#[tokio::test]
async fn test_scoped_list_sends_scope_param() {
    let transport = MockTransport::new();
    transport.respond(200, &[], "[]");
    transport.respond(200, &[], "{}");
    let base = endpoint(transport.clone());
    let scoped = base.for_scope("g1");

    scoped.list(&[]).await.unwrap();
    scoped.call("retrieve", &["f1"]).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].url, "https://api.example.com/folders?group_id=g1");
    assert_eq!(sent[1].url, "https://api.example.com/folders/f1");
}

#[tokio::test]
async fn test_base_list_has_no_scope_param() {
    let transport = MockTransport::new();
    transport.respond(200, &[], "[]");

    endpoint(transport.clone()).list(&[]).await.unwrap();

    assert_eq!(transport.sent()[0].url, "https://api.example.com/folders");
}

#[tokio::test]
async fn test_call_with_data_through_endpoint() {
    let transport = MockTransport::new();
    transport.respond(201, &[], r#"{"id": "f9"}"#);
    let folders = endpoint(transport.clone());

    let response = folders
        .call_with_data("create", &json!({"name": "New"}), &[])
        .await
        .unwrap();

    assert_eq!(response.body["id"], "f9");
    assert_eq!(transport.sent()[0].header("Content-Type"), Some(mime::FOLDER));
}

#[tokio::test]
async fn test_unknown_operation_fails_without_io() {
    let transport = MockTransport::new();
    let folders = endpoint(transport.clone());

    let err = folders.call("explode", &[]).await.unwrap_err();
    assert!(matches!(err, Error::UnknownOperation { .. }));
    assert!(transport.sent().is_empty());
}
