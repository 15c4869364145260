//! Dispatch behaviour of the router through the handler interface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use pattern_router::environ::{PATH_INFO, QUERY_STRING, REQUEST_METHOD};
use pattern_router::{DataResponse, Environ, Handler, Router};

mod common;
use common::{call, get, get_with_query, Exchange};

fn text(body: &'static str) -> Arc<dyn Handler> {
    Arc::new(DataResponse::new(move |_| body.as_bytes().to_vec()))
}

#[test]
fn test_router() {
    let router = Router::new();
    router.set("/path/to/1", text("hello")).unwrap();

    let mut exchange = Exchange::default();
    call(&router, get("/"), &mut exchange);
    assert_eq!(exchange.statuses, vec!["404 Not found"]);
    assert_eq!(exchange.chunks.len(), 1);
    assert!(exchange.chunks[0].is_empty());

    call(&router, get("/path/to/1"), &mut exchange);
    assert_eq!(exchange.statuses.len(), 2);
    assert_eq!(exchange.statuses.last().unwrap(), "200 OK");
    assert_eq!(exchange.chunks.len(), 3);
    assert_eq!(exchange.chunks[1], b"hello".to_vec());
    assert!(exchange.chunks[2].is_empty());
}

#[test]
fn test_regular_expression_routing() {
    let router = Router::new();
    let received: Arc<Mutex<Option<Vec<String>>>> = Arc::default();
    let seen = received.clone();
    let email_route = concat!(
        r"/activate/email/([a-zA-Z0-9]+@[a-zA-Z0-9]+\.[a-zA-Z0-9]+)",
        r"/code/([a-zA-Z0-9]+)"
    );
    router
        .set(
            email_route,
            Arc::new(DataResponse::new(move |environ| {
                *seen.lock().unwrap() = environ.captures().map(<[String]>::to_vec);
                b"email".to_vec()
            })),
        )
        .unwrap();

    let mut exchange = Exchange::default();
    call(&router, get("/egg"), &mut exchange);
    assert_eq!(exchange.statuses, vec!["404 Not found"]);
    assert_eq!(exchange.chunks.len(), 1);
    assert!(received.lock().unwrap().is_none());

    call(
        &router,
        get("/activate/email/fang@envoy.com/code/ABCD1234"),
        &mut exchange,
    );
    assert_eq!(exchange.statuses.last().unwrap(), "200 OK");
    assert_eq!(exchange.chunks.len(), 3);
    assert_eq!(exchange.chunks[1], b"email".to_vec());
    assert!(exchange.chunks[2].is_empty());
    assert_eq!(
        received.lock().unwrap().clone().unwrap(),
        vec!["fang@envoy.com".to_string(), "ABCD1234".to_string()]
    );
}

#[test]
fn test_router_with_similar_endpoints() {
    let router = Router::new();
    router.set("foo/bar", text("hello")).unwrap();
    router
        .set(
            r"foo/bar/ambassador/1/0\?(?=.*param=\d+)(?=.+&)(?=.*anotherParam=\d+).*",
            Arc::new(DataResponse::new(|environ| {
                environ.query_string().unwrap_or("world").as_bytes().to_vec()
            })),
        )
        .unwrap();

    let mut exchange = Exchange::default();
    call(&router, get("foo/bar"), &mut exchange);
    assert_eq!(exchange.last_body().as_deref(), Some("hello"));

    call(
        &router,
        get_with_query("foo/bar/ambassador/1/0", "param=1&anotherParam=30"),
        &mut exchange,
    );
    assert_eq!(
        exchange.last_body().as_deref(),
        Some("param=1&anotherParam=30")
    );
}

#[test]
fn test_missing_path_never_consults_registry() {
    let router = Router::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    router
        .set(
            ".*",
            Arc::new(DataResponse::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Vec::new()
            })),
        )
        .unwrap();

    let mut exchange = Exchange::default();
    call(&router, Environ::new().with(REQUEST_METHOD, "GET"), &mut exchange);
    // A non-text PATH_INFO counts as missing too
    call(
        &router,
        Environ::new().with(PATH_INFO, vec!["/".to_string()]),
        &mut exchange,
    );

    assert_eq!(exchange.statuses, vec!["404 Not found", "404 Not found"]);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_pattern_without_groups_gets_empty_captures() {
    let router = Router::new();
    let received: Arc<Mutex<Option<Vec<String>>>> = Arc::default();
    let seen = received.clone();
    router
        .set(
            "/exact",
            Arc::new(DataResponse::new(move |environ| {
                *seen.lock().unwrap() = environ.captures().map(<[String]>::to_vec);
                Vec::new()
            })),
        )
        .unwrap();

    call(&router, get("/exact"), &mut Exchange::default());
    assert_eq!(received.lock().unwrap().clone(), Some(Vec::new()));
}

#[test]
fn test_query_is_part_of_search_string() {
    let router = Router::new();
    router.set("/search", text("plain")).unwrap();
    router.set(r"/search\?q=([a-z]+)", text("query")).unwrap();

    let mut exchange = Exchange::default();
    call(&router, get_with_query("/search", "q=rust"), &mut exchange);
    assert_eq!(exchange.last_body().as_deref(), Some("query"));

    // "/search" alone cannot match "/search?q=RUST" in full
    call(&router, get_with_query("/search", "q=RUST"), &mut exchange);
    assert_eq!(exchange.statuses.last().unwrap(), "404 Not found");
}

#[test]
fn test_not_found_receives_context_unchanged() {
    let router = Router::new();
    let received: Arc<Mutex<Option<Environ>>> = Arc::default();
    let seen = received.clone();
    router.set_not_found(Arc::new(DataResponse::new(move |environ| {
        *seen.lock().unwrap() = Some(environ.clone());
        Vec::new()
    })));

    let environ = get_with_query("/nowhere", "a=1");
    call(&router, environ.clone(), &mut Exchange::default());
    assert_eq!(received.lock().unwrap().clone(), Some(environ));
}

#[test]
fn test_other_context_keys_preserved() {
    let router = Router::new();
    let received: Arc<Mutex<Option<Environ>>> = Arc::default();
    let seen = received.clone();
    router
        .set(
            "/u/([0-9]+)",
            Arc::new(DataResponse::new(move |environ| {
                *seen.lock().unwrap() = Some(environ.clone());
                Vec::new()
            })),
        )
        .unwrap();

    call(
        &router,
        get("/u/42").with("HTTP_X_TRACE", "t-1").with(QUERY_STRING, "v=2"),
        &mut Exchange::default(),
    );
    // The query string makes the search "/u/42?v=2", which no pattern covers.
    assert!(received.lock().unwrap().is_none());

    call(&router, get("/u/42").with("HTTP_X_TRACE", "t-1"), &mut Exchange::default());
    let environ = received.lock().unwrap().clone().unwrap();
    assert_eq!(environ.get_str("HTTP_X_TRACE"), Some("t-1"));
    assert_eq!(environ.path_info(), Some("/u/42"));
    assert_eq!(environ.captures(), Some(&["42".to_string()][..]));
}

#[test]
fn test_reregistering_replaces_handler() {
    let router = Router::new();
    router.set("/greeting", text("first")).unwrap();
    router.set("/greeting", text("second")).unwrap();

    let mut exchange = Exchange::default();
    call(&router, get("/greeting"), &mut exchange);
    assert_eq!(exchange.statuses.len(), 1);
    assert_eq!(exchange.last_body().as_deref(), Some("second"));
    assert_eq!(router.len(), 1);
}

#[test]
fn test_overlapping_patterns_last_registered_wins() {
    let router = Router::new();
    router.set("/docs/(.*)", text("wildcard")).unwrap();
    router.set("/docs/index", text("index")).unwrap();

    let mut exchange = Exchange::default();
    call(&router, get("/docs/index"), &mut exchange);
    assert_eq!(exchange.last_body().as_deref(), Some("index"));
    call(&router, get("/docs/other"), &mut exchange);
    assert_eq!(exchange.last_body().as_deref(), Some("wildcard"));
}

#[test]
fn test_concurrent_registration_loses_nothing() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 50;

    let router = Arc::new(Router::new());
    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let router = router.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    router.set(format!("/t{t}/r{i}"), text("x")).unwrap();
                    // Readers interleave with writers
                    let mut exchange = Exchange::default();
                    call(&*router, get(&format!("/t{t}/r{i}")), &mut exchange);
                    assert_eq!(exchange.statuses, vec!["200 OK"]);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(router.len(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        for i in 0..PER_THREAD {
            assert!(router.get(&format!("/t{t}/r{i}")).is_some());
        }
    }
}

#[test]
fn test_handler_runs_outside_registry_lock() {
    let router = Arc::new(Router::new());
    let inner = router.clone();
    router
        .set(
            "/register",
            Arc::new(DataResponse::new(move |_| {
                // Would deadlock if dispatch still held the registry lock
                inner.set("/added", text("added")).unwrap();
                Vec::new()
            })),
        )
        .unwrap();

    call(&*router, get("/register"), &mut Exchange::default());
    assert!(router.contains("/added"));
}
