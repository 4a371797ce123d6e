//! Friend requests and relationships.

use std::thread;

use mappin::Error;

use crate::test_utils::*;

#[test]
fn test_request_then_accept() {
    let app = app();
    let (u1, p1) = register(&app, "u1");
    let (u2, p2) = register(&app, "u2");

    app.send_request(&p1.access_token, &u2).unwrap();
    assert_eq!(app.pending_requests(&p2.access_token).unwrap(), vec![u1.clone()]);

    app.accept_request(&p2.access_token, &u1).unwrap();
    assert!(app.pending_requests(&p2.access_token).unwrap().is_empty());
    assert_eq!(app.friends(&p1.access_token).unwrap(), vec![u2.clone()]);
    assert_eq!(app.friends(&p2.access_token).unwrap(), vec![u1]);
}

#[test]
fn test_duplicate_request_is_deduplicated() {
    let app = app();
    let (u1, p1) = register(&app, "u1");
    let (u2, p2) = register(&app, "u2");

    app.send_request(&p1.access_token, &u2).unwrap();
    app.send_request(&p1.access_token, &u2).unwrap();
    assert_eq!(app.pending_requests(&p2.access_token).unwrap(), vec![u1]);
}

#[test]
fn test_crossed_requests_connect() {
    let app = app();
    let (u1, p1) = register(&app, "u1");
    let (u2, p2) = register(&app, "u2");

    app.send_request(&p1.access_token, &u2).unwrap();
    app.send_request(&p2.access_token, &u1).unwrap();

    assert_eq!(app.friends(&p1.access_token).unwrap(), vec![u2]);
    assert_eq!(app.friends(&p2.access_token).unwrap(), vec![u1]);
    assert!(app.pending_requests(&p1.access_token).unwrap().is_empty());
    assert!(app.pending_requests(&p2.access_token).unwrap().is_empty());
}

#[test]
fn test_concurrent_crossed_requests_connect_once() {
    for _ in 0..20 {
        let app = app();
        let (u1, p1) = register(&app, "u1");
        let (u2, p2) = register(&app, "u2");

        let a = {
            let app = app.clone();
            let (token, to) = (p1.access_token.clone(), u2.clone());
            thread::spawn(move || app.send_request(&token, &to))
        };
        let b = {
            let app = app.clone();
            let (token, to) = (p2.access_token.clone(), u1.clone());
            thread::spawn(move || app.send_request(&token, &to))
        };
        a.join().unwrap().unwrap();
        b.join().unwrap().unwrap();

        assert_eq!(app.friends(&p1.access_token).unwrap(), vec![u2]);
        assert!(app.pending_requests(&p1.access_token).unwrap().is_empty());
        assert!(app.pending_requests(&p2.access_token).unwrap().is_empty());
    }
}

#[test]
fn test_answering_missing_request_is_not_found() {
    let app = app();
    let (u1, p1) = register(&app, "u1");
    let (_, p2) = register(&app, "u2");

    let accept = app.accept_request(&p2.access_token, &u1).unwrap_err();
    let refuse = app.refuse_request(&p2.access_token, &u1).unwrap_err();
    assert!(matches!(accept, Error::NotFound { .. }));
    assert!(matches!(refuse, Error::NotFound { .. }));

    assert!(app.friends(&p1.access_token).unwrap().is_empty());
    assert!(app.friends(&p2.access_token).unwrap().is_empty());
}

#[test]
fn test_refuse_consumes_request() {
    let app = app();
    let (u1, p1) = register(&app, "u1");
    let (u2, p2) = register(&app, "u2");

    app.send_request(&p1.access_token, &u2).unwrap();
    app.refuse_request(&p2.access_token, &u1).unwrap();

    assert!(app.pending_requests(&p2.access_token).unwrap().is_empty());
    assert!(app.friends(&p2.access_token).unwrap().is_empty());
    assert!(matches!(
        app.accept_request(&p2.access_token, &u1).unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[test]
fn test_remove_friend() {
    let app = app();
    let (u1, p1) = register(&app, "u1");
    let (u2, p2) = register(&app, "u2");
    app.send_request(&p1.access_token, &u2).unwrap();
    app.accept_request(&p2.access_token, &u1).unwrap();

    app.remove_friend(&p2.access_token, &u1).unwrap();
    assert!(app.friends(&p1.access_token).unwrap().is_empty());

    // removing again is harmless
    app.remove_friend(&p2.access_token, &u1).unwrap();
}

#[test]
fn test_request_to_connected_friend_conflicts() {
    let app = app();
    let (u1, p1) = register(&app, "u1");
    let (u2, p2) = register(&app, "u2");
    app.send_request(&p1.access_token, &u2).unwrap();
    app.accept_request(&p2.access_token, &u1).unwrap();

    let err = app.send_request(&p1.access_token, &u2).unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

#[test]
fn test_request_targets_must_exist() {
    let app = app();
    let (u1, p1) = register(&app, "u1");

    let unknown = app
        .send_request(&p1.access_token, &mappin::Uid::from("u-missing"))
        .unwrap_err();
    assert!(matches!(unknown, Error::NotFound { .. }));

    let own = app.send_request(&p1.access_token, &u1).unwrap_err();
    assert!(matches!(own, Error::InvalidInput { .. }));
}
