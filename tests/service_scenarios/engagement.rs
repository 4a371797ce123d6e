//! Upvote/downvote toggles and the counters they maintain.

use std::thread;

use mappin::{Error, ItemId, MessageRecord, NewMessage, Polarity, TokenPair};

use crate::test_utils::*;

fn post(app: &mappin::Mappin, pair: &TokenPair) -> MessageRecord {
    app.post(
        &pair.access_token,
        NewMessage {
            title: "Miradouro".to_string(),
            text: "Sunset over the river".to_string(),
            image: None,
            latitude: 38.7139,
            longitude: -9.1334,
        },
    )
    .unwrap()
}

#[test]
fn test_counter_walkthrough() {
    let app = app();
    let (_, p1) = register(&app, "u1");
    let (_, p2) = register(&app, "u2");
    let m1 = post(&app, &p1);
    assert_eq!(m1.eval_value, 0);

    let steps = [
        (&p1, Polarity::Up, 1),
        (&p2, Polarity::Down, 0),
        (&p1, Polarity::Down, -2),
        (&p2, Polarity::Down, -1),
    ];
    for (pair, polarity, expected) in steps {
        let toggle = app.evaluate(&pair.access_token, &m1.mid, polarity).unwrap();
        assert_eq!(toggle.counter, expected);
    }

    assert!(app.evaluators(&m1.mid, Polarity::Up).unwrap().is_empty());
    assert_eq!(app.evaluators(&m1.mid, Polarity::Down).unwrap().len(), 1);
}

#[test]
fn test_toggle_round_trip() {
    let app = app();
    let (uid, pair) = register(&app, "u1");
    let m1 = post(&app, &pair);

    let on = app.evaluate(&pair.access_token, &m1.mid, Polarity::Up).unwrap();
    assert_eq!(on.evaluation, Some(Polarity::Up));
    assert_eq!(app.evaluators(&m1.mid, Polarity::Up).unwrap(), vec![uid]);

    let off = app.evaluate(&pair.access_token, &m1.mid, Polarity::Up).unwrap();
    assert_eq!(off.evaluation, None);
    assert_eq!(off.counter, 0);
    assert!(app.evaluators(&m1.mid, Polarity::Up).unwrap().is_empty());
}

#[test]
fn test_switching_polarity() {
    let app = app();
    let (_, pair) = register(&app, "u1");
    let m1 = post(&app, &pair);

    app.evaluate(&pair.access_token, &m1.mid, Polarity::Up).unwrap();
    let down = app.evaluate(&pair.access_token, &m1.mid, Polarity::Down).unwrap();
    assert_eq!(down.evaluation, Some(Polarity::Down));
    assert_eq!(down.counter, -1);
}

#[test]
fn test_concurrent_upvotes_all_count() {
    let app = app();
    let (_, author) = register(&app, "author");
    let m1 = post(&app, &author);

    let voters: Vec<TokenPair> = (0..8)
        .map(|i| register(&app, &format!("voter{}", i)).1)
        .collect();

    let handles: Vec<_> = voters
        .into_iter()
        .map(|pair| {
            let app = app.clone();
            let mid = m1.mid.clone();
            thread::spawn(move || app.evaluate(&pair.access_token, &mid, Polarity::Up))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(app.evaluators(&m1.mid, Polarity::Up).unwrap().len(), 8);
    let last = app.evaluate(&author.access_token, &m1.mid, Polarity::Up).unwrap();
    assert_eq!(last.counter, 9);
}

#[test]
fn test_evaluating_unknown_message() {
    let app = app();
    let (_, pair) = register(&app, "u1");
    let missing = ItemId::from("m-missing");

    let err = app
        .evaluate(&pair.access_token, &missing, Polarity::Up)
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(matches!(
        app.evaluators(&missing, Polarity::Up).unwrap_err(),
        Error::NotFound { .. }
    ));
}
