//! Posting and the location feed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mappin::{Command, Error, FeedGroup, FeedOrder, Location, NewMessage, Polarity};

use crate::test_utils::*;

const LISBON: (f64, f64) = (38.7223, -9.1393);
const TOKYO: (f64, f64) = (35.6762, 139.6503);

fn message(title: &str, at: (f64, f64)) -> NewMessage {
    NewMessage {
        title: title.to_string(),
        text: format!("{} text", title),
        image: None,
        latitude: at.0,
        longitude: at.1,
    }
}

fn lisbon() -> Location {
    Location::new(LISBON.0, LISBON.1).unwrap()
}

#[test]
fn test_feed_is_local() {
    let app = app();
    let (_, pair) = register(&app, "ana");
    app.post(&pair.access_token, message("near", LISBON)).unwrap();
    app.post(&pair.access_token, message("far", TOKYO)).unwrap();

    let feed = app
        .nearby(&pair.access_token, lisbon(), FeedOrder::New, FeedGroup::Everyone)
        .unwrap();
    let titles: Vec<_> = feed.iter().map(|e| e.message.title.as_str()).collect();
    assert_eq!(titles, vec!["near"]);
}

#[test]
fn test_top_order_follows_counter() {
    let app = app();
    let (_, ana) = register(&app, "ana");
    let (_, bob) = register(&app, "bob");
    let quiet = app.post(&ana.access_token, message("quiet", LISBON)).unwrap();
    let liked = app.post(&ana.access_token, message("liked", LISBON)).unwrap();

    app.evaluate(&bob.access_token, &liked.mid, Polarity::Up).unwrap();
    app.evaluate(&bob.access_token, &quiet.mid, Polarity::Down).unwrap();

    let feed = app
        .nearby(&ana.access_token, lisbon(), FeedOrder::Top, FeedGroup::Everyone)
        .unwrap();
    let titles: Vec<_> = feed.iter().map(|e| e.message.title.as_str()).collect();
    assert_eq!(titles, vec!["liked", "quiet"]);
}

#[test]
fn test_feed_reports_callers_evaluation() {
    let app = app();
    let (_, ana) = register(&app, "ana");
    let (_, bob) = register(&app, "bob");
    let posted = app.post(&ana.access_token, message("hello", LISBON)).unwrap();
    app.evaluate(&bob.access_token, &posted.mid, Polarity::Down).unwrap();

    let for_bob = app
        .nearby(&bob.access_token, lisbon(), FeedOrder::New, FeedGroup::Everyone)
        .unwrap();
    assert_eq!(for_bob[0].my_evaluation, Some(Polarity::Down));

    let for_ana = app
        .nearby(&ana.access_token, lisbon(), FeedOrder::New, FeedGroup::Everyone)
        .unwrap();
    assert_eq!(for_ana[0].my_evaluation, None);
    assert_eq!(for_ana[0].message.eval_value, -1);
}

#[test]
fn test_friends_feed_only_shows_friends() {
    let app = app();
    let (ana_uid, ana) = register(&app, "ana");
    let (bob_uid, bob) = register(&app, "bob");
    let (_, eve) = register(&app, "eve");

    app.send_request(&ana.access_token, &bob_uid).unwrap();
    app.accept_request(&bob.access_token, &ana_uid).unwrap();

    app.post(&ana.access_token, message("mine", LISBON)).unwrap();
    app.post(&bob.access_token, message("friend", LISBON)).unwrap();
    app.post(&eve.access_token, message("stranger", LISBON)).unwrap();

    let feed = app
        .nearby(&ana.access_token, lisbon(), FeedOrder::New, FeedGroup::Friends)
        .unwrap();
    let titles: Vec<_> = feed.iter().map(|e| e.message.title.as_str()).collect();
    assert_eq!(titles, vec!["friend"]);
}

#[test]
fn test_image_is_stored_as_blob() {
    let app = app();
    let (_, pair) = register(&app, "ana");
    let mut input = message("photo", LISBON);
    input.image = Some(STANDARD.encode(b"\x89PNG fake"));

    let posted = app.post(&pair.access_token, input).unwrap();
    let url = posted.image.unwrap();
    assert_eq!(app.blobs().fetch(&url).unwrap(), b"\x89PNG fake".to_vec());
}

#[test]
fn test_rejects_bad_input() {
    let app = app();
    let (_, pair) = register(&app, "ana");

    let off_earth = app
        .post(&pair.access_token, message("nowhere", (91.0, 0.0)))
        .unwrap_err();
    assert!(matches!(off_earth, Error::InvalidInput { .. }));

    let untitled = app
        .post(&pair.access_token, message("", LISBON))
        .unwrap_err();
    assert!(matches!(untitled, Error::InvalidInput { .. }));

    let mut garbled = message("img", LISBON);
    garbled.image = Some("***".to_string());
    assert!(matches!(
        app.post(&pair.access_token, garbled).unwrap_err(),
        Error::InvalidInput { .. }
    ));
}

#[test]
fn test_json_envelope_round_trip() {
    let app = app();
    let (_, pair) = register(&app, "ana");
    app.post(&pair.access_token, message("hello", LISBON)).unwrap();

    let raw = serde_json::json!({
        "command": "nearby",
        "auth": format!("Bearer {}", pair.access_token),
        "latitude": LISBON.0,
        "longitude": LISBON.1,
        "order": "new",
    })
    .to_string();
    let response = app.executor().respond_json(&raw);
    assert!(!response.error);
    let data = response.data.unwrap();
    assert_eq!(data[0]["title"], "hello");
    assert!(data[0].get("user_eval").is_none());

    let denied = app.executor().respond(Command::ListFriends {
        auth: "Bearer nope".to_string(),
    });
    assert!(denied.error);
    assert_eq!(denied.msg, "Unauthorized");
}
