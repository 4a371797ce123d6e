//! Profile updates: last known location and profile image.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mappin::{Error, Location};

use crate::test_utils::*;

#[test]
fn test_update_location() {
    let app = app();
    let (_, pair) = register(&app, "ana");

    let lisbon = Location::new(38.7223, -9.1393).unwrap();
    app.update_location(&pair.access_token, lisbon).unwrap();

    let off_earth = Location {
        latitude: 0.0,
        longitude: 200.0,
    };
    let err = app.update_location(&pair.access_token, off_earth).unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn test_upload_profile_image() {
    let app = app();
    let (_, pair) = register(&app, "ana");

    let url = app
        .upload_image(&pair.access_token, &STANDARD.encode(b"\xff\xd8avatar"))
        .unwrap();
    assert_eq!(app.blobs().fetch(&url).unwrap(), b"\xff\xd8avatar".to_vec());

    let err = app.upload_image(&pair.access_token, "").unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn test_profile_updates_need_a_session() {
    let app = app();
    let (_, pair) = register(&app, "ana");
    app.logout(&pair.access_token).unwrap();

    let err = app.upload_image(&pair.access_token, "aGk=").unwrap_err();
    assert_eq!(err, Error::Unauthorized);
}
