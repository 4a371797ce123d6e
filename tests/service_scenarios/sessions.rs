//! Session lifecycle: login, rotation, revocation, validation codes.

use mappin::Error;

use crate::test_utils::*;

#[test]
fn test_refresh_token_is_single_use() {
    let app = app();
    let (uid, pair) = register(&app, "ana");

    let rotated = app.refresh(&pair.refresh_token).unwrap();
    assert_eq!(app.ping(&rotated.access_token).unwrap(), uid);

    let err = app.refresh(&pair.refresh_token).unwrap_err();
    assert_eq!(err, Error::RefreshExpired);
}

#[test]
fn test_rotation_retires_previous_access_token() {
    let app = app();
    let (_, pair) = register(&app, "ana");
    app.refresh(&pair.refresh_token).unwrap();

    let err = app.ping(&pair.access_token).unwrap_err();
    assert_eq!(err, Error::Unauthorized);
}

#[test]
fn test_logout_cascades_to_refresh_token() {
    let app = app();
    let (_, pair) = register(&app, "ana");

    app.logout(&pair.access_token).unwrap();

    assert_eq!(app.ping(&pair.access_token).unwrap_err(), Error::Unauthorized);
    assert_eq!(
        app.refresh(&pair.refresh_token).unwrap_err(),
        Error::RefreshExpired
    );
    assert_eq!(app.logout(&pair.access_token).unwrap_err(), Error::Unauthorized);
}

#[test]
fn test_sessions_are_independent() {
    let app = app();
    let (uid, first) = register(&app, "ana");
    let second = app.login(&email_of("ana"), PASSWORD).unwrap();

    app.logout(&first.access_token).unwrap();
    assert_eq!(app.ping(&second.access_token).unwrap(), uid);
}

#[test]
fn test_tampered_token_is_unauthorized() {
    let app = app();
    let (_, pair) = register(&app, "ana");
    let mut forged = pair.access_token.clone();
    forged.push('x');

    assert_eq!(app.ping(&forged).unwrap_err(), Error::Unauthorized);
    assert_eq!(app.ping("not-a-token").unwrap_err(), Error::Unauthorized);
}

#[test]
fn test_refresh_token_cannot_authenticate() {
    let app = app();
    let (_, pair) = register(&app, "ana");
    assert_eq!(app.friends(&pair.refresh_token).unwrap_err(), Error::Unauthorized);
}

#[test]
fn test_unvalidated_login_resends_code() {
    let app = app();
    app.signup("ana", &email_of("ana"), PASSWORD).unwrap();
    let before = app.outbox().sent().len();

    let err = app.login(&email_of("ana"), PASSWORD).unwrap_err();
    assert!(matches!(err, Error::InvalidInput { ref reason } if reason.contains("not validated")));
    assert_eq!(app.outbox().sent().len(), before + 1);

    app.validate(&mailed_code(&app, "ana")).unwrap();
    assert!(app.login(&email_of("ana"), PASSWORD).is_ok());
}

#[test]
fn test_bad_credentials_fail_identically() {
    let app = app();
    register(&app, "ana");

    let wrong_password = app.login(&email_of("ana"), "wrong-password").unwrap_err();
    let unknown_email = app.login(&email_of("nobody"), PASSWORD).unwrap_err();
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.to_string(), "Invalid login data");
}

#[test]
fn test_validation_code_is_single_use() {
    let app = app();
    app.signup("ana", &email_of("ana"), PASSWORD).unwrap();
    let code = mailed_code(&app, "ana");

    app.validate(&code).unwrap();
    assert_eq!(app.validate(&code).unwrap_err(), Error::CodeExpired);
    assert_eq!(app.validate("vbogus").unwrap_err(), Error::CodeExpired);
}

#[test]
fn test_duplicate_email_rejected() {
    let app = app();
    register(&app, "ana");
    let err = app.signup("other", &email_of("ana"), PASSWORD).unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

#[test]
fn test_username_change_cooldown() {
    let app = app();
    let (_, pair) = register(&app, "ana");

    app.update_username(&pair.access_token, "anab").unwrap();
    let err = app
        .update_username(&pair.access_token, "anac")
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

#[test]
fn test_validation_mail_is_sent_from_configured_sender() {
    let app = app();
    app.signup("ana", &email_of("ana"), PASSWORD).unwrap();
    let mail = app.outbox().last_to(&email_of("ana")).unwrap();
    assert_eq!(mail.subject, "Confirm your account");
    assert!(mail.from.contains("mappin@hadrons.xyz"));
}
