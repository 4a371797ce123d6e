//! Shared setup for the scenario tests.

use mappin::{Mappin, ServiceConfig, TokenPair, Uid};

pub const PASSWORD: &str = "correct-horse";

pub fn app() -> Mappin {
    mappin::init_tracing("warn");
    let mut config = ServiceConfig::with_secrets("access-secret", "refresh-secret");
    config.accounts.password_cost = 4;
    Mappin::in_memory(config).unwrap()
}

pub fn email_of(name: &str) -> String {
    format!("{}@example.com", name)
}

/// The code from the most recent validation mail sent to `name`.
pub fn mailed_code(app: &Mappin, name: &str) -> String {
    let mail = app.outbox().last_to(&email_of(name)).unwrap();
    mail.body.rsplit("code=").next().unwrap().to_string()
}

/// Sign up, validate and log in; returns the identity and its first session.
pub fn register(app: &Mappin, name: &str) -> (Uid, TokenPair) {
    app.signup(name, &email_of(name), PASSWORD).unwrap();
    app.validate(&mailed_code(app, name)).unwrap();
    let pair = app.login(&email_of(name), PASSWORD).unwrap();
    let uid = app.ping(&pair.access_token).unwrap();
    (uid, pair)
}
