use lazy_static::lazy_static;
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MAX_BODY: usize = 2 * 1024 * 1024;

lazy_static! {
    /// Address the HTTP listener binds to. The port always comes from the command line.
    pub static ref HOST: String = env::var("BERLIN_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned());
    /// Largest request body accepted, in bytes.
    pub static ref MAX_BODY: usize = env::var("BERLIN_MAX_BODY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_BODY);
}

pub fn load() {
    let _ = *HOST;
    let _ = *MAX_BODY;
}
