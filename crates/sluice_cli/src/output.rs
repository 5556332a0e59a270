//! Result reporting for the command line, in plain text or JSON envelopes.

use serde::Serialize;

use sluice_core::error::ProvisionError;

#[derive(Serialize)]
struct ResultEnvelope<'a> {
    result: &'a str,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
}

/// Writes command outcomes to stdout/stderr. With `json` set, every outcome
/// is wrapped in a one-field envelope so scripts can parse it.
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn success(&self, message: &str) {
        if self.json {
            match serde_json::to_string(&ResultEnvelope { result: message }) {
                Ok(envelope) => println!("{envelope}"),
                Err(err) => eprintln!("failed to encode result: {err}"),
            }
        } else {
            println!("{message}");
        }
    }

    pub fn failure(&self, error: &ProvisionError) {
        let message = error.to_string();
        if self.json {
            match serde_json::to_string(&ErrorEnvelope { error: &message }) {
                Ok(envelope) => eprintln!("{envelope}"),
                Err(err) => eprintln!("failed to encode error: {err}"),
            }
        } else {
            eprintln!("{message}");
        }
    }
}
