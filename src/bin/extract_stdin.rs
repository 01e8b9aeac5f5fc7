//! Simple CLI that reads a saved chat page from stdin and prints the
//! transcript as JSON to stdout.
//!
//! An optional first argument is the page URL, used for platform detection.

use std::io::{self, Read};

use ai_chat_export::{extract_bytes, Options};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Failure {
    success: bool,
    error: String,
}

fn main() {
    let mut html = Vec::new();
    if io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let options = Options {
        url: std::env::args().nth(1),
        ..Options::default()
    };

    let output = match extract_bytes(&html, &options) {
        Ok(transcript) => serde_json::to_string(&transcript),
        Err(err) => serde_json::to_string(&Failure {
            success: false,
            error: err.to_string(),
        }),
    };

    match output {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("Failed to serialize output: {err}");
            std::process::exit(1);
        }
    }
}
