//! `health` command: report whether the backend is reachable.

use std::error::Error;

use crate::api::backend::{BackendError, HttpBackend, PolicyBackend};
use crate::core::notification::error_text;

pub async fn check_health(backend: &dyn PolicyBackend) -> Result<String, BackendError> {
    Ok(backend.health().await?.status)
}

pub async fn run_health(backend_url: &str) -> Result<(), Box<dyn Error>> {
    let backend = HttpBackend::new(backend_url);
    match check_health(&backend).await {
        Ok(status) => {
            println!("✅ {} is {status}", backend.base_url());
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", error_text(&format!("{} unreachable: {err}", backend.base_url())));
            std::process::exit(1);
        }
    }
}
