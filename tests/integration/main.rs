//! Integration tests for Catalog-Harvest
//!
//! These tests use wiremock to serve category pages, a scripted renderer in
//! place of Chromium, and temporary directories for the CSV output.

mod common;
mod config_tests;
mod harvest_tests;
