//! `lavka-api` — HTTP API for the lavka back-office engine.

pub mod app;
