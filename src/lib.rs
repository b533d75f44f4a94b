//! Ethos credibility scores for Farcaster Mini Apps.
//!
//! Fetches a subject's score from the Ethos API, classifies it and serves
//! it to the Mini App pages as JSON.

pub mod attestation;
pub mod classify;
pub mod config;
pub mod credibility;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod upstream;
pub mod userkey;
pub mod web;
pub mod webhook;
