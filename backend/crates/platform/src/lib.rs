//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random tokens)
//! - Password hashing (Argon2id with configurable cost)
//! - Signed bearer tokens
//! - Client identification from request headers

pub mod client;
pub mod crypto;
pub mod password;
pub mod token;
