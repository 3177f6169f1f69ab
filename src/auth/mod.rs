//! Authentication module for the employer dashboard
//!
//! Salted password hashing and the username/password login endpoint.
//! There are no sessions or tokens; a successful login only returns the
//! account.

pub mod handlers;
pub mod password;

pub use password::{hash_password, verify_password};
