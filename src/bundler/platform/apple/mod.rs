//! Apple application bundle support.
//!
//! - [`app`]: the assembly pipeline (layout, libraries, executable, profile)
//! - [`info_plist`]: `Info.plist` rendering
//! - [`sign`]: entitlements generation and `codesign` invocation
//!
//! # Build Requirements
//!
//! | Step | Required Tools | Notes |
//! |------|----------------|-------|
//! | .app | none | Pure filesystem work, runs on any host |
//! | Code Signing | `codesign`, signing identity | iOS only, optional |

pub mod app;
pub mod info_plist;
pub mod sign;
