//! pkgmirror - a local, searchable mirror of a package-manifest repository
//!
//! The library keeps a git checkout of an upstream manifest repository
//! (winget-pkgs by default) in sync, parses its manifests into
//! [`PackageRecord`](package::PackageRecord)s and serves lookups, ranked
//! search and paginated listing from an in-memory index.
//!
//! # Modules
//!
//! - [`config`]: repository, search, sync and logging settings
//! - [`mirror`]: clone-or-update of the local checkout
//! - [`parser`]: manifest formats
//! - [`sync`]: full-scan and incremental index rebuilds
//! - [`index`]: the record store and its query engine
//! - [`service`]: the facade transports talk to
//! - [`logging`]: file and console tracing output

pub mod config;
pub mod index;
pub mod logging;
pub mod mirror;
pub mod package;
pub mod parser;
pub mod service;
pub mod sync;
