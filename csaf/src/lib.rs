//! Retrieving and validating CSAF documents
//!
//! ## Idea
//!
//! A provider is resolved from a domain by following the discovery process of the CSAF standard
//! (`.well-known`, `security.txt`, DNS). Once resolved, its directory indices and ROLIE feeds
//! are fanned out into a stream of advisory URLs, which then gets fetched into a stream of
//! advisories. Every retrieved party and document is checked against the requirements of the
//! role the party claims.
//!
//! Failures of individual documents are reported as items of the stream, they never stop the
//! stream itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use csaf_retrieval::loader::CsafLoader;
//! use csaf_retrieval::retrieve::{DocumentOptions, ResolveOptions, RetrievedProvider};
//!
//! async fn walk() -> anyhow::Result<()> {
//!   let loader = CsafLoader::new(Default::default())?;
//!   let provider =
//!     RetrievedProvider::from_domain("example.com", &loader, &ResolveOptions::default()).await?;
//!
//!   let documents = provider.fetch_documents(&loader, DocumentOptions::default());
//!   let mut documents = std::pin::pin!(documents);
//!   while let Some(document) = documents.next().await {
//!     match document {
//!       Ok(document) => log::info!("Found advisory: {}", document.url),
//!       Err(err) => log::warn!("{err}"),
//!     }
//!   }
//!
//!   Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used)]

pub mod context;
pub mod loader;
pub mod metadata;
pub mod model;
pub mod retrieve;
pub mod validation;
