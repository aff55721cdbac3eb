use super::{DocumentOptions, IndexFile, ResolveOptions, RetrievalError, RetrievedDocument};
use crate::context::DataSource;
use crate::loader::CsafLoader;
use crate::metadata::{MetadataRetriever, ProviderError};
use crate::model::{metadata::ProviderMetadata, rolie::RolieFeed};
use crate::validation::Role;
use chrono::{DateTime, Utc};
use csaf_retrieval_common::{changes::ChangeSource, utils::url::Urlify};
use futures::{Stream, StreamExt, future, stream};
use std::collections::HashSet;
use url::Url;

/// Provider metadata, which was retrieved and fulfills the requirements of its role.
#[derive(Clone, Debug)]
pub struct RetrievedProvider {
    pub metadata: ProviderMetadata,
    /// The URL the metadata was finally loaded from
    pub url: Url,
    /// The approach which found the metadata
    pub data_source: DataSource,
}

impl Urlify for RetrievedProvider {
    fn url(&self) -> &Url {
        &self.url
    }
}

/// The content of a directory's index file.
#[derive(Clone, Debug)]
pub struct DirectoryIndex {
    pub directory: Url,
    pub file: IndexFile,
    pub content: String,
}

/// A fetched ROLIE feed.
#[derive(Clone, Debug)]
pub struct RetrievedFeed {
    pub url: Url,
    pub feed: RolieFeed,
}

impl RetrievedProvider {
    /// The role the provider claims.
    pub fn role(&self) -> &'static Role {
        self.metadata.role.into()
    }

    /// Resolve the provider of a domain.
    pub async fn from_domain(
        domain: &str,
        loader: &CsafLoader,
        options: &ResolveOptions,
    ) -> Result<Self, ProviderError> {
        MetadataRetriever::new(domain)
            .retrieve(loader, options)
            .await
    }

    /// Load provider metadata from a URL.
    ///
    /// The discovery approach is derived from the shape of the URL, see [`DataSource::from_url`].
    pub async fn from_url(url: Url, loader: &CsafLoader) -> Result<Self, ProviderError> {
        let data_source = DataSource::from_url(&url);
        Self::load(url, loader, data_source).await
    }

    pub(crate) async fn load(
        url: Url,
        loader: &CsafLoader,
        data_source: DataSource,
    ) -> Result<Self, ProviderError> {
        let loaded = loader.fetch_provider(&url).await?;

        let role: &Role = loaded.value.role.into();
        role.check_role(&loaded.context().with_data_source(data_source))
            .into_result()
            .map_err(|cause| ProviderError::Validation {
                url: url.clone(),
                cause,
            })?;

        log::debug!("Found {role} at {url} via {data_source}");

        Ok(Self {
            metadata: loaded.value,
            url: loaded.response.url,
            data_source,
        })
    }

    /// Fetch the index files of all directory based distributions.
    ///
    /// When a starting point is set, the `changes.csv` file is fetched instead of `index.txt`.
    /// Items are produced in the order requests complete.
    pub fn fetch_document_indices<'a>(
        &'a self,
        loader: &'a CsafLoader,
        options: DocumentOptions,
    ) -> impl Stream<Item = Result<DirectoryIndex, RetrievalError>> + 'a {
        let file = match options.starting_from {
            Some(_) => IndexFile::Changes,
            None => IndexFile::Index,
        };

        stream::iter(self.metadata.directory_urls())
            .map(move |directory| fetch_index(loader, directory.clone(), file))
            .buffer_unordered(options.concurrency())
    }

    /// Fetch all ROLIE feeds, of all distributions.
    ///
    /// Items are produced in the order requests complete.
    pub fn fetch_rolie_feeds<'a>(
        &'a self,
        loader: &'a CsafLoader,
        options: DocumentOptions,
    ) -> impl Stream<Item = Result<RetrievedFeed, RetrievalError>> + 'a {
        stream::iter(self.metadata.rolie_feeds())
            .map(move |feed| async move {
                let url = feed.url.clone();
                match loader.fetch_rolie_feed(&url).await {
                    Ok(feed) => Ok(RetrievedFeed { url, feed }),
                    Err(cause) => Err(RetrievalError::RolieFeed { url, cause }),
                }
            })
            .buffer_unordered(options.concurrency())
    }

    /// The URLs of all documents of the provider, from directory indices and ROLIE feeds.
    ///
    /// Successful URLs are unique. A failure fetching an index or a feed is reported as a
    /// single failed item.
    pub fn fetch_all_document_urls<'a>(
        &'a self,
        loader: &'a CsafLoader,
        options: DocumentOptions,
    ) -> impl Stream<Item = Result<Url, RetrievalError>> + 'a {
        let since = options.starting_from;

        let indices = self
            .fetch_document_indices(loader, options)
            .flat_map(move |index| {
                stream::iter(match index {
                    Ok(index) => index.document_urls(since),
                    Err(err) => vec![Err(err)],
                })
            });

        let feeds = self
            .fetch_rolie_feeds(loader, options)
            .flat_map(move |feed| {
                stream::iter(match feed {
                    Ok(feed) => feed.document_urls(since),
                    Err(err) => vec![Err(err)],
                })
            });

        let mut seen = HashSet::new();
        stream::select(indices, feeds).filter(move |url| {
            future::ready(match url {
                Ok(url) => seen.insert(url.clone()),
                Err(_) => true,
            })
        })
    }

    /// Fetch and validate all documents of the provider.
    ///
    /// Every item of [`Self::fetch_all_document_urls`] results in exactly one item, in the same
    /// order. Documents are checked against the document requirements of the provider's role.
    pub fn fetch_documents<'a>(
        &'a self,
        loader: &'a CsafLoader,
        options: DocumentOptions,
    ) -> impl Stream<Item = Result<RetrievedDocument, RetrievalError>> + 'a {
        let role = self.role();

        self.fetch_all_document_urls(loader, options)
            .map(move |url| async move {
                match url {
                    Ok(url) => RetrievedDocument::from_url(url, loader, role).await,
                    Err(err) => Err(err),
                }
            })
            .buffered(options.concurrency())
    }

    /// The number of documents [`Self::fetch_documents`] will try to load.
    ///
    /// This fetches all indices and feeds, and counts the successful URLs.
    pub async fn count_expected_documents(
        &self,
        loader: &CsafLoader,
        options: DocumentOptions,
    ) -> usize {
        self.fetch_all_document_urls(loader, options)
            .filter(|url| future::ready(url.is_ok()))
            .count()
            .await
    }
}

async fn fetch_index(
    loader: &CsafLoader,
    directory: Url,
    file: IndexFile,
) -> Result<DirectoryIndex, RetrievalError> {
    let result = match join(&directory, file.name()) {
        Ok(url) => loader.fetch_text(&url).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(content) => Ok(DirectoryIndex {
            directory,
            file,
            content,
        }),
        Err(cause) => Err(RetrievalError::Index {
            directory,
            file,
            cause,
        }),
    }
}

/// Append a relative path to a directory URL, regardless of a trailing slash.
fn join(directory: &Url, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}/{path}",
        directory.as_str().trim_end_matches('/')
    ))
}

impl DirectoryIndex {
    /// The document URLs listed in the index.
    ///
    /// For `index.txt`, every line is an entry, only a blank last line is skipped. For
    /// `changes.csv`, only entries changed at or after `since` are listed.
    pub fn document_urls(&self, since: Option<DateTime<Utc>>) -> Vec<Result<Url, RetrievalError>> {
        match self.file {
            IndexFile::Index => {
                let mut lines = self
                    .content
                    .split('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line))
                    .collect::<Vec<_>>();
                if lines.last().is_some_and(|line| line.trim().is_empty()) {
                    lines.pop();
                }

                lines.into_iter().map(|line| self.document_url(line)).collect()
            }
            IndexFile::Changes => {
                let changes = ChangeSource::parse(&self.content);
                match since {
                    Some(since) => changes
                        .since(since)
                        .map(|entry| self.document_url(&entry.file))
                        .collect(),
                    None => changes
                        .entries
                        .iter()
                        .map(|entry| self.document_url(&entry.file))
                        .collect(),
                }
            }
        }
    }

    fn document_url(&self, entry: &str) -> Result<Url, RetrievalError> {
        join(&self.directory, entry).map_err(|cause| RetrievalError::DocumentUrl {
            directory: self.directory.clone(),
            entry: entry.to_string(),
            cause,
        })
    }
}

impl RetrievedFeed {
    /// The document URLs of all entries, updated after `since`, if set.
    pub fn document_urls(&self, since: Option<DateTime<Utc>>) -> Vec<Result<Url, RetrievalError>> {
        self.feed
            .feed
            .entry
            .iter()
            .filter(|entry| since.is_none_or(|since| entry.updated > since))
            .map(|entry| Ok(entry.content.src.clone()))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn index(file: IndexFile, content: &str) -> DirectoryIndex {
        DirectoryIndex {
            directory: Url::parse("https://example.com/csaf/").unwrap(),
            file,
            content: content.into(),
        }
    }

    fn urls(results: Vec<Result<Url, RetrievalError>>) -> Vec<String> {
        results
            .into_iter()
            .map(|url| url.unwrap().to_string())
            .collect()
    }

    #[test]
    fn index_lines() {
        let index = index(IndexFile::Index, "2024/a.json\r\n2023/b.json\n");

        assert_eq!(
            urls(index.document_urls(None)),
            vec![
                "https://example.com/csaf/2024/a.json",
                "https://example.com/csaf/2023/b.json",
            ]
        );
    }

    #[test]
    fn index_without_trailing_newline() {
        let index = index(IndexFile::Index, "a.json");
        assert_eq!(
            urls(index.document_urls(None)),
            vec!["https://example.com/csaf/a.json"]
        );
    }

    #[test]
    fn index_blank_last_line() {
        let index = index(IndexFile::Index, "a.json\n  ");
        assert_eq!(
            urls(index.document_urls(None)),
            vec!["https://example.com/csaf/a.json"]
        );
    }

    #[test]
    fn index_empty() {
        assert!(index(IndexFile::Index, "").document_urls(None).is_empty());
    }

    #[test]
    fn changes_since() {
        let index = index(
            IndexFile::Changes,
            "2024/new.json,2024-03-01T00:00:00Z\n2023/old.json,2023-01-01T00:00:00Z\n",
        );

        assert_eq!(
            urls(index.document_urls(Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))),
            vec!["https://example.com/csaf/2024/new.json"]
        );
        assert_eq!(index.document_urls(None).len(), 2);
    }

    #[test]
    fn join_ignores_trailing_slash() {
        let with = Url::parse("https://example.com/csaf/").unwrap();
        let without = Url::parse("https://example.com/csaf").unwrap();

        assert_eq!(join(&with, "index.txt"), join(&without, "index.txt"));
    }
}
