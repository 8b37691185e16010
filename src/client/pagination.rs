//! `Link` header pagination for GitHub list endpoints

use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{
    api::GithubApi,
    error::{ClientError, Result},
};
use crate::id::RepoId;

/// Lazily walks a paginated collection, one request per [`Paginator::next_page`] call.
///
/// The first request carries the caller's query parameters. Every following
/// request goes to the exact `rel="next"` URL GitHub handed back, which
/// already encodes them.
#[derive(Debug)]
pub struct Paginator<'a> {
    api: &'a GithubApi,
    repo: &'a RepoId,
    next: Option<PageTarget>,
    requests: usize,
}

#[derive(Debug)]
enum PageTarget {
    First { url: String, query: Vec<(String, String)> },
    Link(String),
}

impl<'a> Paginator<'a> {
    pub(crate) fn new(
        api: &'a GithubApi,
        repo: &'a RepoId,
        url: String,
        query: Vec<(String, String)>,
    ) -> Self {
        Self {
            api,
            repo,
            next: Some(PageTarget::First { url, query }),
            requests: 0,
        }
    }

    /// Number of requests issued so far
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Fetch the next page. `None` once the last page has been consumed.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>> {
        let Some(target) = self.next.take() else {
            return Ok(None);
        };

        let page = match &target {
            PageTarget::First { url, query } => self.api.fetch(self.repo, url, query).await?,
            PageTarget::Link(url) => {
                url::Url::parse(url).map_err(|_| ClientError::InvalidUrl { url: url.clone() })?;
                self.api.fetch(self.repo, url, &[]).await?
            },
        };
        self.requests += 1;
        self.next = parse_link_next(&page.headers).map(PageTarget::Link);

        let records = page.records()?;
        debug!(
            endpoint = %page.path,
            records = records.len(),
            has_next = self.next.is_some(),
            "Fetched page"
        );
        Ok(Some(records))
    }

    /// Drain every remaining page, in order
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }

    /// Drain every remaining page and deserialize each record
    pub async fn collect_as<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let endpoint = self.endpoint();
        self.collect_all()
            .await?
            .into_iter()
            .map(|record| {
                serde_json::from_value(record)
                    .map_err(|e| ClientError::json_parse(endpoint.clone(), "Unexpected record", e))
            })
            .collect()
    }

    fn endpoint(&self) -> String {
        match &self.next {
            Some(PageTarget::First { url, .. }) | Some(PageTarget::Link(url)) => url.clone(),
            None => String::new(),
        }
    }
}

/// Find the `rel="next"` target in a `Link` header such as
/// `<https://api.github.com/...&page=2>; rel="next", <...&page=5>; rel="last"`
pub fn parse_link_next(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let mut sections = part.split(';');
        let target = sections.next()?.trim();
        let is_next = sections.any(|param| param.trim() == "rel=\"next\"");
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers_with_link(link: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_static(link));
        headers
    }

    #[test]
    fn finds_next_among_other_relations() {
        let headers = headers_with_link(
            "<https://api.github.com/repositories/1/issues?state=all&page=2>; rel=\"next\", \
             <https://api.github.com/repositories/1/issues?state=all&page=9>; rel=\"last\"",
        );
        assert_eq!(
            parse_link_next(&headers).as_deref(),
            Some("https://api.github.com/repositories/1/issues?state=all&page=2")
        );
    }

    #[test]
    fn next_need_not_come_first() {
        let headers = headers_with_link(
            "<https://api.github.com/x?page=1>; rel=\"prev\", <https://api.github.com/x?page=3>; rel=\"next\"",
        );
        assert_eq!(
            parse_link_next(&headers).as_deref(),
            Some("https://api.github.com/x?page=3")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let headers = headers_with_link(
            "<https://api.github.com/x?page=1>; rel=\"first\", <https://api.github.com/x?page=4>; rel=\"prev\"",
        );
        assert_eq!(parse_link_next(&headers), None);
    }

    #[test]
    fn missing_header_has_no_next() {
        assert_eq!(parse_link_next(&HeaderMap::new()), None);
    }
}
