use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use docstore_filter::Filterable;
use docstore_store::{Collection, StoreError, StoreResult};
use docstore_types::{Entry, EntryId};

const LIMIT_PARAM: &str = "limit";

#[derive(Deserialize)]
struct Assigned {
    #[serde(rename = "ID")]
    id: EntryId,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// A collection served by a peer's HTTP boundary.
///
/// The collection name is the last path segment of the URL, so
/// `http://peer:8080/authors/` addresses the `authors` collection.
#[derive(Clone, Debug)]
pub struct RemoteCollection {
    url: String,
    name: String,
    client: Client,
}

impl RemoteCollection {
    pub fn new(url: &str) -> StoreResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Self::with_client(url, client)
    }

    /// Use a preconfigured client (timeouts, proxies, TLS roots).
    pub fn with_client(url: &str, client: Client) -> StoreResult<Self> {
        let url = url.trim_end_matches('/');
        let parsed = Url::parse(url).map_err(|e| StoreError::Transport(format!("{url}: {e}")))?;
        let name = parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .ok_or_else(|| StoreError::InvalidCollectionName(url.to_string()))?
            .to_string();

        Ok(Self {
            url: url.to_string(),
            name,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn entry_url(&self, id: EntryId) -> String {
        format!("{}/{}", self.url, id)
    }

    fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::EntryDoesNotExist);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        tracing::warn!(collection = %self.name, %status, %message, "remote collection request failed");
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
        let bytes = response
            .bytes()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Collection for RemoteCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn persist<E>(&self, entry: &mut E) -> StoreResult<()>
    where
        E: Entry + Serialize,
    {
        let response = self.send(self.client.post(&self.url).json(&*entry))?;
        let assigned: Assigned = Self::decode(response)?;
        entry.set_id(assigned.id);
        tracing::debug!(collection = %self.name, id = %assigned.id, "persisted remote entry");
        Ok(())
    }

    fn delete<E>(&self, entry: &E) -> StoreResult<()>
    where
        E: Entry + ?Sized,
    {
        self.send(self.client.delete(self.entry_url(entry.id())))?;
        Ok(())
    }

    fn load<E>(&self, id: EntryId) -> StoreResult<E>
    where
        E: DeserializeOwned,
    {
        Self::decode(self.send(self.client.get(self.entry_url(id)))?)
    }

    fn load_all<E>(&self, limit: usize) -> StoreResult<Vec<E>>
    where
        E: DeserializeOwned,
    {
        let request = self
            .client
            .get(&self.url)
            .query(&[(LIMIT_PARAM, limit.to_string())]);
        Self::decode(self.send(request)?)
    }

    fn query<F, E>(&self, filter: &F, limit: usize) -> StoreResult<Vec<E>>
    where
        F: Filterable + ?Sized,
        E: Serialize + DeserializeOwned,
    {
        let filter = filter.to_filter();
        // Nothing can pass, and the query string has no way to say so.
        if filter.rejects_all() {
            return Ok(Vec::new());
        }

        let mut params = vec![(LIMIT_PARAM.to_string(), limit.to_string())];
        params.extend(filter.to_query_pairs());
        Self::decode(self.send(self.client.get(&self.url).query(&params))?)
    }
}
