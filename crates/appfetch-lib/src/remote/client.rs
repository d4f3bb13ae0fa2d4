use super::store::RemoteStore;
use super::types::ListingPage;
use crate::error::AppFetchError;
use crate::utils::write_chunks;
use reqwest::Response;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::path::Path;
use url::Url;

pub const API_KEY_HEADER: &str = "api-key";

#[derive(Clone)]
pub struct RemoteSettings {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub jwt: Option<String>,
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("jwt", &self.jwt.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RemoteSettings {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        jwt: Option<String>,
    ) -> Result<Self, AppFetchError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_key,
            jwt,
        })
    }
}

/// Parses the service root and makes sure relative joins append to it.
pub fn normalize_base_url(base_url: &str) -> Result<Url, AppFetchError> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Headers for the configured credentials. Empty credentials are not sent.
pub fn auth_headers(settings: &RemoteSettings) -> Result<HeaderMap, AppFetchError> {
    let mut headers = HeaderMap::new();

    if let Some(api_key) = settings.api_key.as_deref().filter(|key| !key.is_empty()) {
        let mut value = HeaderValue::from_str(api_key).map_err(|_| AppFetchError::InvalidHeader {
            name: API_KEY_HEADER,
        })?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
    }

    if let Some(jwt) = settings.jwt.as_deref().filter(|jwt| !jwt.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {jwt}")).map_err(|_| {
            AppFetchError::InvalidHeader {
                name: "authorization",
            }
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// HTTP client for the DIAL file API. Every request carries the auth headers.
#[derive(Clone, Debug)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RemoteClient {
    pub fn new(settings: &RemoteSettings) -> Result<Self, AppFetchError> {
        let http = reqwest::Client::builder()
            .default_headers(auth_headers(settings)?)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, AppFetchError> {
        Ok(self.base_url.join(&format!("v1/{path}"))?)
    }
}

fn ensure_success(url: &Url, response: Response) -> Result<Response, AppFetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppFetchError::Transport {
            url: url.to_string(),
            status,
        })
    }
}

impl RemoteStore for RemoteClient {
    async fn list_folder(
        &self,
        folder: &str,
        token: Option<&str>,
    ) -> Result<ListingPage, AppFetchError> {
        let url = self.endpoint(&format!("metadata/{folder}"))?;

        let mut request = self.http.get(url.clone()).query(&[("recursive", "true")]);
        if let Some(token) = token {
            request = request.query(&[("token", token)]);
        }

        tracing::trace!(url = %url, token = ?token, "Listing folder");
        let response = ensure_success(&url, request.send().await?)?;
        Ok(response.json::<ListingPage>().await?)
    }

    async fn download(&self, file_url: &str, destination: &Path) -> Result<u64, AppFetchError> {
        let url = self.endpoint(file_url)?;

        tracing::trace!(url = %url, "Requesting file");
        let response = ensure_success(&url, self.http.get(url.clone()).send().await?)?;

        tracing::info!("{} => {}", url, destination.display());
        write_chunks(response.bytes_stream(), destination).await
    }
}
