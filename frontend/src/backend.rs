//! Blocking client for the grid extraction and solver services.

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use log::debug;
use maze::{Grid, GridResponse, SolveRequest, SolveResponse};
use reqwest::{
    blocking::{Client, Response},
    Url,
};

/// Everything the frontend needs from the backend. Called from worker threads.
pub trait Backend: Send + Sync {
    fn list_images(&self) -> anyhow::Result<Vec<String>>;
    fn fetch_grid(&self, image: &str, threshold: u8) -> anyhow::Result<Grid>;
    fn fetch_image(&self, image: &str) -> anyhow::Result<Vec<u8>>;
    fn solve(&self, request: &SolveRequest) -> anyhow::Result<SolveResponse>;
}

pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid backend url {base_url:?}"))?;
        if base.cannot_be_a_base() {
            bail!("backend url {base_url:?} cannot be used as a base");
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base })
    }

    /// The base url with `segments` appended to its path
    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("backend url {} cannot be a base", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn images_url(&self) -> anyhow::Result<Url> {
        self.endpoint(&["images"])
    }

    fn grid_url(&self, image: &str, threshold: u8) -> anyhow::Result<Url> {
        let mut url = self.endpoint(&["grid"])?;
        url.query_pairs_mut()
            .append_pair("img", image)
            .append_pair("threshold", &threshold.to_string());
        Ok(url)
    }

    fn image_url(&self, image: &str) -> anyhow::Result<Url> {
        self.endpoint(&["images", image])
    }

    fn solve_url(&self) -> anyhow::Result<Url> {
        self.endpoint(&["astar"])
    }

    fn get(&self, url: Url) -> anyhow::Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("request to {url} failed"))?;
        checked(response)
    }
}

fn checked(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if !status.is_success() {
        bail!("{} responded with {}", response.url(), status);
    }
    Ok(response)
}

impl Backend for HttpBackend {
    fn list_images(&self) -> anyhow::Result<Vec<String>> {
        self.get(self.images_url()?)?
            .json()
            .context("invalid image list")
    }

    fn fetch_grid(&self, image: &str, threshold: u8) -> anyhow::Result<Grid> {
        let response: GridResponse = self
            .get(self.grid_url(image, threshold)?)?
            .json()
            .with_context(|| format!("invalid grid for {image}"))?;
        Ok(response.grid)
    }

    fn fetch_image(&self, image: &str) -> anyhow::Result<Vec<u8>> {
        let bytes = self
            .get(self.image_url(image)?)?
            .bytes()
            .with_context(|| format!("failed to read {image}"))?;
        Ok(bytes.to_vec())
    }

    fn solve(&self, request: &SolveRequest) -> anyhow::Result<SolveResponse> {
        let url = self.solve_url()?;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .with_context(|| format!("request to {url} failed"))?;
        checked(response)?
            .json()
            .context("invalid solver response")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(base, Duration::from_secs(1)).unwrap()
    }

    #[rstest]
    #[case("http://localhost:8000")]
    #[case("http://localhost:8000/")]
    fn test_endpoints(#[case] base: &str) {
        let backend = backend(base);
        assert_eq!(
            backend.images_url().unwrap().as_str(),
            "http://localhost:8000/images"
        );
        assert_eq!(
            backend.solve_url().unwrap().as_str(),
            "http://localhost:8000/astar"
        );
        assert_eq!(
            backend.grid_url("maze-1.png", 200).unwrap().as_str(),
            "http://localhost:8000/grid?img=maze-1.png&threshold=200"
        );
    }

    #[test]
    fn test_endpoints_below_a_prefix() {
        let backend = backend("http://example.com/api/");
        assert_eq!(
            backend.image_url("a.png").unwrap().as_str(),
            "http://example.com/api/images/a.png"
        );
    }

    #[test]
    fn test_identifiers_are_escaped() {
        let backend = backend("http://localhost:8000");
        assert_eq!(
            backend.image_url("my maze/1.png").unwrap().as_str(),
            "http://localhost:8000/images/my%20maze%2F1.png"
        );
        assert_eq!(
            backend.grid_url("a&b.png", 7).unwrap().as_str(),
            "http://localhost:8000/grid?img=a%26b.png&threshold=7"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(HttpBackend::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpBackend::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }
}
