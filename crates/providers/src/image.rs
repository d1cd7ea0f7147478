//! Image generation - concurrent seeded requests against a hosted
//! diffusion endpoint, saved as numbered jpg files.

use crate::traits::ProviderError;
use rand::Rng;
use reqwest::Client;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};

const VARIANT_COUNT: usize = 4;

fn seeded_payload(prompt: &str) -> serde_json::Value {
    let seed: u32 = rand::thread_rng().gen_range(0..1_000_000);
    json!({
        "inputs": format!(
            "{prompt}, quality=4K, sharpness=maximum, Ultra High details, \
             high resolution, seed = {seed}"
        ),
    })
}

/// Turn a prompt into a safe file stem.
fn sanitize_stem(prompt: &str) -> String {
    prompt
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect()
}

async fn request_image(
    client: &Client,
    api_url: &str,
    api_key: Option<&str>,
    payload: &serde_json::Value,
) -> Result<Vec<u8>, ProviderError> {
    let mut request = client.post(api_url).json(payload);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Http(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api(format!("{}: {}", status, text)));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProviderError::Http(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Text-to-image over a hosted diffusion endpoint. Each prompt becomes
/// four concurrent requests with different seeds; partial failures are
/// tolerated as long as at least one image lands.
pub struct ImageGenerator {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    output_dir: PathBuf,
    open_after_save: bool,
}

impl ImageGenerator {
    pub fn new(
        client: Client,
        api_url: String,
        api_key: Option<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            output_dir: output_dir.into(),
            open_after_save: false,
        }
    }

    /// Open each saved image with the system viewer.
    pub fn with_viewer(mut self) -> Self {
        self.open_after_save = true;
        self
    }

    pub async fn generate(&self, prompt: &str) -> Result<Vec<PathBuf>, ProviderError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut tasks = Vec::with_capacity(VARIANT_COUNT);
        for index in 1..=VARIANT_COUNT {
            let client = self.client.clone();
            let api_url = self.api_url.clone();
            let api_key = self.api_key.clone();
            let payload = seeded_payload(prompt);
            tasks.push((
                index,
                tokio::spawn(async move {
                    request_image(&client, &api_url, api_key.as_deref(), &payload).await
                }),
            ));
        }

        let stem = sanitize_stem(prompt);
        let mut saved = Vec::new();
        for (index, task) in tasks {
            let bytes = match task.await {
                Ok(Ok(bytes)) => bytes,
                Ok(Err(e)) => {
                    warn!(index, error = %e, "image request failed");
                    continue;
                }
                Err(e) => {
                    warn!(index, error = %e, "image task failed");
                    continue;
                }
            };

            let path = self.output_dir.join(format!("{stem}_{index}.jpg"));
            let tmp_path = path.with_extension("jpg.tmp");
            tokio::fs::write(&tmp_path, &bytes).await?;
            tokio::fs::rename(&tmp_path, &path).await?;
            info!(path = %path.display(), "image saved");
            saved.push(path);
        }

        if saved.is_empty() {
            return Err(ProviderError::Api(format!(
                "all {VARIANT_COUNT} image requests failed"
            )));
        }

        if self.open_after_save {
            for path in &saved {
                if let Err(e) = open::that(path) {
                    warn!(path = %path.display(), error = %e, "could not open image viewer");
                }
            }
        }

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_stem_flattens_punctuation() {
        assert_eq!(sanitize_stem("A lion, 4k"), "a_lion__4k");
        assert_eq!(sanitize_stem("sunset"), "sunset");
    }

    #[test]
    fn test_seeded_payload_embeds_prompt_and_seed() {
        let payload = seeded_payload("a lion");
        let inputs = payload["inputs"].as_str().unwrap();
        assert!(inputs.starts_with("a lion, quality=4K"));
        assert!(inputs.contains("seed = "));
    }
}
