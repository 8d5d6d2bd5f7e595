//! Local stub provider.
//!
//! Stands in for providers without a wired network client, mirroring the
//! contract shape (including grounding) so the calling flows can be
//! exercised end-to-end without credentials leaving the machine.

use santri_types::Provider;

use crate::{
    ImageGenerator, ImagePayload, ImageRequest, ProviderError, TextGenerator, TextRequest,
    TextResponse,
};

// 1x1 transparent PNG.
const PLACEHOLDER_IMAGE_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[derive(Debug, Clone, Copy)]
pub struct PlaceholderGenerator {
    provider: Provider,
}

impl PlaceholderGenerator {
    #[must_use]
    pub const fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

impl TextGenerator for PlaceholderGenerator {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn send(&self, request: TextRequest<'_>) -> Result<TextResponse, ProviderError> {
        if request.prompt.trim().is_empty() && request.image.is_none() {
            return Err(ProviderError::EmptyPrompt);
        }

        tracing::debug!(
            provider = %self.provider,
            model = request.model,
            history_len = request.history.len(),
            "placeholder text generation"
        );

        let attachment_note = if request.image.is_some() {
            " (lampiran gambar diterima)"
        } else {
            ""
        };
        Ok(TextResponse {
            text: format!(
                "[Respons simulasi {} / {}] Anda menulis: \"{}\"{attachment_note}. \
                 Hubungkan kunci API asli untuk jawaban sungguhan.",
                self.provider.display_name(),
                request.model,
                request.prompt.trim(),
            ),
            grounding: Vec::new(),
        })
    }
}

impl ImageGenerator for PlaceholderGenerator {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn generate(
        &self,
        request: ImageRequest<'_>,
    ) -> Result<Vec<ImagePayload>, ProviderError> {
        if request.prompt.trim().is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }

        tracing::debug!(
            provider = %self.provider,
            model = request.model,
            count = request.count,
            "placeholder image generation"
        );

        Ok((0..request.count)
            .map(|_| ImagePayload(PLACEHOLDER_IMAGE_BASE64.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use santri_types::ChatParams;

    use super::*;

    fn text_request<'a>(prompt: &'a str, params: &'a ChatParams) -> TextRequest<'a> {
        TextRequest {
            prompt,
            history: &[],
            api_key: "sk-test",
            model: "openrouter/auto",
            params,
            system_prompt: "Anda asisten.",
            image: None,
        }
    }

    #[tokio::test]
    async fn echoes_the_prompt_back() {
        let params = ChatParams::default();
        let stub = PlaceholderGenerator::new(Provider::OpenRouter);
        let response = stub.send(text_request("halo dunia", &params)).await.unwrap();
        assert!(response.text.contains("halo dunia"));
        assert!(response.grounding.is_empty());
    }

    #[tokio::test]
    async fn rejects_blank_prompt_without_attachment() {
        let params = ChatParams::default();
        let stub = PlaceholderGenerator::new(Provider::Gemini);
        let err = stub.send(text_request("   ", &params)).await.unwrap_err();
        assert_eq!(err, ProviderError::EmptyPrompt);
    }

    #[tokio::test]
    async fn returns_requested_image_count() {
        let stub = PlaceholderGenerator::new(Provider::Gemini);
        let images = stub
            .generate(ImageRequest {
                prompt: "kucing astronot",
                negative_prompt: Some("buram"),
                api_key: "sk-test",
                model: "imagen-3.0-generate-002",
                count: 3,
            })
            .await
            .unwrap();
        assert_eq!(images.len(), 3);
    }
}
