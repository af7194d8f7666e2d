use async_trait::async_trait;

use crate::errors::{EmbeddingError, SwitchyardResult};

/// Embedding generation provider.
#[async_trait]
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    async fn embed(&self, text: &str) -> SwitchyardResult<Vec<f32>>;

    /// Embed a query and check its width against [`dimensions`](Self::dimensions).
    /// A provider reporting 0 dimensions is not checked.
    async fn embed_query(&self, text: &str) -> SwitchyardResult<Vec<f32>> {
        let vector = self.embed(text).await?;
        let expected = self.dimensions();
        if expected != 0 && vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }
        Ok(vector)
    }

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SwitchyardError;

    struct Fixed {
        width: usize,
        declared: usize,
    }

    #[async_trait]
    impl IEmbeddingProvider for Fixed {
        async fn embed(&self, _text: &str) -> SwitchyardResult<Vec<f32>> {
            Ok(vec![0.5; self.width])
        }

        fn dimensions(&self) -> usize {
            self.declared
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn query_width_must_match_declared_dimensions() {
        let ok = Fixed { width: 4, declared: 4 };
        assert_eq!(ok.embed_query("mug").await.unwrap().len(), 4);

        let short = Fixed { width: 3, declared: 4 };
        let err = short.embed_query("mug").await.unwrap_err();
        assert!(matches!(
            err,
            SwitchyardError::EmbeddingError(EmbeddingError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[tokio::test]
    async fn undeclared_width_is_unchecked() {
        let any = Fixed { width: 7, declared: 0 };
        assert_eq!(any.embed_query("mug").await.unwrap().len(), 7);
    }
}
