use std::io;

//===========================================================================//

/// An error that aborts the conversion of a single source image.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The source bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    DecodeFailed(String),
    /// A drawing surface of the requested size could not be set up.
    #[error("compositing unavailable: {0}")]
    CompositingUnavailable(String),
    /// The compressed-image codec rejected the pixel data.
    #[error("failed to encode image: {0}")]
    EncodeFailed(String),
    /// An icon container was requested with no variants in it.  This is
    /// an internal invariant violation; a valid size policy never yields
    /// it.
    #[error("an ICO file must contain at least one image")]
    EmptyVariantSet,
    /// A size policy table was rejected.
    #[error("invalid size policy: {0}")]
    InvalidPolicy(String),
    /// The conversion was cancelled before it completed.
    #[error("conversion cancelled")]
    Cancelled,
    /// Writing encoded bytes failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::ConvertError;
    use std::io;

    #[test]
    fn io_errors_convert() {
        let error: ConvertError =
            io::Error::new(io::ErrorKind::WriteZero, "full").into();
        assert!(matches!(error, ConvertError::Io(_)));
        assert_eq!(error.to_string(), "full");
    }

    #[test]
    fn messages_name_the_cause() {
        let error = ConvertError::DecodeFailed("bad header".to_string());
        assert_eq!(error.to_string(), "failed to decode image: bad header");
    }
}

//===========================================================================//
