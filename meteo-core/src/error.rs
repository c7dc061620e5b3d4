use thiserror::Error;

/// Errors returned by the Open-Meteo client.
///
/// Every failure is terminal for the call that produced it: nothing is retried
/// and no partial [`WeatherData`](crate::WeatherData) is returned.
#[derive(Debug, Error)]
pub enum MeteoError {
    /// The request URL or the HTTP request itself could not be built.
    #[error("building request: {0}")]
    Request(String),

    /// The request could not be sent or the response body could not be read.
    #[error("sending request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server http error: {status}: {reason}")]
    Server { status: u16, reason: String },

    /// The response body was not valid weather JSON.
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A metric is not known for the interval it was requested on.
    #[error("invalid for {interval} metrics: {metric}")]
    UnsupportedMetric { interval: String, metric: String },

    /// A unit string did not match any supported unit.
    #[error("unknown {kind} unit '{value}'")]
    UnknownUnit { kind: &'static str, value: String },

    /// A product name did not match any API product line.
    #[error("unknown product '{0}', supported products: forecast, archive, seasonal, marine")]
    UnknownProduct(String),
}

impl MeteoError {
    /// HTTP status for [`MeteoError::Server`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            MeteoError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_mentions_status_and_reason() {
        let err = MeteoError::Server { status: 400, reason: "Latitude must be in range".into() };

        let msg = err.to_string();
        assert!(msg.contains("server http error: 400"));
        assert!(msg.contains("Latitude must be in range"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn non_server_errors_have_no_status() {
        let err = MeteoError::UnknownUnit { kind: "temperature", value: "kelvin".into() };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "unknown temperature unit 'kelvin'");
    }

    #[test]
    fn unknown_product_lists_supported_products() {
        let err = MeteoError::UnknownProduct("satellite".into());
        assert_eq!(
            err.to_string(),
            "unknown product 'satellite', supported products: forecast, archive, seasonal, marine"
        );
    }
}
