//! JSON encoding of store snapshots.
//!
//! Each data route encodes the current value while holding the store's
//! read lock, then releases the lock before the body is written out.
//! Encoding is a pure function of the value: sequences keep their order
//! and every response is a self-contained document.

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// Content type of every data route.
pub const APPLICATION_JSON: &str = "application/json";

/// An already-encoded JSON document ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSnapshot(Vec<u8>);

impl JsonSnapshot {
    /// Encode `value` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serialization`] if `value`'s `Serialize`
    /// implementation fails.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        Ok(Self(serde_json::to_vec(value)?))
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the snapshot, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl IntoResponse for JsonSnapshot {
    fn into_response(self) -> Response {
        (
            [(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))],
            self.0,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hepevd_types::{
        BoxVolume, DetectorGeometry, Hit, HitDimension, Hits, Marker, Markers, McHit, McHits,
        Position, Volume,
    };

    use super::*;

    #[test]
    fn encoding_is_deterministic() {
        let hits: Hits = vec![
            Hit::new(HitDimension::ThreeD, Position::new(1.0, 2.0, 3.0), 4.0).with_label("a"),
            Hit::new(HitDimension::TwoD, Position::new(5.0, 6.0, 0.0), 7.0),
        ];

        let first = JsonSnapshot::encode(&hits).unwrap();
        let second = JsonSnapshot::encode(&hits).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshots_parse_back_to_equal_values() {
        let geometry = DetectorGeometry::new(vec![Volume::Box(BoxVolume::new(
            Position::ORIGIN,
            100.0,
            200.0,
            300.0,
        ))]);
        let mc_hits: McHits = vec![McHit::new(HitDimension::ThreeD, Position::ORIGIN, 1.5, 2212)];
        let markers: Markers = vec![
            Marker::point(HitDimension::ThreeD, Position::ORIGIN),
            Marker::ring(HitDimension::TwoD, Position::new(3.0, 3.0, 0.0), 1.0, 2.0),
        ];

        let back: DetectorGeometry =
            serde_json::from_slice(JsonSnapshot::encode(&geometry).unwrap().as_bytes()).unwrap();
        assert_eq!(back, geometry);

        let back: McHits =
            serde_json::from_slice(JsonSnapshot::encode(&mc_hits).unwrap().as_bytes()).unwrap();
        assert_eq!(back, mc_hits);

        let back: Markers =
            serde_json::from_slice(&JsonSnapshot::encode(&markers).unwrap().into_bytes()).unwrap();
        assert_eq!(back, markers);
    }

    #[test]
    fn empty_collection_is_empty_array() {
        let hits: Hits = Vec::new();
        assert_eq!(JsonSnapshot::encode(&hits).unwrap().as_bytes(), b"[]");
    }

    #[test]
    fn response_has_json_content_type() {
        let response = JsonSnapshot::encode("alpha").unwrap().into_response();
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            APPLICATION_JSON
        );
    }
}
