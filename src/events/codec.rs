//! # Inbound Event Codec
//!
//! Translates the two accepted inbound message shapes into a canonical
//! [`InboundOrder`]. The structured payment-completed envelope is tried
//! first; anything that fails its shape falls back to the legacy flat
//! order message. If both fail, the raw body is carried in the error so
//! the message is never silently dropped.

use serde::Deserialize;

use crate::constants::events;
use crate::error::DecodeError;

/// Canonical decoded form of an inbound order event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundOrder {
    pub order_id: i64,
    pub product_ids: Vec<i64>,
}

/// Structured envelope: `{"meta": {"event_name": ...}, "payload": {...}}`
#[derive(Debug, Deserialize)]
struct StructuredEnvelope {
    meta: StructuredMeta,
    payload: PaymentCompletedPayload,
}

#[derive(Debug, Deserialize)]
struct StructuredMeta {
    event_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentCompletedPayload {
    order_id: i64,
    #[serde(default)]
    items: Vec<OrderItem>,
}

/// One ordered item inside a payment-completed payload. `name` and
/// `quantity` travel on the wire but only `productId` matters here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct OrderItem {
    product_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    quantity: Option<u32>,
}

/// Legacy flat message: `{"orderId": 123, "productIds": [1,2,3]}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyOrderMessage {
    order_id: i64,
    #[serde(default)]
    product_ids: Option<Vec<i64>>,
}

/// Decode an inbound queue message body into an [`InboundOrder`].
///
/// Attempts the structured payment-completed envelope first and falls
/// back to the legacy flat shape. Policy on empty product lists: the
/// structured path accepts an empty `items` array (estimation degrades
/// to zero), the legacy path rejects an empty or missing `productIds`
/// array since a flat order with no products carries no actionable work.
pub fn decode_inbound(body: &str) -> Result<InboundOrder, DecodeError> {
    if let Ok(envelope) = serde_json::from_str::<StructuredEnvelope>(body) {
        if envelope.meta.event_name == events::PAYMENT_COMPLETED {
            let product_ids = envelope
                .payload
                .items
                .iter()
                .map(|item| item.product_id)
                .collect();
            return Ok(InboundOrder {
                order_id: envelope.payload.order_id,
                product_ids,
            });
        }
        // Known envelope shape but an event this service does not
        // consume; fall through to the legacy shape before failing.
    }

    match serde_json::from_str::<LegacyOrderMessage>(body) {
        Ok(message) => {
            let product_ids = message.product_ids.unwrap_or_default();
            if product_ids.is_empty() {
                return Err(DecodeError::new(
                    body,
                    "legacy order message has no productIds",
                ));
            }
            Ok(InboundOrder {
                order_id: message.order_id,
                product_ids,
            })
        }
        Err(e) => Err(DecodeError::new(
            body,
            format!("message matched neither inbound format: {e}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_legacy_message() {
        let order = decode_inbound(r#"{"orderId": 123, "productIds": [1, 2, 3]}"#).unwrap();
        assert_eq!(order.order_id, 123);
        assert_eq!(order.product_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_structured_message() {
        let body = r#"{
            "meta": {"event_name": "payment-completed"},
            "payload": {
                "orderId": 123,
                "items": [
                    {"productId": 1, "name": "burger", "quantity": 2},
                    {"productId": 2, "quantity": 1},
                    {"productId": 3}
                ]
            }
        }"#;
        let order = decode_inbound(body).unwrap();
        assert_eq!(order.order_id, 123);
        assert_eq!(order.product_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_structured_accepts_empty_items() {
        let body = r#"{
            "meta": {"event_name": "payment-completed"},
            "payload": {"orderId": 9, "items": []}
        }"#;
        let order = decode_inbound(body).unwrap();
        assert_eq!(order.order_id, 9);
        assert!(order.product_ids.is_empty());
    }

    #[test]
    fn test_legacy_rejects_empty_product_ids() {
        let err = decode_inbound(r#"{"orderId": 9, "productIds": []}"#).unwrap_err();
        assert!(err.reason.contains("productIds"));

        let err = decode_inbound(r#"{"orderId": 9}"#).unwrap_err();
        assert!(err.reason.contains("productIds"));
    }

    #[test]
    fn test_unknown_event_name_is_a_decode_error() {
        // A well-formed envelope for an event this service does not
        // consume must surface as an error, not be silently dropped.
        let body = r#"{
            "meta": {"event_name": "payment-created"},
            "payload": {"orderId": 4, "items": [{"productId": 1}]}
        }"#;
        let err = decode_inbound(body).unwrap_err();
        assert_eq!(err.body, body);
    }

    #[test]
    fn test_missing_order_id_is_a_decode_error() {
        assert!(decode_inbound(r#"{"productIds": [1]}"#).is_err());
    }

    #[test]
    fn test_malformed_json_is_a_decode_error() {
        let err = decode_inbound("{not json at all").unwrap_err();
        assert_eq!(err.body, "{not json at all");
    }
}
