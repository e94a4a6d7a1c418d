use axum_shop_api::routes::doc::ApiDoc;
use utoipa::OpenApi;

// The document must describe the payloads the handlers actually produce:
// money crosses the wire as JSON numbers, not strings.
#[test]
fn money_fields_are_documented_as_numbers() {
    let doc = serde_json::to_value(ApiDoc::openapi()).expect("openapi document serializes");
    let schemas = &doc["components"]["schemas"];

    for (schema, field) in [
        ("Product", "price"),
        ("CartItemInput", "price"),
        ("PlaceOrderRequest", "totalAmount"),
        ("OrderSummary", "total_amount"),
        ("OrderHistoryItem", "price"),
    ] {
        assert_eq!(
            schemas[schema]["properties"][field]["type"].as_str(),
            Some("number"),
            "{schema}.{field}",
        );
    }
}
