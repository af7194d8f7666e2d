/// Route-forcing prefixes, matched case-insensitively and stripped before dispatch.
pub const SQL_PREFIX: &str = "sql:";
pub const VECTOR_PREFIX: &str = "vector:";
pub const SIMILAR_PREFIX: &str = "similar:";
pub const HYBRID_PREFIX: &str = "hybrid:";

/// Listing shortcuts that always take the SQL route.
pub const LISTING_SHORTCUTS: &[&str] = &["all products", "all suppliers", "all categories"];

/// Entity searched by heuristic plans.
pub const PRODUCT_ENTITY: &str = "product";
pub const SUPPLIER_ENTITY: &str = "supplier";
pub const PRODUCT_CATEGORY_ENTITY: &str = "productcategory";

/// Reply used when the conversational completion call fails.
pub const CHITCHAT_FALLBACK_REPLY: &str = "I can help you explore the catalog. \
Try \"sql: all products\", \"vector: waterproof jacket\", or \
\"hybrid: cheapest dino onesie\".";

/// Strip `prefix` from the start of `text`, ignoring ASCII case.
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| text[prefix.len()..].trim_start())
}
