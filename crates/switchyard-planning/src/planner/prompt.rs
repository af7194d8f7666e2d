use switchyard_core::AllowlistRegistry;

pub const PLANNER_SYSTEM_PROMPT: &str = "You are a planner. Output ONLY strict JSON with shape \
{\"plan\":[ ... ]}. Allowed ops: vector_search, select, join, aggregate. \
Use only entities, tables and columns from the given registry. \
vector_search fields: entity, text, topk, return (the variable that receives ids). \
select fields: entity, ids_in (a variable set by an earlier step), sort, limit. \
If the user asks about price, select entity productcategory and sort by price (not product). \
Sort using select.sort: [{\"field\":\"price\",\"dir\":\"asc|desc\"}]. \
Use ids_in to pass values between steps. Do not include commentary.";

/// User message: the registry snapshot followed by the request.
pub fn planner_user_prompt(registry: &AllowlistRegistry, input: &str) -> String {
    format!("REGISTRY:\n{}\n\nUSER:\n{input}", registry.snapshot_json())
}
