// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "switchyard.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Completion service ---
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gemma2-9b-it";
pub const DEFAULT_COMPLETION_TIMEOUT_MS: u64 = 12_000;
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_PLANNER_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_CLASSIFIER_TEMPERATURE: f32 = 0.0;

// --- Embedding service ---
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 10_000;

// --- Classifier ---
pub const DEFAULT_CLASSIFY_TIMEOUT_MS: u64 = 4_000;
pub const DEFAULT_USE_MODEL_CLASSIFIER: bool = true;

// --- Planner ---
pub const DEFAULT_USE_MODEL_PLANNER: bool = true;
pub const DEFAULT_PLAN_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_HEURISTIC_TOPK: usize = 10;
pub const DEFAULT_SUPPLIER_RESULT_LIMIT: usize = 5;
pub const DEFAULT_PRICE_RESULT_LIMIT: usize = 1;
pub const DEFAULT_VECTOR_TOPK: usize = 10;

// --- Allowlist ---
pub const DEFAULT_ROW_LIMIT: usize = 50;
pub const DEFAULT_MAX_ROW_LIMIT: usize = 1_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
