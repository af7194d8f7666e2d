pub mod catalog_ops;
pub mod table_query;
pub mod vector_search;
