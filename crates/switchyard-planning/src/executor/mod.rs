//! PlanExecutor: interprets a validated plan step by step.
//!
//! Steps run strictly in order against one [`VariableTable`]. The result is
//! whatever is bound to `last` when the plan finishes, or an empty row set.
//! Cancellation is checked before every step and wraps every external call.

mod variables;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, Instrument};

use switchyard_core::errors::SwitchyardResult;
use switchyard_core::models::{
    ProductCategoryRecord, ProductWithPrice, ResultRow, SupplierRecord, SupplierSummary,
};
use switchyard_core::plan::{Operation, Plan, SelectOp, SortKey, VectorSearchOp, RESULT_VARIABLE};
use switchyard_core::traits::{
    CancellationToken, IEmbeddingProvider, IRelationalStore, IVectorStore,
};
use switchyard_core::AllowlistRegistry;

pub use variables::{Binding, VariableTable};

pub struct PlanExecutor {
    relational: Arc<dyn IRelationalStore>,
    vectors: Arc<dyn IVectorStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    registry: Arc<AllowlistRegistry>,
}

impl PlanExecutor {
    pub fn new(
        relational: Arc<dyn IRelationalStore>,
        vectors: Arc<dyn IVectorStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        registry: Arc<AllowlistRegistry>,
    ) -> Self {
        Self {
            relational,
            vectors,
            embedder,
            registry,
        }
    }

    /// Run `plan` and return the `last` binding. An empty plan yields an
    /// empty row set. Any failing step aborts the whole plan.
    pub async fn execute(
        &self,
        plan: &Plan,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<Binding> {
        async {
            let mut vars = VariableTable::new();
            for (index, op) in plan.operations().iter().enumerate() {
                cancel.check()?;
                debug!(index, op = op.tag(), "executing step");
                match op {
                    Operation::VectorSearch(v) => self.vector_search(v, &mut vars, cancel).await?,
                    Operation::Select(s) => self.select(s, &mut vars, cancel).await?,
                    // Reserved: accepted, no effect.
                    Operation::Join(_) | Operation::Aggregate(_) => {}
                }
            }
            Ok(vars.take(RESULT_VARIABLE).unwrap_or_else(Binding::empty_rows))
        }
        .instrument(crate::execute_span!(plan.len()))
        .await
    }

    async fn vector_search(
        &self,
        op: &VectorSearchOp,
        vars: &mut VariableTable,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<()> {
        let collection = match self.registry.table_for_entity(&op.entity) {
            Some(table) if self.registry.is_vector_entity(&op.entity) => table,
            _ => {
                vars.bind(&op.output, Binding::Ids(Vec::new()));
                return Ok(());
            }
        };

        let embedding = cancel
            .run_until_cancelled(self.embedder.embed_query(&op.text))
            .await??;
        let hits = cancel
            .run_until_cancelled(self.vectors.nearest(collection, &embedding, op.topk))
            .await??;
        let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
        debug!(collection, hits = ids.len(), "vector search bound");
        vars.bind(&op.output, Binding::Ids(ids));
        Ok(())
    }

    async fn select(
        &self,
        op: &SelectOp,
        vars: &mut VariableTable,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<()> {
        let product_ids = vars.ids(op.ids_in.as_deref());
        let rows = match self.registry.table_for_entity(&op.entity) {
            Some("productcategory") => {
                self.select_priced_products(&product_ids, op, cancel).await?
            }
            Some("suppliers") => self.select_suppliers(&product_ids, op, cancel).await?,
            _ => Vec::new(),
        };
        debug!(entity = %op.entity, rows = rows.len(), "select bound");
        vars.bind(RESULT_VARIABLE, Binding::Rows(rows));
        Ok(())
    }

    /// One category row per product (the best under the sort keys), globally
    /// ordered, truncated, then joined with its product.
    async fn select_priced_products(
        &self,
        product_ids: &[i64],
        op: &SelectOp,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<Vec<ResultRow>> {
        let categories = cancel
            .run_until_cancelled(self.relational.categories_by_product_ids(product_ids))
            .await??;

        let mut best = best_per_product(categories, &op.sort);
        best.sort_by(|a, b| {
            compare_categories(a, b, &op.sort).then(a.product_id.cmp(&b.product_id))
        });
        if let Some(limit) = op.limit.filter(|n| *n > 0) {
            best.truncate(limit);
        }

        let pids: Vec<i64> = best
            .iter()
            .map(|c| c.product_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let products = cancel
            .run_until_cancelled(self.relational.products_by_ids(&pids))
            .await??;
        let by_id: HashMap<i64, _> = products.iter().map(|p| (p.product_id, p)).collect();

        Ok(best
            .iter()
            .filter_map(|c| {
                by_id
                    .get(&c.product_id)
                    .map(|p| ResultRow::Product(ProductWithPrice::join(p, c)))
            })
            .collect())
    }

    /// Distinct suppliers of the given products.
    async fn select_suppliers(
        &self,
        product_ids: &[i64],
        op: &SelectOp,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<Vec<ResultRow>> {
        let products = cancel
            .run_until_cancelled(self.relational.products_by_ids(product_ids))
            .await??;
        let supplier_ids: Vec<i64> = products
            .iter()
            .filter_map(|p| p.supplier_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if supplier_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut suppliers = cancel
            .run_until_cancelled(self.relational.suppliers_by_ids(&supplier_ids))
            .await??;
        suppliers.sort_by(|a, b| {
            compare_suppliers(a, b, &op.sort).then(a.supplier_id.cmp(&b.supplier_id))
        });
        if let Some(limit) = op.limit.filter(|n| *n > 0) {
            suppliers.truncate(limit);
        }
        Ok(suppliers
            .iter()
            .map(|s| ResultRow::Supplier(SupplierSummary::from(s)))
            .collect())
    }
}

/// Reduce category rows to one per product, in ascending product id order.
fn best_per_product(
    categories: Vec<ProductCategoryRecord>,
    keys: &[SortKey],
) -> Vec<ProductCategoryRecord> {
    let mut groups: BTreeMap<i64, Vec<ProductCategoryRecord>> = BTreeMap::new();
    for c in categories {
        groups.entry(c.product_id).or_default().push(c);
    }
    groups
        .into_values()
        .filter_map(|group| {
            group.into_iter().min_by(|a, b| {
                compare_categories(a, b, keys)
                    .then(a.product_category_id.cmp(&b.product_category_id))
            })
        })
        .collect()
}

/// Compare under the sort keys; no keys means ascending price. Every
/// productcategory column is sortable; an unknown field compares by price.
fn compare_categories(
    a: &ProductCategoryRecord,
    b: &ProductCategoryRecord,
    keys: &[SortKey],
) -> Ordering {
    if keys.is_empty() {
        return a.price.total_cmp(&b.price);
    }
    keys.iter().fold(Ordering::Equal, |acc, key| {
        acc.then_with(|| directed(category_field_order(a, b, &key.field), key))
    })
}

fn category_field_order(
    a: &ProductCategoryRecord,
    b: &ProductCategoryRecord,
    field: &str,
) -> Ordering {
    match field.to_ascii_lowercase().as_str() {
        "productcategoryid" => a.product_category_id.cmp(&b.product_category_id),
        "productid" => a.product_id.cmp(&b.product_id),
        "cost" => a.cost.total_cmp(&b.cost),
        "color" => a.color.cmp(&b.color),
        "agesize" => a.age_size.cmp(&b.age_size),
        "currentstock" => a.current_stock.cmp(&b.current_stock),
        "reorderpoint" => a.reorder_point.cmp(&b.reorder_point),
        "updatedstock" => a.updated_stock.cmp(&b.updated_stock),
        _ => a.price.total_cmp(&b.price),
    }
}

/// No keys means ascending name. Names compare case-insensitively; columns
/// the supplier record does not carry compare by name.
fn compare_suppliers(a: &SupplierRecord, b: &SupplierRecord, keys: &[SortKey]) -> Ordering {
    if keys.is_empty() {
        return supplier_field_order(a, b, "suppliername");
    }
    keys.iter().fold(Ordering::Equal, |acc, key| {
        acc.then_with(|| directed(supplier_field_order(a, b, &key.field), key))
    })
}

fn supplier_field_order(a: &SupplierRecord, b: &SupplierRecord, field: &str) -> Ordering {
    match field.to_ascii_lowercase().as_str() {
        "supplierid" => a.supplier_id.cmp(&b.supplier_id),
        "contactperson" => a.contact_person.cmp(&b.contact_person),
        "phonenumber" => a.phone_number.cmp(&b.phone_number),
        "supplieremail" => a.supplier_email.cmp(&b.supplier_email),
        "address" => a.address.cmp(&b.address),
        "supplierstatus" => a.supplier_status.cmp(&b.supplier_status),
        "defectreturned" => a.defect_returned.cmp(&b.defect_returned),
        _ => a
            .supplier_name
            .to_lowercase()
            .cmp(&b.supplier_name.to_lowercase()),
    }
}

fn directed(ord: Ordering, key: &SortKey) -> Ordering {
    if key.dir.is_desc() {
        ord.reverse()
    } else {
        ord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, product: i64, price: f64) -> ProductCategoryRecord {
        ProductCategoryRecord {
            product_category_id: id,
            product_id: product,
            price,
            cost: price / 2.0,
            color: None,
            age_size: None,
            current_stock: 0,
            reorder_point: None,
            updated_stock: None,
        }
    }

    fn stocked(id: i64, product: i64, price: f64, stock: i64) -> ProductCategoryRecord {
        ProductCategoryRecord {
            current_stock: stock,
            ..category(id, product, price)
        }
    }

    #[test]
    fn cheapest_row_wins_per_product() {
        let rows = vec![
            category(1, 5, 12.0),
            category(2, 5, 10.0),
            category(3, 9, 8.0),
        ];
        let best = best_per_product(rows, &[]);
        let picked: Vec<i64> = best.iter().map(|c| c.product_category_id).collect();
        assert_eq!(picked, vec![2, 3]);
    }

    #[test]
    fn equal_prices_fall_back_to_category_id() {
        let rows = vec![category(7, 1, 4.0), category(3, 1, 4.0)];
        let best = best_per_product(rows, &[SortKey::asc("price")]);
        assert_eq!(best[0].product_category_id, 3);
    }

    #[test]
    fn descending_keys_pick_most_expensive() {
        let rows = vec![category(1, 2, 3.0), category(2, 2, 30.0)];
        let best = best_per_product(rows, &[SortKey::desc("price")]);
        assert_eq!(best[0].product_category_id, 2);
    }

    #[test]
    fn stock_key_drives_reduction_not_price() {
        let rows = vec![stocked(1, 1, 59.0, 14), stocked(2, 1, 64.0, 3)];
        let best = best_per_product(rows, &[SortKey::desc("currentstock")]);
        assert_eq!(best[0].product_category_id, 1);
    }

    #[test]
    fn text_columns_sort_lexically() {
        let mut a = category(1, 1, 5.0);
        a.color = Some("red".to_string());
        let mut b = category(2, 2, 1.0);
        b.color = Some("blue".to_string());
        assert_eq!(
            compare_categories(&a, &b, &[SortKey::asc("color")]),
            Ordering::Greater
        );
    }
}
